//! Transport primitives shared by the roster signer and the OneClick helpers.
//!
//! The module exposes [`ApiHttpClient`], the crate's only dependency on an HTTP stack, along
//! with [`ApiResponse`] and the request builders used by both clients. Requests and responses
//! use the `oauth2` crate's [`HttpRequest`]/[`HttpResponse`] aliases so any client that already
//! speaks [`AsyncHttpClient`] can be plugged in.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::{
		Method,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue},
	},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_ACCEPT: &str = "application/json";

/// Abstraction over HTTP transports capable of executing API calls.
///
/// Callers provide an implementation (typically behind `Arc<T>` where `T: ApiHttpClient`) and
/// the clients request short-lived [`AsyncHttpClient`] handles for each call. Implementations
/// must be `Send + Sync + 'static` so they can be shared across clients and tasks without
/// additional wrappers, and the handles they return must own whatever state is required so
/// their request futures remain `Send` for the lifetime of the in-flight operation.
///
/// Network failures must surface as `Err` from the handle; HTTP error statuses are ordinary
/// responses.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle used for a single call.
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds an [`AsyncHttpClient`] handle for one request.
	fn handle(&self) -> Self::Handle;
}

/// Status code plus decoded text body of a completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body decoded as UTF-8 (lossy).
	pub body: String,
}
impl ApiResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}
impl From<HttpResponse> for ApiResponse {
	fn from(response: HttpResponse) -> Self {
		let status = response.status().as_u16();
		let body = String::from_utf8_lossy(response.body()).into_owned();

		Self { status, body }
	}
}

/// Executes `request` on a fresh handle from `client` and normalizes failures.
pub async fn execute<C>(client: &C, request: HttpRequest) -> Result<ApiResponse>
where
	C: ?Sized + ApiHttpClient,
{
	let handle = client.handle();
	let response = handle.call(request).await.map_err(map_client_error)?;

	Ok(response.into())
}

/// Builds a GET request for `base_url` with `query` attached as form-urlencoded query args.
pub fn get_request<'a, I>(
	base_url: &str,
	authorization: &str,
	query: I,
) -> Result<HttpRequest>
where
	I: IntoIterator<Item = (&'a str, &'a str)>,
{
	let mut url = parse_url(base_url)?;
	let mut serializer = form_urlencoded::Serializer::new(String::new());
	let mut appended = false;

	for (key, value) in query {
		serializer.append_pair(key, value);

		appended = true;
	}

	if appended {
		url.set_query(Some(&serializer.finish()));
	}

	oauth2::http::Request::builder()
		.method(Method::GET)
		.uri(url.as_str())
		.header(AUTHORIZATION, header_value(authorization)?)
		.body(Vec::new())
		.map_err(|e| ConfigError::from(e).into())
}

/// Builds a form POST request carrying `form` as an urlencoded body.
pub fn form_post_request<'a, I>(url: &Url, form: I) -> Result<HttpRequest>
where
	I: IntoIterator<Item = (&'a str, &'a str)>,
{
	let body = form_urlencoded::Serializer::new(String::new()).extend_pairs(form).finish();

	oauth2::http::Request::builder()
		.method(Method::POST)
		.uri(url.as_str())
		.header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE))
		.header(ACCEPT, HeaderValue::from_static(JSON_ACCEPT))
		.body(body.into_bytes())
		.map_err(|e| ConfigError::from(e).into())
}

/// Builds a bearer-authenticated GET request.
pub fn bearer_get_request(url: &Url, bearer: &str) -> Result<HttpRequest> {
	oauth2::http::Request::builder()
		.method(Method::GET)
		.uri(url.as_str())
		.header(AUTHORIZATION, header_value(&format!("Bearer {bearer}"))?)
		.header(ACCEPT, HeaderValue::from_static(JSON_ACCEPT))
		.body(Vec::new())
		.map_err(|e| ConfigError::from(e).into())
}

fn parse_url(raw: &str) -> Result<Url> {
	Url::parse(raw).map_err(|source| ConfigError::invalid_url(raw, source).into())
}

fn header_value(raw: &str) -> Result<HeaderValue> {
	HeaderValue::from_str(raw)
		.map_err(|e| ConfigError::from(oauth2::http::Error::from(e)).into())
}

/// Normalizes an [`HttpClientError`] emitted by a transport handle into a crate [`Error`].
pub fn map_client_error<E>(err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Other { message }.into(),
		other => TransportError::Other { message: other.to_string() }.into(),
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// No timeout is configured; supply a custom [`ReqwestClient`] through
/// [`ReqwestHttpClient::with_client`] to bound request latency.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	type Handle = ReqwestHandle;
	type TransportError = ReqwestError;

	fn handle(&self) -> Self::Handle {
		ReqwestHandle(self.0.clone())
	}
}

/// Handle returned by [`ReqwestHttpClient`] that satisfies [`ApiHttpClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHandle(ReqwestClient);
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ReqwestHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.0.clone();

		Box::pin(async move {
			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

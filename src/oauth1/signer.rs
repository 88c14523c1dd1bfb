//! Request orchestration: credentials, nonce/timestamp generation, and the signed GET.

// crates.io
use oauth2::{ClientSecret, HttpRequest};
use rand::{Rng, distr::Alphanumeric};
// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;
use crate::{
	_prelude::*,
	http::{self, ApiHttpClient, ApiResponse},
	oauth1::{OAuthParameters, QueryParameters, params, signature},
	obs::{self, RequestKind},
};

/// Method used for every roster request.
pub const HTTP_METHOD_GET: &str = "GET";
/// Body of the sentinel response returned when a request never reached the server.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "An error occurred, check your URL";

/// Consumer key and secret for 2-legged signing.
#[derive(Clone, Debug)]
pub struct Credentials {
	consumer_key: String,
	consumer_secret: ClientSecret,
}
impl Credentials {
	/// Wraps the consumer key/secret pair.
	pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
		Self {
			consumer_key: consumer_key.into(),
			consumer_secret: ClientSecret::new(consumer_secret.into()),
		}
	}

	/// Consumer key sent as `oauth_consumer_key`.
	pub fn consumer_key(&self) -> &str {
		&self.consumer_key
	}

	/// Consumer secret. Callers must avoid logging this value.
	pub fn consumer_secret(&self) -> &ClientSecret {
		&self.consumer_secret
	}
}

/// Everything produced by signing one roster URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
	/// Target URL without its query string.
	pub base_url: String,
	/// Query parameters sent as ordinary URL query args.
	pub query: QueryParameters,
	/// OAuth parameters, including the signature.
	pub oauth: OAuthParameters,
	/// Signature base string the signature was computed over.
	pub base_string: String,
	/// `Authorization` header value.
	pub authorization: String,
}
impl SignedRequest {
	/// Computed `oauth_signature`.
	pub fn signature(&self) -> Option<&str> {
		self.oauth.signature.as_deref()
	}

	/// Renders the GET request handed to the transport.
	pub fn to_http_request(&self) -> Result<HttpRequest> {
		http::get_request(&self.base_url, &self.authorization, self.query.iter())
	}
}

/// Outcome of a roster call: the HTTP status and raw body, or the transport-failure sentinel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterResponse {
	/// HTTP status code; `0` only for the transport-failure sentinel.
	pub status_code: u16,
	/// Raw response body.
	pub response: String,
}
impl RosterResponse {
	/// Sentinel returned when the request failed before a response was received.
	pub fn transport_failure() -> Self {
		Self { status_code: 0, response: TRANSPORT_FAILURE_MESSAGE.into() }
	}

	/// Returns `true` for the transport-failure sentinel.
	pub fn is_transport_failure(&self) -> bool {
		self.status_code == 0
	}
}
impl From<ApiResponse> for RosterResponse {
	fn from(response: ApiResponse) -> Self {
		Self { status_code: response.status, response: response.body }
	}
}

/// Signs and sends 2-legged OAuth 1.0a GET requests to OneRoster endpoints.
///
/// The signer holds immutable credentials and a shared transport handle, so clones are cheap
/// and concurrent calls need no locking. Every call generates a fresh timestamp and nonce.
pub struct RequestSigner<C>
where
	C: ?Sized + ApiHttpClient,
{
	credentials: Credentials,
	http_client: Arc<C>,
}
impl<C> RequestSigner<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a signer that reuses the caller-provided transport.
	pub fn with_http_client(credentials: Credentials, http_client: impl Into<Arc<C>>) -> Self {
		Self { credentials, http_client: http_client.into() }
	}

	/// Credentials used for signing.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	/// Signs `url` with a fresh timestamp and nonce.
	pub fn sign(&self, url: &str) -> Result<SignedRequest> {
		let timestamp = generate_timestamp();
		let nonce = generate_nonce(timestamp.chars().count());

		self.sign_at(url, timestamp, nonce)
	}

	/// Signs `url` with the given timestamp and nonce. The result is fully deterministic.
	pub fn sign_at(
		&self,
		url: &str,
		timestamp: impl Into<String>,
		nonce: impl Into<String>,
	) -> Result<SignedRequest> {
		let (base_url, raw_query) = params::split_url(url);
		let query = raw_query.map(QueryParameters::parse).unwrap_or_default();
		let mut oauth = OAuthParameters::new(self.credentials.consumer_key(), timestamp, nonce);
		let base_string = signature::base_string(HTTP_METHOD_GET, base_url, &oauth.merge(&query));
		let key = signature::composite_key(self.credentials.consumer_secret().secret());

		oauth.signature = Some(signature::sign_base_string(&base_string, &key)?);

		let authorization = signature::authorization_header(&oauth);

		Ok(SignedRequest { base_url: base_url.to_owned(), query, oauth, base_string, authorization })
	}

	/// Signs `url` and sends it, surfacing every failure as an [`Error`].
	///
	/// HTTP error statuses are not failures; they come back verbatim in the [`RosterResponse`].
	pub async fn try_sign_and_send(&self, url: &str) -> Result<RosterResponse> {
		obs::observe(RequestKind::Roster, "sign_and_send", async move {
			let request = self.sign(url)?.to_http_request()?;
			let response = http::execute(self.http_client.as_ref(), request).await?;

			Ok(response.into())
		})
		.await
	}

	/// Signs `url` and sends it.
	///
	/// Any failure before a response arrives (malformed URL, DNS, refused connection, timeout)
	/// is logged and folded into [`RosterResponse::transport_failure`]; callers check
	/// [`RosterResponse::is_transport_failure`] instead of handling errors.
	pub async fn sign_and_send(&self, url: &str) -> RosterResponse {
		match self.try_sign_and_send(url).await {
			Ok(response) => response,
			Err(err) => {
				obs::record_swallowed_error(RequestKind::Roster, &err);

				RosterResponse::transport_failure()
			},
		}
	}
}
#[cfg(feature = "reqwest")]
impl RequestSigner<ReqwestHttpClient> {
	/// Creates a signer backed by a default reqwest transport.
	pub fn new(credentials: Credentials) -> Self {
		Self::with_http_client(credentials, ReqwestHttpClient::default())
	}
}
impl<C> Clone for RequestSigner<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self { credentials: self.credentials.clone(), http_client: self.http_client.clone() }
	}
}
impl<C> Debug for RequestSigner<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestSigner").field("credentials", &self.credentials).finish()
	}
}

/// Current Unix time in seconds, as a decimal string.
pub fn generate_timestamp() -> String {
	OffsetDateTime::now_utc().unix_timestamp().to_string()
}

/// Random nonce of `len` characters drawn uniformly from `0-9A-Za-z`.
pub fn generate_nonce(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::{AsyncHttpClient, HttpClientError, HttpResponse};
	use parking_lot::Mutex;
	// self
	use super::*;

	const USERS_URL: &str =
		"https://oneroster.example.com/ims/oneroster/v1p1/users?limit=5&filter=role%3D'teacher'";
	const SCHOOLS_URL: &str = "https://oneroster.example.com/ims/oneroster/v1p1/schools";

	#[derive(Debug)]
	struct Refused;
	impl Display for Refused {
		fn fmt(&self, f: &mut Formatter) -> FmtResult {
			f.write_str("Connection refused.")
		}
	}
	impl StdError for Refused {}

	/// Transport that records requests and either refuses them or answers with a fixed status.
	#[derive(Clone, Default)]
	struct ScriptedHttpClient {
		status: Option<u16>,
		requests: Arc<Mutex<Vec<HttpRequest>>>,
	}
	impl ApiHttpClient for ScriptedHttpClient {
		type Handle = ScriptedHttpClient;
		type TransportError = Refused;

		fn handle(&self) -> Self::Handle {
			self.clone()
		}
	}
	impl<'c> AsyncHttpClient<'c> for ScriptedHttpClient {
		type Error = HttpClientError<Refused>;
		type Future =
			Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

		fn call(&'c self, request: HttpRequest) -> Self::Future {
			self.requests.lock().push(request);

			let status = self.status;

			Box::pin(async move {
				let status = status.ok_or_else(|| HttpClientError::Reqwest(Box::new(Refused)))?;
				let mut response = HttpResponse::new(b"{\"users\":[]}".to_vec());

				*response.status_mut() = oauth2::http::StatusCode::from_u16(status)
					.expect("Scripted status should be valid.");

				Ok(response)
			})
		}
	}

	fn signer(client: ScriptedHttpClient) -> RequestSigner<ScriptedHttpClient> {
		RequestSigner::with_http_client(Credentials::new("client-id", "client-secret"), client)
	}

	#[test]
	fn sign_at_matches_reference_signature() {
		let signed = signer(ScriptedHttpClient::default())
			.sign_at(USERS_URL, "1700000000", "AbCdEfGhIj")
			.expect("Signing should succeed.");

		assert_eq!(signed.base_url, "https://oneroster.example.com/ims/oneroster/v1p1/users");
		assert_eq!(signed.query.get("limit"), Some("5"));
		assert_eq!(signed.query.get("filter"), Some("role='teacher'"));
		assert_eq!(
			signed.base_string,
			"GET&https%3A%2F%2Foneroster.example.com%2Fims%2Foneroster%2Fv1p1%2Fusers&\
			 filter%3Drole%253D%2527teacher%2527%26limit%3D5%26oauth_consumer_key%3Dclient-id%26\
			 oauth_nonce%3DAbCdEfGhIj%26oauth_signature_method%3DHMAC-SHA256%26\
			 oauth_timestamp%3D1700000000"
		);
		assert_eq!(signed.signature(), Some("++jKtgf9135pQp4FcFRZtx77plD1ZgghIZ7PKstiWTQ="));
		assert_eq!(
			signed.authorization,
			"OAuth oauth_consumer_key=\"client-id\",oauth_signature_method=\"HMAC-SHA256\",\
			 oauth_timestamp=\"1700000000\",oauth_nonce=\"AbCdEfGhIj\",\
			 oauth_signature=\"%2B%2BjKtgf9135pQp4FcFRZtx77plD1ZgghIZ7PKstiWTQ%3D\""
		);
	}

	#[test]
	fn sign_at_is_deterministic_and_sensitive_to_timestamp_and_nonce() {
		let signer = signer(ScriptedHttpClient::default());
		let sign = |timestamp, nonce| {
			signer.sign_at(SCHOOLS_URL, timestamp, nonce).expect("Signing should succeed.")
		};
		let first = sign("1700000000", "AbCdEfGhIj");
		let again = sign("1700000000", "AbCdEfGhIj");
		let later = sign("1700000001", "ZyXwVuTsRq");

		assert_eq!(first, again);
		assert_eq!(first.signature(), Some("Yd9wLu5z0VS9LVfG3W5dZsAvJMfgOAjypDms68h+Ki4="));
		assert_eq!(later.signature(), Some("AP9vevwg4WOE2iLbt4b+ismPjRDhe6JkCDNKbfQDsHI="));
		assert!(first.query.is_empty());
	}

	#[test]
	fn trailing_ampersand_signs_and_sends_empty_filter() {
		let signed = signer(ScriptedHttpClient::default())
			.sign_at(
				"https://oneroster.example.com/ims/oneroster/v1p1/users?limit=5&",
				"1700000000",
				"AbCdEfGhIj",
			)
			.expect("Signing should succeed.");

		assert_eq!(signed.query.get("filter"), Some(""));
		assert_eq!(signed.query.get("limit"), Some("5"));
		assert_eq!(
			signed.base_string,
			"GET&https%3A%2F%2Foneroster.example.com%2Fims%2Foneroster%2Fv1p1%2Fusers&\
			 filter%3D%26limit%3D5%26oauth_consumer_key%3Dclient-id%26oauth_nonce%3DAbCdEfGhIj%26\
			 oauth_signature_method%3DHMAC-SHA256%26oauth_timestamp%3D1700000000"
		);
		assert_eq!(signed.signature(), Some("lH07c1eCprnTMIzS1yOqGQvzAh2Ou+0JPjbR4sfNKUs="));

		let request = signed.to_http_request().expect("Request should build.");

		assert_eq!(
			request.uri().to_string(),
			"https://oneroster.example.com/ims/oneroster/v1p1/users?filter=&limit=5"
		);
	}

	#[test]
	fn sign_generates_nonce_as_long_as_timestamp() {
		let signer = signer(ScriptedHttpClient::default());
		let first = signer.sign(SCHOOLS_URL).expect("Signing should succeed.");
		let second = signer.sign(SCHOOLS_URL).expect("Signing should succeed.");

		assert_eq!(first.oauth.nonce.len(), first.oauth.timestamp.len());
		assert!(first.oauth.nonce.chars().all(|c| c.is_ascii_alphanumeric()));
		assert!(first.oauth.timestamp.chars().all(|c| c.is_ascii_digit()));
		assert_ne!(first.oauth.nonce, second.oauth.nonce);
		assert_ne!(first.signature(), second.signature());
	}

	#[test]
	fn generate_nonce_honors_length() {
		assert_eq!(generate_nonce(10).len(), 10);
		assert!(generate_nonce(0).is_empty());
	}

	#[test]
	fn credentials_debug_redacts_secret() {
		let rendered = format!("{:?}", Credentials::new("client-id", "client-secret"));

		assert!(rendered.contains("client-id"));
		assert!(!rendered.contains("client-secret"));
	}

	#[tokio::test]
	async fn sign_and_send_attaches_header_and_query() {
		let client = ScriptedHttpClient { status: Some(200), ..Default::default() };
		let response = signer(client.clone()).sign_and_send(USERS_URL).await;

		assert_eq!(response, RosterResponse { status_code: 200, response: "{\"users\":[]}".into() });

		let requests = client.requests.lock();
		let request = requests.first().expect("One request should be recorded.");
		let authorization = request
			.headers()
			.get(oauth2::http::header::AUTHORIZATION)
			.and_then(|value| value.to_str().ok())
			.expect("Authorization header should be present.");

		assert_eq!(requests.len(), 1);
		assert_eq!(request.method(), oauth2::http::Method::GET);
		assert_eq!(
			request.uri().to_string(),
			"https://oneroster.example.com/ims/oneroster/v1p1/users?filter=role%3D%27teacher%27&limit=5"
		);
		assert!(authorization.starts_with("OAuth oauth_consumer_key=\"client-id\","));
		assert!(authorization.contains("oauth_signature_method=\"HMAC-SHA256\""));
		assert!(!authorization.contains("filter"));
	}

	#[tokio::test]
	async fn sign_and_send_passes_server_rejections_through() {
		let client = ScriptedHttpClient { status: Some(401), ..Default::default() };
		let response = signer(client).sign_and_send(SCHOOLS_URL).await;

		assert_eq!(response.status_code, 401);
		assert!(!response.is_transport_failure());
	}

	#[tokio::test]
	async fn sign_and_send_maps_transport_failure_to_sentinel() {
		let response = signer(ScriptedHttpClient::default()).sign_and_send(SCHOOLS_URL).await;

		assert_eq!(
			response,
			RosterResponse { status_code: 0, response: "An error occurred, check your URL".into() }
		);
		assert!(response.is_transport_failure());
	}

	#[tokio::test]
	async fn malformed_url_never_reaches_transport() {
		let client = ScriptedHttpClient { status: Some(200), ..Default::default() };
		let signer = signer(client.clone());
		let err = signer
			.try_sign_and_send("not a url?limit=5")
			.await
			.expect_err("Malformed URLs should fail before the transport.");

		assert!(matches!(err, Error::Config(_)));
		assert_eq!(signer.sign_and_send("not a url").await, RosterResponse::transport_failure());
		assert!(client.requests.lock().is_empty());
	}
}

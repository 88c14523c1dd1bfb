//! ClassLink OneClick: OAuth 2.0 authorization-code helpers and bearer-authenticated info lookups.
//!
//! The flow is the usual three steps. Send the user to [`OneClick::authorize_url`]. Trade the
//! returned `code` for a token via [`OneClick::exchange_code`]. Query the info API with the
//! resulting bearer token through [`OneClick::info`] or one of the `user_*` shortcuts.

pub mod authorize;
pub mod config;
pub mod info;
pub mod token;

pub use authorize::*;
pub use config::*;
pub use info::*;
pub use token::*;

// crates.io
use serde::de::DeserializeOwned;
// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;
use crate::{
	_prelude::*,
	error::ResponseError,
	http::{ApiHttpClient, ApiResponse},
};

/// OneClick client bound to one [`OneClickConfig`] and one transport.
///
/// Cloning is cheap; clones share the configuration and transport.
pub struct OneClick<C>
where
	C: ?Sized + ApiHttpClient,
{
	config: Arc<OneClickConfig>,
	http_client: Arc<C>,
}
impl<C> OneClick<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(config: OneClickConfig, http_client: impl Into<Arc<C>>) -> Self {
		Self { config: Arc::new(config), http_client: http_client.into() }
	}

	/// Configuration the client was built with.
	pub fn config(&self) -> &OneClickConfig {
		&self.config
	}

	pub(crate) fn http_client(&self) -> &C {
		self.http_client.as_ref()
	}
}
#[cfg(feature = "reqwest")]
impl OneClick<ReqwestHttpClient> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(config: OneClickConfig) -> Self {
		Self::with_http_client(config, ReqwestHttpClient::default())
	}
}
impl<C> Clone for OneClick<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self { config: self.config.clone(), http_client: self.http_client.clone() }
	}
}
impl<C> Debug for OneClick<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OneClick").field("config", &self.config).finish()
	}
}

fn ensure_success(response: &ApiResponse) -> Result<()> {
	if response.is_success() {
		Ok(())
	} else {
		Err(ResponseError::Status { status: response.status, body: response.body.clone() }.into())
	}
}

fn parse_json<T>(response: &ApiResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_str(&response.body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| ResponseError::Json { source, status: response.status }.into())
}

//! Authorization URL construction.

// self
use crate::{_prelude::*, http::ApiHttpClient, oneclick::OneClick};

/// Scope requested when none is given.
pub const DEFAULT_SCOPE: &str = "profile";
/// Redirect target used when none is given.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/code";

/// Parameters for the authorization redirect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeRequest {
	/// Requested scope, passed through verbatim.
	pub scope: String,
	/// Where ClassLink sends the user back with `?code=...`.
	pub redirect_uri: String,
}
impl CodeRequest {
	/// Overrides the scope.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = scope.into();

		self
	}

	/// Overrides the redirect URI.
	pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
		self.redirect_uri = redirect_uri.into();

		self
	}
}
impl Default for CodeRequest {
	fn default() -> Self {
		Self { scope: DEFAULT_SCOPE.into(), redirect_uri: DEFAULT_REDIRECT_URI.into() }
	}
}

impl<C> OneClick<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Builds the URL the user agent is sent to in order to obtain an authorization code.
	///
	/// Appends `client_id`, `scope`, `redirect_uri`, and `response_type=code`, in that order, to
	/// the configured authorization endpoint.
	pub fn authorize_url(&self, request: &CodeRequest) -> Url {
		let mut url = self.config().authorization_endpoint().clone();

		url.query_pairs_mut()
			.append_pair("client_id", self.config().client_id().as_str())
			.append_pair("scope", &request.scope)
			.append_pair("redirect_uri", &request.redirect_uri)
			.append_pair("response_type", "code");

		url
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;
	use crate::{http::ReqwestHttpClient, oneclick::OneClickConfig};

	fn oneclick() -> OneClick<ReqwestHttpClient> {
		OneClick::new(
			OneClickConfig::builder("c-123", "secret")
				.build()
				.expect("Default configuration should build successfully."),
		)
	}

	#[test]
	fn authorize_url_uses_defaults() {
		let url = oneclick().authorize_url(&CodeRequest::default());

		assert_eq!(
			url.as_str(),
			"https://launchpad.classlink.com/oauth2/v2/auth?client_id=c-123&scope=profile&\
			 redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fcode&response_type=code"
		);
	}

	#[test]
	fn authorize_url_encodes_overrides() {
		let request = CodeRequest::default()
			.with_scope("full oneroster")
			.with_redirect_uri("https://app.example.com/callback?x=1");
		let url = oneclick().authorize_url(&request);
		let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();

		assert_eq!(
			pairs,
			[
				("client_id".to_owned(), "c-123".to_owned()),
				("scope".to_owned(), "full oneroster".to_owned()),
				("redirect_uri".to_owned(), "https://app.example.com/callback?x=1".to_owned()),
				("response_type".to_owned(), "code".to_owned()),
			]
		);
		assert!(url.as_str().contains("scope=full+oneroster"));
	}
}

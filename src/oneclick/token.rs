//! Authorization-code exchange.

// crates.io
use oauth2::AccessToken;
// self
use crate::{
	_prelude::*,
	http::{self, ApiHttpClient},
	obs::{self, RequestKind},
	oneclick::{self, OneClick},
};

/// Token endpoint answer. Only `access_token` is required.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenResponse {
	/// Bearer token for the info API.
	pub access_token: AccessToken,
	/// Token type reported by the server, usually `Bearer`.
	#[serde(default)]
	pub token_type: Option<String>,
	/// OpenID Connect ID token, when the server issues one.
	#[serde(default)]
	pub id_token: Option<String>,
}

impl<C> OneClick<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Exchanges an authorization code for an access token.
	///
	/// Posts `client_id`, `client_secret`, and `code` as a form body to the token endpoint.
	pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
		obs::observe(RequestKind::CodeExchange, "exchange_code", async move {
			let config = self.config();
			let request = http::form_post_request(
				config.token_endpoint(),
				[
					("client_id", config.client_id().as_str()),
					("client_secret", config.client_secret().secret().as_str()),
					("code", code),
				],
			)?;
			let response = http::execute(self.http_client(), request).await?;

			oneclick::ensure_success(&response)?;
			oneclick::parse_json(&response)
		})
		.await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_response_requires_access_token_only() {
		let token: TokenResponse = serde_json::from_str("{\"access_token\":\"abc\"}")
			.expect("Minimal token response should deserialize.");

		assert_eq!(token.access_token.secret(), "abc");
		assert!(token.token_type.is_none());
		assert!(token.id_token.is_none());
		assert!(serde_json::from_str::<TokenResponse>("{\"token_type\":\"Bearer\"}").is_err());
	}

	#[test]
	fn token_response_debug_redacts_access_token() {
		let token: TokenResponse =
			serde_json::from_str("{\"access_token\":\"very-secret\",\"token_type\":\"Bearer\"}")
				.expect("Token response should deserialize.");

		assert!(!format!("{token:?}").contains("very-secret"));
	}
}

//! Validated OneClick client configuration.

// crates.io
use oauth2::{ClientId, ClientSecret};
// self
use crate::{_prelude::*, error::ConfigError};

/// Production authorization endpoint.
pub const DEFAULT_AUTHORIZATION_ENDPOINT: &str = "https://launchpad.classlink.com/oauth2/v2/auth";
/// Production token endpoint.
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://launchpad.classlink.com/oauth2/v2/token";
/// Production info API base.
pub const DEFAULT_INFO_ENDPOINT: &str = "https://nodeapi.classlink.com/";

/// Client credentials and endpoints used by [`OneClick`](crate::oneclick::OneClick).
#[derive(Clone, Debug)]
pub struct OneClickConfig {
	client_id: ClientId,
	client_secret: ClientSecret,
	authorization_endpoint: Url,
	token_endpoint: Url,
	info_endpoint: Url,
}
impl OneClickConfig {
	/// Creates a builder seeded with the client credentials and the production endpoints.
	pub fn builder(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> OneClickConfigBuilder {
		OneClickConfigBuilder::new(client_id, client_secret)
	}

	/// OAuth 2.0 client identifier.
	pub fn client_id(&self) -> &ClientId {
		&self.client_id
	}

	/// OAuth 2.0 client secret.
	pub fn client_secret(&self) -> &ClientSecret {
		&self.client_secret
	}

	/// Endpoint users are redirected to for consent.
	pub fn authorization_endpoint(&self) -> &Url {
		&self.authorization_endpoint
	}

	/// Endpoint that trades authorization codes for tokens.
	pub fn token_endpoint(&self) -> &Url {
		&self.token_endpoint
	}

	/// Base URL that info API paths are joined onto. Always ends with `/`.
	pub fn info_endpoint(&self) -> &Url {
		&self.info_endpoint
	}
}

/// Builder for [`OneClickConfig`] values.
#[derive(Debug)]
pub struct OneClickConfigBuilder {
	client_id: String,
	client_secret: String,
	authorization_endpoint: Option<Url>,
	token_endpoint: Option<Url>,
	info_endpoint: Option<Url>,
}
impl OneClickConfigBuilder {
	/// Creates a builder with the given credentials and no endpoint overrides.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			authorization_endpoint: None,
			token_endpoint: None,
			info_endpoint: None,
		}
	}

	/// Overrides the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = Some(url);

		self
	}

	/// Overrides the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Overrides the info API base.
	pub fn info_endpoint(mut self, url: Url) -> Self {
		self.info_endpoint = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	///
	/// Every endpoint must be `http` or `https`. The info endpoint must be usable as a base URL;
	/// a trailing `/` is appended to its path when missing so relative API paths extend it.
	pub fn build(self) -> Result<OneClickConfig, ConfigError> {
		let authorization_endpoint =
			endpoint_or_default(self.authorization_endpoint, DEFAULT_AUTHORIZATION_ENDPOINT)?;
		let token_endpoint = endpoint_or_default(self.token_endpoint, DEFAULT_TOKEN_ENDPOINT)?;
		let mut info_endpoint = endpoint_or_default(self.info_endpoint, DEFAULT_INFO_ENDPOINT)?;

		if info_endpoint.cannot_be_a_base() {
			return Err(ConfigError::CannotBeABase {
				endpoint: "info",
				url: info_endpoint.to_string(),
			});
		}

		validate_scheme("authorization", &authorization_endpoint)?;
		validate_scheme("token", &token_endpoint)?;
		validate_scheme("info", &info_endpoint)?;

		if !info_endpoint.path().ends_with('/') {
			let path = format!("{}/", info_endpoint.path());

			info_endpoint.set_path(&path);
		}

		Ok(OneClickConfig {
			client_id: ClientId::new(self.client_id),
			client_secret: ClientSecret::new(self.client_secret),
			authorization_endpoint,
			token_endpoint,
			info_endpoint,
		})
	}
}

fn endpoint_or_default(url: Option<Url>, default: &str) -> Result<Url, ConfigError> {
	match url {
		Some(url) => Ok(url),
		None => Url::parse(default).map_err(|source| ConfigError::invalid_url(default, source)),
	}
}

fn validate_scheme(name: &'static str, url: &Url) -> Result<(), ConfigError> {
	match url.scheme() {
		"http" | "https" => Ok(()),
		_ => Err(ConfigError::UnsupportedScheme { endpoint: name, url: url.to_string() }),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(raw: &str) -> Url {
		Url::parse(raw).expect("Fixture URL should parse successfully.")
	}

	#[test]
	fn builder_defaults_to_production_endpoints() {
		let config = OneClickConfig::builder("client", "secret")
			.build()
			.expect("Default configuration should build successfully.");

		assert_eq!(config.client_id().as_str(), "client");
		assert_eq!(config.client_secret().secret(), "secret");
		assert_eq!(config.authorization_endpoint().as_str(), DEFAULT_AUTHORIZATION_ENDPOINT);
		assert_eq!(config.token_endpoint().as_str(), DEFAULT_TOKEN_ENDPOINT);
		assert_eq!(config.info_endpoint().as_str(), DEFAULT_INFO_ENDPOINT);
	}

	#[test]
	fn builder_rejects_unsupported_schemes() {
		let err = OneClickConfig::builder("client", "secret")
			.token_endpoint(url("ftp://launchpad.example.com/token"))
			.build()
			.expect_err("Non-HTTP token endpoints should be rejected.");

		assert!(matches!(err, ConfigError::UnsupportedScheme { endpoint: "token", .. }));
	}

	#[test]
	fn builder_rejects_info_endpoints_that_cannot_be_a_base() {
		let err = OneClickConfig::builder("client", "secret")
			.info_endpoint(url("data:text/plain,hello"))
			.build()
			.expect_err("Opaque info endpoints should be rejected.");

		assert!(matches!(err, ConfigError::CannotBeABase { endpoint: "info", .. }));
	}

	#[test]
	fn builder_appends_trailing_slash_to_info_base() {
		let config = OneClickConfig::builder("client", "secret")
			.info_endpoint(url("http://127.0.0.1:8080/nodeapi"))
			.build()
			.expect("Info endpoint without trailing slash should be accepted.");

		assert_eq!(config.info_endpoint().as_str(), "http://127.0.0.1:8080/nodeapi/");
	}

	#[test]
	fn config_debug_redacts_secret() {
		let config = OneClickConfig::builder("client", "top-secret")
			.build()
			.expect("Default configuration should build successfully.");

		assert!(!format!("{config:?}").contains("top-secret"));
	}
}

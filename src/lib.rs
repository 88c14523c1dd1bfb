//! ClassLink API clients: OAuth 1.0a HMAC-SHA256 request signing for OneRoster rosters and the
//! OAuth 2.0 OneClick authorization-code helpers, both running over a pluggable HTTP transport.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod error;
pub mod http;
pub mod oauth1;
pub mod obs;
pub mod oneclick;
#[cfg(feature = "reqwest")]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests, available whenever the default
	//! `reqwest` transport is compiled in.

	pub use crate::_prelude::*;

	// self
	use crate::{
		http::ReqwestHttpClient,
		oauth1::{Credentials, RequestSigner},
		oneclick::{OneClick, OneClickConfig},
	};

	/// Signer type alias used by reqwest-backed integration tests.
	pub type ReqwestTestSigner = RequestSigner<ReqwestHttpClient>;
	/// OneClick type alias used by reqwest-backed integration tests.
	pub type ReqwestTestOneClick = OneClick<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`RequestSigner`] for the provided consumer credentials backed by the
	/// reqwest transport used across integration tests.
	pub fn build_reqwest_test_signer(consumer_key: &str, consumer_secret: &str) -> ReqwestTestSigner {
		RequestSigner::with_http_client(
			Credentials::new(consumer_key, consumer_secret),
			test_reqwest_http_client(),
		)
	}

	/// Constructs a [`OneClick`] client whose endpoints all point at `base` (an `httpmock`
	/// server URL ending in `/`).
	pub fn build_reqwest_test_oneclick(
		base: &str,
		client_id: &str,
		client_secret: &str,
	) -> ReqwestTestOneClick {
		let config = OneClickConfig::builder(client_id, client_secret)
			.authorization_endpoint(
				Url::parse(&format!("{base}oauth2/v2/auth"))
					.expect("Mock authorization endpoint should parse successfully."),
			)
			.token_endpoint(
				Url::parse(&format!("{base}oauth2/v2/token"))
					.expect("Mock token endpoint should parse successfully."),
			)
			.info_endpoint(Url::parse(base).expect("Mock info endpoint should parse successfully."))
			.build()
			.expect("OneClick configuration should build successfully.");

		OneClick::with_http_client(config, test_reqwest_http_client())
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};

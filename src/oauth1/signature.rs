//! Base string construction, HMAC-SHA256 signing, and `Authorization` header assembly.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	oauth1::{
		OAuthParameters,
		encoding::{percent_encode, percent_encode_plus},
	},
};

type HmacSha256 = Hmac<Sha256>;

/// Prefix of the `Authorization` header value.
pub const OAUTH_HEADER_PREFIX: &str = "OAuth ";

/// Builds the signature base string.
///
/// Entries are emitted in key order as `key=value` with strictly encoded values (keys are not
/// encoded), joined by `&`. The method is used verbatim; the base URL and the joined entries are
/// then form-encoded and the three segments joined by `&`.
pub fn base_string(method: &str, base_url: &str, params: &BTreeMap<String, String>) -> String {
	let joined = params
		.iter()
		.map(|(key, value)| format!("{key}={}", percent_encode(value)))
		.collect::<Vec<_>>()
		.join("&");

	format!("{method}&{}&{}", percent_encode_plus(base_url), percent_encode_plus(&joined))
}

/// HMAC key for 2-legged requests: the encoded consumer secret followed by `&` and an empty
/// token secret.
pub fn composite_key(consumer_secret: &str) -> String {
	format!("{}&", percent_encode_plus(consumer_secret))
}

/// Signs `base_string` with `composite_key` and returns the padded standard base64 digest.
pub fn sign_base_string(base_string: &str, composite_key: &str) -> Result<String> {
	let mut mac = <HmacSha256 as Mac>::new_from_slice(composite_key.as_bytes())
		.map_err(|_| ConfigError::InvalidSigningKey)?;

	mac.update(base_string.as_bytes());

	Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Renders the `Authorization` header value for `oauth`, keeping header order.
pub fn authorization_header(oauth: &OAuthParameters) -> String {
	let values = oauth
		.pairs()
		.into_iter()
		.map(|(key, value)| format!("{key}=\"{}\"", percent_encode_plus(value)))
		.collect::<Vec<_>>()
		.join(",");

	format!("{OAUTH_HEADER_PREFIX}{values}")
}

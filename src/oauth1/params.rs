//! Query and OAuth protocol parameters.

// self
use crate::{_prelude::*, oauth1::encoding};

/// Pseudo-key under which malformed query tokens are stored.
pub const FILTER_KEY: &str = "filter";
/// `oauth_consumer_key` parameter name.
pub const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
/// `oauth_signature_method` parameter name.
pub const OAUTH_SIGNATURE_METHOD: &str = "oauth_signature_method";
/// `oauth_timestamp` parameter name.
pub const OAUTH_TIMESTAMP: &str = "oauth_timestamp";
/// `oauth_nonce` parameter name.
pub const OAUTH_NONCE: &str = "oauth_nonce";
/// `oauth_signature` parameter name.
pub const OAUTH_SIGNATURE: &str = "oauth_signature";
/// The only signature method OneRoster accepts from this client.
pub const SIGNATURE_METHOD_HMAC_SHA256: &str = "HMAC-SHA256";

// Leading characters dropped from a malformed token, whatever they are. Sized to strip a
// `filter=`-style prefix, but no prefix check is made.
const FILTER_PREFIX_LEN: usize = 7;

/// Splits `url` on the first `?` into the base URL and the raw query string, if any.
pub fn split_url(url: &str) -> (&str, Option<&str>) {
	match url.split_once('?') {
		Some((base, query)) => (base, Some(query)),
		None => (url, None),
	}
}

/// Query parameters lifted out of a roster URL.
///
/// Keys are unique (last write wins) and iterate in byte order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParameters(BTreeMap<String, String>);
impl QueryParameters {
	/// Parses a raw query string (without the leading `?`).
	///
	/// Each `&`-separated token is percent-decoded before it is split on `=`. A decoded token
	/// that is exactly one `key=value` pair is stored as such. Anything else (no `=` at all, or
	/// several of them, as in `filter=status='active'`) is treated as a OneRoster filter
	/// expression: it is stored under [`FILTER_KEY`] with its first seven characters removed.
	/// Empty tokens (a trailing `&`, `&&`, or a bare `?`) count as malformed and yield an empty
	/// filter, which is then signed and sent like any other parameter.
	///
	/// The filter rule is a pass-through for OneRoster's `filter=` syntax, not OAuth behavior.
	/// Any other `=`-less token is mangled into a bogus filter value.
	pub fn parse(raw: &str) -> Self {
		let mut params = BTreeMap::new();

		for token in raw.split('&') {
			let decoded = encoding::percent_decode(token);
			let mut parts = decoded.split('=');

			match (parts.next(), parts.next(), parts.next()) {
				(Some(key), Some(value), None) => {
					params.insert(key.to_owned(), value.to_owned());
				},
				_ => {
					params.insert(FILTER_KEY.to_owned(), filter_value(&decoded));
				},
			}
		}

		Self(params)
	}

	/// Returns the value stored for `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Iterates over `(key, value)` pairs in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
	}

	/// Number of distinct keys.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no parameters were parsed.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

fn filter_value(decoded: &str) -> String {
	decoded.chars().skip(FILTER_PREFIX_LEN).collect()
}

/// OAuth protocol parameters for one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthParameters {
	/// Consumer key identifying the client.
	pub consumer_key: String,
	/// Unix timestamp in decimal.
	pub timestamp: String,
	/// Random per-request nonce.
	pub nonce: String,
	/// Base64 HMAC-SHA256 signature, present once the request is signed.
	pub signature: Option<String>,
}
impl OAuthParameters {
	/// Creates unsigned parameters.
	pub fn new(
		consumer_key: impl Into<String>,
		timestamp: impl Into<String>,
		nonce: impl Into<String>,
	) -> Self {
		Self {
			consumer_key: consumer_key.into(),
			timestamp: timestamp.into(),
			nonce: nonce.into(),
			signature: None,
		}
	}

	/// Always [`SIGNATURE_METHOD_HMAC_SHA256`].
	pub fn signature_method(&self) -> &'static str {
		SIGNATURE_METHOD_HMAC_SHA256
	}

	/// Parameters in header order: consumer key, signature method, timestamp, nonce, then the
	/// signature when present.
	pub fn pairs(&self) -> Vec<(&'static str, &str)> {
		let mut pairs = vec![
			(OAUTH_CONSUMER_KEY, self.consumer_key.as_str()),
			(OAUTH_SIGNATURE_METHOD, self.signature_method()),
			(OAUTH_TIMESTAMP, self.timestamp.as_str()),
			(OAUTH_NONCE, self.nonce.as_str()),
		];

		if let Some(signature) = &self.signature {
			pairs.push((OAUTH_SIGNATURE, signature.as_str()));
		}

		pairs
	}

	/// Combined signing set: the unsigned OAuth parameters overlaid by `query`, so query values
	/// win on key collisions.
	pub fn merge(&self, query: &QueryParameters) -> BTreeMap<String, String> {
		let mut merged = self
			.pairs()
			.into_iter()
			.filter(|(key, _)| *key != OAUTH_SIGNATURE)
			.map(|(key, value)| (key.to_owned(), value.to_owned()))
			.collect::<BTreeMap<_, _>>();

		for (key, value) in query.iter() {
			merged.insert(key.to_owned(), value.to_owned());
		}

		merged
	}
}

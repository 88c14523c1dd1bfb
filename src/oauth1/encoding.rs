//! Percent-encoding helpers used while building signature base strings and headers.
//!
//! Two encoders are in play and they are not interchangeable: parameter values inside the base
//! string use [`percent_encode`] (space as `%20`), while the outer base string segments, the
//! composite key, and header values use [`percent_encode_plus`] (space as `+`).

// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

// https://tools.ietf.org/html/rfc3986#section-2.3
// * ALPHA, DIGIT, '-', '.', '_', '~' MUST NOT be encoded.
// * All other characters MUST be encoded.
// * The two hexadecimal characters used to represent encoded
//   characters MUST be uppercase.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Strict RFC 3986 encoding: unreserved characters pass through, everything else (including
/// space) becomes an uppercase `%XX` triplet.
pub fn percent_encode(input: &str) -> String {
	utf8_percent_encode(input, UNRESERVED).to_string()
}

/// Form-style encoding: identical to [`percent_encode`] except that space becomes `+`.
///
/// A literal `+` is encoded as `%2B` first, so rewriting `%20` afterwards cannot collide.
pub fn percent_encode_plus(input: &str) -> String {
	percent_encode(input).replace("%20", "+")
}

/// Decodes `%XX` triplets, replacing invalid UTF-8 with U+FFFD. `+` is left untouched.
pub fn percent_decode(input: &str) -> String {
	percent_decode_str(input).decode_utf8_lossy().into_owned()
}

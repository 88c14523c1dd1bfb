//! 2-legged OAuth 1.0a (HMAC-SHA256) request signing for OneRoster roster calls.
//!
//! A [`RequestSigner`] owns the consumer [`Credentials`] and a transport. Each call generates a
//! fresh timestamp and nonce, merges them with the query parameters found in the target URL,
//! signs the canonical base string, and sends a GET carrying the resulting `Authorization`
//! header. The individual algorithm steps are exposed as free functions so callers can reproduce
//! or verify a signature offline.

pub mod encoding;
pub mod params;
pub mod signature;
pub mod signer;

pub use encoding::*;
pub use params::*;
pub use signature::*;
pub use signer::*;

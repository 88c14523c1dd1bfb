//! Optional observability helpers for API calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `classlink_oauth.request` with the `request`
//!   (call kind) and `stage` (call site) fields, plus a `warn` event whenever a roster failure is
//!   folded into the sentinel response.
//! - Enable `metrics` to increment the `classlink_oauth_request_total` counter for every
//!   attempt/success/failure, labeled by `request` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// API call kinds observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
	/// OAuth 1.0a signed OneRoster GET.
	Roster,
	/// OneClick authorization-code exchange.
	CodeExchange,
	/// OneClick bearer-authenticated info lookup.
	Info,
}
impl RequestKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestKind::Roster => "roster",
			RequestKind::CodeExchange => "code_exchange",
			RequestKind::Info => "info",
		}
	}
}
impl Display for RequestKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller (or folded into a sentinel).
	Failure,
}
impl RequestOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOutcome::Attempt => "attempt",
			RequestOutcome::Success => "success",
			RequestOutcome::Failure => "failure",
		}
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside a span for `kind`/`stage` and records attempt plus success/failure.
pub(crate) async fn observe<T, Fut>(kind: RequestKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = RequestSpan::new(kind, stage);

	record_request_outcome(kind, RequestOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_request_outcome(kind, RequestOutcome::Success),
		Err(_) => record_request_outcome(kind, RequestOutcome::Failure),
	}

	result
}

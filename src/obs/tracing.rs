// self
use crate::{_prelude::*, obs::RequestKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedRequest<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRequest<F> = F;

/// Span covering one roster or OneClick call.
#[derive(Clone, Debug)]
pub struct RequestSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RequestSpan {
	/// Opens a `classlink_oauth.request` span for `kind` at call site `stage`.
	pub fn new(kind: RequestKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("classlink_oauth.request", request = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Runs `fut` inside this span; the span is entered on every poll.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRequest<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs an error that is being replaced by a sentinel value instead of propagated.
pub fn record_swallowed_error(kind: RequestKind, err: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			request = kind.as_str(),
			error = %err,
			"Request failed; returning sentinel response."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, err);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn swallowed_errors_are_accepted() {
		let err = crate::error::TransportError::Other { message: "refused".into() }.into();

		record_swallowed_error(RequestKind::Roster, &err);
	}

	#[tokio::test]
	async fn instrumented_roster_future_keeps_its_output() {
		let span = RequestSpan::new(RequestKind::Roster, "sign_and_send");
		let value = span.instrument(async { "signed" }).await;

		assert_eq!(value, "signed");
	}
}

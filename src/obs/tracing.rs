//! `chainsync_client.call` spans around sends, refreshes, and auth calls.
//!
//! Each span carries the operation, the call site, and (once the call settles) its outcome.
//! Without the `tracing` feature every helper compiles to a passthrough.

// self
use crate::{
	_prelude::*,
	obs::{CallOutcome, Operation},
};

/// Future returned by [`CallSpan::instrument`]: instrumented with `tracing`, bare otherwise.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`CallSpan::instrument`]: instrumented with `tracing`, bare otherwise.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// Span covering one client call.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Opens a span for `op` issued from `stage`; the `outcome` field starts empty.
	pub fn new(op: Operation, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"chainsync_client.call",
				op = op.as_str(),
				stage,
				outcome = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (op, stage);

			Self {}
		}
	}

	/// Runs `call` inside the span without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, call: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			call.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			call
		}
	}

	/// Fills the span's `outcome` field once the call has settled.
	pub fn record_outcome(&self, outcome: CallOutcome) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("outcome", outcome.as_str());
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = outcome;
		}
	}
}

/// Emits a `warn` event noting that stored credentials were discarded.
pub fn record_credentials_cleared(reason: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(reason, "stored credentials cleared");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = reason;
	}
}

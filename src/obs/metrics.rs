// self
use crate::obs::{CallOutcome, Operation};

/// Records a call outcome via the global metrics recorder (when enabled).
pub fn record_call_outcome(op: Operation, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"chainsync_client_call_total",
			"op" => op.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (op, outcome);
	}
}

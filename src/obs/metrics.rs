// self
use crate::{
	obs::{CallOutcomeKind, TransportKind},
	pipeline::ReconfigureOutcome,
};

/// Records a call outcome via the global metrics recorder (when enabled).
pub fn record_call_outcome(kind: TransportKind, outcome: CallOutcomeKind) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"binance_rest_binder_call_total",
			"transport" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records a shared-pipeline reconfiguration via the global metrics recorder (when enabled).
pub fn record_reconfiguration(outcome: ReconfigureOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("binance_rest_binder_reconfigure_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

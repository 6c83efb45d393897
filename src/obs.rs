//! Optional observability helpers for bound calls and pipeline reconfiguration.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `binance_rest_binder.call` with the
//!   `transport` and `path` fields, plus debug events whenever the shared pipeline is
//!   reconfigured.
//! - Enable `metrics` to increment the `binance_rest_binder_call_total` counter for every
//!   attempt/success/failure, labeled by `transport` + `outcome`, and the
//!   `binance_rest_binder_reconfigure_total` counter labeled by `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Dispatch mechanism behind a pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransportKind {
	/// Synchronous I/O on the caller's thread.
	Blocking,
	/// I/O driven by a caller-supplied reactor.
	EventLoop,
}
impl TransportKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TransportKind::Blocking => "blocking",
			TransportKind::EventLoop => "event_loop",
		}
	}
}
impl Display for TransportKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcomeKind {
	/// Entry to the invoker.
	Attempt,
	/// Decoded payload returned to the caller.
	Success,
	/// Structured API failure.
	ApiFailure,
	/// Transport, decode, or local configuration failure.
	TransportFailure,
}
impl CallOutcomeKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcomeKind::Attempt => "attempt",
			CallOutcomeKind::Success => "success",
			CallOutcomeKind::ApiFailure => "api_failure",
			CallOutcomeKind::TransportFailure => "transport_failure",
		}
	}
}
impl Display for CallOutcomeKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

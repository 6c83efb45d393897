// self
use crate::{
	_prelude::*,
	obs::TransportKind,
	pipeline::ReconfigureOutcome,
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type SpannedTransportFuture<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type SpannedTransportFuture<F> = F;

/// A span builder used around every bound call.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the transport kind + endpoint path.
	pub fn new(kind: TransportKind, path: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("binance_rest_binder.call", transport = kind.as_str(), path);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, path);

			Self {}
		}
	}

	/// Returns the span of the current call context, so work handed to a reactor stays
	/// attributed to the caller's span.
	pub fn current() -> Self {
		#[cfg(feature = "tracing")]
		{
			Self { span: tracing::Span::current() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			Self {}
		}
	}

	/// Enters the span for synchronous sections.
	pub fn entered(self) -> EnteredCallSpan {
		#[cfg(feature = "tracing")]
		{
			EnteredCallSpan { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			EnteredCallSpan {}
		}
	}

	/// Instruments a future without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> SpannedTransportFuture<Fut>
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

/// RAII guard returned by [`CallSpan::entered`].
pub struct EnteredCallSpan {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for EnteredCallSpan {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("EnteredCallSpan(..)")
	}
}

/// Emits a debug event describing a shared-pipeline reconfiguration.
pub fn trace_reconfiguration(outcome: ReconfigureOutcome, api_key: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(outcome = outcome.as_str(), api_key, "shared pipeline reconfigured");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (outcome, api_key);
	}
}

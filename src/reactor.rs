//! Event-loop transport: calls are dispatched onto a caller-supplied reactor while the
//! invoking thread parks until the reactor reports completion.
//!
//! [`Reactor`] is the seam: anything that can hand out an [`AsyncTransport`] and drive its
//! futures qualifies. [`TokioReactor`] (feature `tokio`) adapts a
//! [`tokio::runtime::Handle`] and, by default, a reqwest async client.

// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
	http::{ApiRequest, AsyncTransport, HttpResponse, HttpTransport, TransportFuture},
	obs::CallSpan,
};

/// An event loop that owns HTTP I/O for event-loop pipelines.
pub trait Reactor
where
	Self: 'static + Send + Sync,
{
	/// Creates an HTTP client bound to this event loop.
	fn create_client(&self) -> Result<Arc<dyn AsyncTransport>, ConfigError>;

	/// Drives `call` to completion on the reactor, parking the calling thread meanwhile.
	fn run(&self, call: TransportFuture) -> Result<HttpResponse, TransportError>;
}

/// Blocking facade over a reactor and the client it created.
///
/// This is what event-loop pipelines dispatch through, so the invoker's blocking contract is
/// identical for both transport variants.
pub struct ReactorTransport {
	reactor: Arc<dyn Reactor>,
	client: Arc<dyn AsyncTransport>,
}
impl ReactorTransport {
	/// Asks `reactor` for a client and wraps both.
	pub fn new(reactor: Arc<dyn Reactor>) -> Result<Self, ConfigError> {
		let client = reactor.create_client()?;

		Ok(Self { reactor, client })
	}
}
impl HttpTransport for ReactorTransport {
	fn execute(&self, request: ApiRequest) -> Result<HttpResponse, TransportError> {
		let call = CallSpan::current().instrument(self.client.call(request));

		self.reactor.run(Box::pin(call))
	}
}

#[cfg(feature = "tokio")]
pub use tokio_reactor::TokioReactor;

#[cfg(feature = "tokio")]
mod tokio_reactor {
	// crates.io
	use tokio::{runtime::Handle, sync::oneshot};
	// self
	use super::*;
	use crate::http::ReqwestAsyncTransport;

	/// [`Reactor`] backed by a Tokio runtime handle.
	///
	/// [`Reactor::run`] parks the calling thread on a oneshot channel while the call runs on
	/// the runtime. Called from within an asynchronous execution context it returns
	/// [`TransportError::BlockingInAsyncContext`] without dispatching. Any thread that has
	/// entered a runtime context counts, `spawn_blocking` workers included; call bound services
	/// from plain threads.
	#[derive(Clone)]
	pub struct TokioReactor {
		handle: Handle,
		client: Option<Arc<dyn AsyncTransport>>,
	}
	impl TokioReactor {
		/// Uses `handle` and a fresh reqwest client per pipeline.
		pub fn new(handle: Handle) -> Self {
			Self { handle, client: None }
		}

		/// Uses `handle` and hands out `client` instead of building a reqwest client.
		pub fn with_client(handle: Handle, client: Arc<dyn AsyncTransport>) -> Self {
			Self { handle, client: Some(client) }
		}

		/// Returns the runtime handle calls are spawned onto.
		pub fn handle(&self) -> &Handle {
			&self.handle
		}
	}
	impl Reactor for TokioReactor {
		fn create_client(&self) -> Result<Arc<dyn AsyncTransport>, ConfigError> {
			match &self.client {
				Some(client) => Ok(Arc::clone(client)),
				None => Ok(Arc::new(ReqwestAsyncTransport::with_client(
					reqwest::Client::builder().build()?,
				))),
			}
		}

		fn run(&self, call: TransportFuture) -> Result<HttpResponse, TransportError> {
			if Handle::try_current().is_ok() {
				return Err(TransportError::BlockingInAsyncContext);
			}

			let (tx, rx) = oneshot::channel();

			self.handle.spawn(async move {
				let _ = tx.send(call.await);
			});

			rx.blocking_recv().map_err(|_| TransportError::ReactorShutdown)?
		}
	}
	impl Debug for TokioReactor {
		fn fmt(&self, f: &mut Formatter) -> FmtResult {
			f.debug_struct("TokioReactor")
				.field("flavor", &self.handle.runtime_flavor())
				.field("custom_client", &self.client.is_some())
				.finish()
		}
	}
}

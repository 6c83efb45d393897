//! Service factory that owns the shared pipeline and applies the reconfiguration policy.
//!
//! The binder keeps one shared [`PipelineConfig`] and the [`Pipeline`] last built from it.
//! Authenticated binds install credentials into the shared config and rebuild only when they
//! differ from the installed ones; the read, compare, install, and rebuild steps run inside a
//! single critical section, so concurrent binds always observe a fully built pipeline and the
//! config never carries more than one authentication stage.
//!
//! Reactor binds are the exception: they build a private pipeline from a snapshot of the
//! shared config and never touch shared state.

// self
use crate::{
	_prelude::*,
	auth::Credentials,
	error::TransportError,
	http::{HttpResponse, HttpTransport},
	invoke::{self, ApiErrorBody},
	obs,
	pipeline::{Pipeline, PipelineConfig, ReconfigureOutcome, TransportBuilder, TransportVariant},
	reactor::Reactor,
	service::{ApiService, ServiceClient},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestBlockingTransport;

struct SharedPipeline {
	config: PipelineConfig,
	pipeline: Arc<Pipeline>,
}

/// Binds [`ApiService`] implementations to pipelines.
pub struct ServiceBinder {
	transport: Arc<dyn HttpTransport>,
	shared: Mutex<SharedPipeline>,
}
impl ServiceBinder {
	/// Creates a binder for the Binance spot API using the reqwest blocking transport.
	#[cfg(feature = "reqwest")]
	pub fn new() -> Result<Self> {
		Self::with_config(PipelineConfig::builder().build()?)
	}

	/// Creates a binder for `config` using the reqwest blocking transport.
	#[cfg(feature = "reqwest")]
	pub fn with_config(config: PipelineConfig) -> Result<Self> {
		Self::with_transport(config, Arc::new(ReqwestBlockingTransport::new()?))
	}

	/// Creates a binder for `config` dispatching through `transport`.
	///
	/// Any credentials already installed in `config` are kept, so the first shared pipeline
	/// may be authenticated from the start.
	pub fn with_transport(config: PipelineConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
		let pipeline = Self::build_blocking(&config, &transport)?;

		Ok(Self { transport, shared: Mutex::new(SharedPipeline { config, pipeline }) })
	}

	/// Returns the currently shared pipeline.
	pub fn shared_pipeline(&self) -> Arc<Pipeline> {
		Arc::clone(&self.shared.lock().pipeline)
	}

	/// Binds `S` to the currently shared pipeline, authenticated or not.
	pub fn bind<S>(&self) -> S
	where
		S: ApiService,
	{
		S::from_client(ServiceClient::new(self.shared_pipeline()))
	}

	/// Installs `credentials` into the shared pipeline (rebuilding it only when they changed)
	/// and binds `S` to the result.
	pub fn bind_authenticated<S>(&self, credentials: &Credentials) -> Result<S>
	where
		S: ApiService,
	{
		let (_, pipeline) = self.reconfigure(credentials)?;

		Ok(S::from_client(ServiceClient::new(pipeline)))
	}

	/// Binds `S`, authenticating first when `credentials` are present.
	pub fn bind_optional<S>(&self, credentials: Option<&Credentials>) -> Result<S>
	where
		S: ApiService,
	{
		match credentials {
			Some(credentials) => self.bind_authenticated(credentials),
			None => Ok(self.bind()),
		}
	}

	/// Binds `S` to a fresh event-loop pipeline driven by `reactor`.
	///
	/// The pipeline is built from a snapshot of the shared config with its authentication slot
	/// cleared, then `credentials` (if any) are installed into the snapshot only. It is never
	/// cached, and the shared pipeline is left untouched.
	pub fn bind_on_reactor<S, R>(&self, credentials: Option<&Credentials>, reactor: R) -> Result<S>
	where
		S: ApiService,
		R: Reactor,
	{
		let mut config = self.shared.lock().config.without_auth();

		if let Some(credentials) = credentials {
			config.install_auth(credentials);
		}

		let pipeline =
			TransportBuilder::new(config, TransportVariant::EventLoop(Arc::new(reactor))).build()?;

		Ok(S::from_client(ServiceClient::new(Arc::new(pipeline))))
	}

	/// Runs the reconfiguration policy against the shared pipeline without binding anything.
	pub fn authenticate(&self, credentials: &Credentials) -> Result<ReconfigureOutcome> {
		self.reconfigure(credentials).map(|(outcome, _)| outcome)
	}

	/// Decodes a failure response body using the shared pipeline's codec.
	pub fn decode_api_error(&self, response: &HttpResponse) -> Result<ApiErrorBody, TransportError> {
		invoke::decode_api_error(self.shared.lock().pipeline.codec(), response)
	}

	fn reconfigure(&self, credentials: &Credentials) -> Result<(ReconfigureOutcome, Arc<Pipeline>)> {
		let mut shared = self.shared.lock();
		let mut config = shared.config.clone();
		let outcome = config.install_auth(credentials);

		if outcome.requires_rebuild() {
			let pipeline = Self::build_blocking(&config, &self.transport)?;

			*shared = SharedPipeline { config, pipeline };
		}

		obs::record_reconfiguration(outcome);
		obs::trace_reconfiguration(outcome, credentials.api_key());

		Ok((outcome, Arc::clone(&shared.pipeline)))
	}

	fn build_blocking(
		config: &PipelineConfig,
		transport: &Arc<dyn HttpTransport>,
	) -> Result<Arc<Pipeline>> {
		let variant = TransportVariant::Blocking(Arc::clone(transport));

		Ok(Arc::new(TransportBuilder::new(config.clone(), variant).build()?))
	}
}
impl Debug for ServiceBinder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let shared = self.shared.lock();

		f.debug_struct("ServiceBinder")
			.field("pipeline", &shared.pipeline)
			.field("api_key", &shared.config.installed_credentials().map(Credentials::api_key))
			.finish()
	}
}

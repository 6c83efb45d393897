//! Immutable request-dispatch pipelines and the builder that produces them.
//!
//! A [`PipelineConfig`] is the mutable source of truth (base URL, codec, interceptor chain);
//! [`TransportBuilder`] snapshots it together with a [`TransportVariant`] into a [`Pipeline`].
//! Pipelines are never mutated after construction: reconfiguring means building a new one.

pub mod codec;
pub mod config;

pub use codec::*;
pub use config::*;

// self
use crate::{
	_prelude::*,
	auth::{AuthInterceptor, RequestInterceptor},
	error::{ConfigError, TransportError},
	http::{ApiRequest, HttpResponse, HttpTransport},
	obs::TransportKind,
	reactor::{Reactor, ReactorTransport},
	service::Endpoint,
};

/// Low-level dispatch mechanism a pipeline is built around.
#[derive(Clone)]
pub enum TransportVariant {
	/// Synchronous I/O performed on the caller's thread.
	Blocking(Arc<dyn HttpTransport>),
	/// I/O dispatched onto a caller-supplied reactor; callers still block until completion.
	EventLoop(Arc<dyn Reactor>),
}
impl TransportVariant {
	/// Returns the label for this variant.
	pub fn kind(&self) -> TransportKind {
		match self {
			Self::Blocking(_) => TransportKind::Blocking,
			Self::EventLoop(_) => TransportKind::EventLoop,
		}
	}
}
impl Debug for TransportVariant {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "TransportVariant::{}", self.kind())
	}
}

/// Builds [`Pipeline`] snapshots from a config and a transport variant.
#[derive(Debug)]
pub struct TransportBuilder {
	config: PipelineConfig,
	variant: TransportVariant,
}
impl TransportBuilder {
	/// Creates a builder for the given config and variant.
	pub fn new(config: PipelineConfig, variant: TransportVariant) -> Self {
		Self { config, variant }
	}

	/// Consumes the builder and assembles the pipeline.
	///
	/// The event-loop variant asks the reactor for its HTTP client here, once per pipeline.
	pub fn build(self) -> Result<Pipeline> {
		let kind = self.variant.kind();
		let transport: Arc<dyn HttpTransport> = match self.variant {
			TransportVariant::Blocking(transport) => transport,
			TransportVariant::EventLoop(reactor) => Arc::new(ReactorTransport::new(reactor)?),
		};
		let chain = self.config.chain();

		Ok(Pipeline { config: self.config, chain, transport, kind })
	}
}

/// Fully configured, immutable request-dispatch object.
///
/// Shared through `Arc<Pipeline>` by every service bound to it.
pub struct Pipeline {
	config: PipelineConfig,
	chain: Vec<Arc<dyn RequestInterceptor>>,
	transport: Arc<dyn HttpTransport>,
	kind: TransportKind,
}
impl Pipeline {
	/// Returns the config snapshot this pipeline was built from.
	pub fn config(&self) -> &PipelineConfig {
		&self.config
	}

	/// Returns the base URL endpoint paths are joined onto.
	pub fn base_url(&self) -> &Url {
		&self.config.base_url
	}

	/// Returns the payload codec.
	pub fn codec(&self) -> JsonCodec {
		self.config.codec
	}

	/// Returns the dispatch mechanism label.
	pub fn kind(&self) -> TransportKind {
		self.kind
	}

	/// Returns the installed authentication stage, if any.
	pub fn auth(&self) -> Option<&AuthInterceptor> {
		self.config.auth()
	}

	/// Number of stages requests pass through, auth included.
	pub fn interceptor_count(&self) -> usize {
		self.chain.len()
	}

	/// Resolves an endpoint path against the base URL.
	pub fn resolve(&self, endpoint: &Endpoint) -> Result<Url, ConfigError> {
		self.config
			.base_url
			.join(endpoint.path)
			.map_err(|source| ConfigError::InvalidEndpoint { path: endpoint.path, source })
	}

	/// Runs the request through every interceptor stage, in order.
	pub fn prepare(&self, request: &ApiRequest) -> Result<ApiRequest> {
		let mut current = request.clone();

		for stage in &self.chain {
			current = stage.intercept(&current)?;
		}

		Ok(current)
	}

	/// Hands an already prepared request to the transport, blocking until it answers.
	pub fn send(&self, prepared: ApiRequest) -> Result<HttpResponse, TransportError> {
		self.transport.execute(prepared)
	}

	/// Prepares and dispatches the request, blocking until the transport answers.
	pub fn dispatch(&self, request: &ApiRequest) -> Result<HttpResponse> {
		let prepared = self.prepare(request)?;

		Ok(self.send(prepared)?)
	}
}
impl Debug for Pipeline {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Pipeline")
			.field("base_url", &self.config.base_url.as_str())
			.field("kind", &self.kind)
			.field("interceptors", &self.chain.len())
			.field("auth_set", &self.config.auth().is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use http::Method;
	// self
	use super::*;
	use crate::{_preludet::RecordingTransport, auth::Credentials, http::SecurityType};

	#[derive(Debug)]
	struct RecvWindow;
	impl RequestInterceptor for RecvWindow {
		fn intercept(&self, request: &ApiRequest) -> Result<ApiRequest> {
			let mut out = request.clone();

			out.url.query_pairs_mut().append_pair("recvWindow", "5000");

			Ok(out)
		}
	}

	fn pipeline(config: PipelineConfig, transport: Arc<RecordingTransport>) -> Pipeline {
		TransportBuilder::new(config, TransportVariant::Blocking(transport))
			.build()
			.expect("Blocking pipelines always build.")
	}

	#[test]
	fn caller_interceptors_run_before_signing() {
		let mut config = PipelineConfig::builder()
			.interceptor(RecvWindow)
			.build()
			.expect("Config should build.");

		config.install_auth(&Credentials::new("key", "secret").expect("Credentials should build."));

		let transport = RecordingTransport::ok();
		let pipeline = pipeline(config, transport.clone());
		let endpoint = Endpoint::get("/api/v3/account").signed();
		let mut url = pipeline.resolve(&endpoint).expect("Endpoint should resolve.");

		url.query_pairs_mut().append_pair("timestamp", "1");
		pipeline
			.dispatch(&ApiRequest::new(Method::GET, url, SecurityType::Signed))
			.expect("Recording transport should answer.");

		let sent = transport.last_request().expect("One request should be recorded.");
		let expected = crate::auth::sign("secret", "timestamp=1&recvWindow=5000");

		assert_eq!(pipeline.interceptor_count(), 2);
		assert_eq!(sent.query_param(crate::SIGNATURE_PARAM), Some(expected));
	}

	#[test]
	fn resolve_joins_paths_onto_base() {
		let config = PipelineConfig::builder()
			.base_url("https://testnet.binance.vision")
			.build()
			.expect("Config should build.");
		let pipeline = pipeline(config, RecordingTransport::ok());
		let url = pipeline.resolve(&Endpoint::get("/api/v3/time")).expect("Endpoint should resolve.");

		assert_eq!(url.as_str(), "https://testnet.binance.vision/api/v3/time");
		assert_eq!(pipeline.kind(), TransportKind::Blocking);
	}
}

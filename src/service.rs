//! Typed service bindings: endpoint descriptors, the bound client handle, and prepared calls.
//!
//! A service is any type implementing [`ApiService`]; the binder hands it a [`ServiceClient`]
//! and every operation the service describes becomes a [`Call`] constructor closing over the
//! owning [`Pipeline`]:
//!
//! ```
//! use binance_rest_binder::service::{ApiService, Call, Endpoint, ServiceClient};
//!
//! struct General(ServiceClient);
//! impl General {
//! 	const PING: Endpoint = Endpoint::get("/api/v3/ping");
//!
//! 	fn ping(&self) -> Call<serde_json::Value> {
//! 		self.0.call(Self::PING)
//! 	}
//! }
//! impl ApiService for General {
//! 	fn from_client(client: ServiceClient) -> Self {
//! 		Self(client)
//! 	}
//! }
//! ```

// crates.io
use http::{HeaderValue, Method, header::CONTENT_TYPE};
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	http::{ApiRequest, SecurityType},
	invoke::{self, CallOutcome},
	pipeline::{JsonCodec, Pipeline},
};

/// Static description of one remote operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
	/// HTTP method.
	pub method: Method,
	/// Path joined onto the pipeline's base URL.
	pub path: &'static str,
	/// Authentication requirement.
	pub security: SecurityType,
}
impl Endpoint {
	/// Describes a public endpoint.
	pub const fn new(method: Method, path: &'static str) -> Self {
		Self { method, path, security: SecurityType::None }
	}

	/// Public `GET` endpoint.
	pub const fn get(path: &'static str) -> Self {
		Self::new(Method::GET, path)
	}

	/// Public `POST` endpoint.
	pub const fn post(path: &'static str) -> Self {
		Self::new(Method::POST, path)
	}

	/// Public `PUT` endpoint.
	pub const fn put(path: &'static str) -> Self {
		Self::new(Method::PUT, path)
	}

	/// Public `DELETE` endpoint.
	pub const fn delete(path: &'static str) -> Self {
		Self::new(Method::DELETE, path)
	}

	/// Marks the endpoint as requiring the API key header.
	pub const fn with_api_key(mut self) -> Self {
		self.security = SecurityType::ApiKey;

		self
	}

	/// Marks the endpoint as requiring the API key header and a signature.
	pub const fn signed(mut self) -> Self {
		self.security = SecurityType::Signed;

		self
	}
}

/// A caller-defined service bound to a pipeline.
pub trait ApiService
where
	Self: Sized,
{
	/// Wraps the bound client handle.
	fn from_client(client: ServiceClient) -> Self;
}

/// Cheap handle to the pipeline a service was bound to.
#[derive(Clone, Debug)]
pub struct ServiceClient {
	pipeline: Arc<Pipeline>,
}
impl ServiceClient {
	/// Wraps a pipeline.
	pub fn new(pipeline: Arc<Pipeline>) -> Self {
		Self { pipeline }
	}

	/// Returns the owning pipeline.
	pub fn pipeline(&self) -> &Arc<Pipeline> {
		&self.pipeline
	}

	/// Starts a prepared call against `endpoint`, decoding into `T`.
	pub fn call<T>(&self, endpoint: Endpoint) -> Call<T> {
		Call {
			pipeline: Arc::clone(&self.pipeline),
			endpoint,
			params: Vec::new(),
			body: None,
			_payload: PhantomData,
		}
	}
}
impl ApiService for ServiceClient {
	fn from_client(client: ServiceClient) -> Self {
		client
	}
}

/// One prepared invocation of an endpoint.
///
/// Query parameters keep their insertion order, which is also the order they are signed in.
pub struct Call<T> {
	pipeline: Arc<Pipeline>,
	endpoint: Endpoint,
	params: Vec<(String, String)>,
	body: Option<Vec<u8>>,
	_payload: PhantomData<fn() -> T>,
}
impl<T> Call<T> {
	/// Appends a query parameter.
	pub fn param(mut self, key: impl Into<String>, value: impl Display) -> Self {
		self.params.push((key.into(), value.to_string()));

		self
	}

	/// Appends a query parameter when `value` is present.
	pub fn param_opt(self, key: impl Into<String>, value: Option<impl Display>) -> Self {
		match value {
			Some(value) => self.param(key, value),
			None => self,
		}
	}

	/// Sets a JSON request body encoded with the pipeline codec.
	pub fn json_body<B>(mut self, body: &B) -> Result<Self, ConfigError>
	where
		B: ?Sized + Serialize,
	{
		self.body = Some(self.pipeline.codec().encode(body)?);

		Ok(self)
	}

	/// Returns the endpoint being called.
	pub fn endpoint(&self) -> &Endpoint {
		&self.endpoint
	}

	/// Returns the pipeline the call will be dispatched through.
	pub fn pipeline(&self) -> &Arc<Pipeline> {
		&self.pipeline
	}

	/// Builds the outbound request as it looks before any interceptor runs.
	pub fn request(&self) -> Result<ApiRequest, ConfigError> {
		let mut url = self.pipeline.resolve(&self.endpoint)?;

		if !self.params.is_empty() {
			url.query_pairs_mut().extend_pairs(&self.params);
		}

		let mut request = ApiRequest::new(self.endpoint.method.clone(), url, self.endpoint.security);

		if let Some(body) = self.body.clone() {
			request.headers.insert(CONTENT_TYPE, HeaderValue::from_static(JsonCodec::CONTENT_TYPE));
			request.body = Some(body);
		}

		Ok(request)
	}
}
impl<T> Call<T>
where
	T: DeserializeOwned,
{
	/// Executes the call, blocking until the transport completes; see
	/// [`execute_sync`](invoke::execute_sync).
	pub fn execute(self) -> Result<T> {
		invoke::execute_sync(self)
	}

	/// Executes the call and returns the classified outcome; see
	/// [`outcome`](invoke::outcome).
	pub fn outcome(self) -> Result<CallOutcome<T>> {
		invoke::outcome(self)
	}
}
impl<T> Clone for Call<T> {
	fn clone(&self) -> Self {
		Self {
			pipeline: Arc::clone(&self.pipeline),
			endpoint: self.endpoint.clone(),
			params: self.params.clone(),
			body: self.body.clone(),
			_payload: PhantomData,
		}
	}
}
impl<T> Debug for Call<T> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Call")
			.field("endpoint", &self.endpoint)
			.field("params", &self.params)
			.field("has_body", &self.body.is_some())
			.finish()
	}
}

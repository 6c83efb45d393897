//! Transport primitives for bound API calls.
//!
//! The module exposes [`ApiRequest`] and [`HttpResponse`] alongside the two dispatch
//! contracts the pipeline can target: [`HttpTransport`] performs blocking I/O on the caller's
//! thread, while [`AsyncTransport`] returns a `Send` future that a
//! [`Reactor`](crate::reactor::Reactor) drives on its own I/O machinery. Downstream crates can
//! implement either trait to plug in a custom HTTP stack.

// crates.io
use http::{HeaderMap, HeaderValue, Method, header::HeaderName};
// self
use crate::{_prelude::*, error::TransportError};

/// Raw response handed back by transports. Bodies are fully buffered.
pub type HttpResponse = http::Response<Vec<u8>>;

/// Boxed future returned by [`AsyncTransport::call`].
pub type TransportFuture =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'static + Send>>;

/// Authentication requirement attached to an endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SecurityType {
	/// Public endpoint; nothing is attached.
	#[default]
	None,
	/// Requires the API key header but no signature.
	ApiKey,
	/// Requires the API key header and a `signature` query parameter.
	Signed,
}
impl SecurityType {
	/// Returns `true` when the API key header must be sent.
	pub const fn requires_api_key(self) -> bool {
		matches!(self, Self::ApiKey | Self::Signed)
	}

	/// Returns `true` when the request must carry a signature.
	pub const fn requires_signature(self) -> bool {
		matches!(self, Self::Signed)
	}
}

/// Owned outbound request flowing through the interceptor chain.
///
/// Interceptors receive a shared reference and return a new value, so a request observed by
/// one stage is never altered behind its back.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Fully resolved URL, including the encoded query string.
	pub url: Url,
	/// Outbound headers.
	pub headers: HeaderMap,
	/// Encoded request body, if any.
	pub body: Option<Vec<u8>>,
	/// Authentication requirement declared by the endpoint.
	pub security: SecurityType,
}
impl ApiRequest {
	/// Creates a request without headers or body.
	pub fn new(method: Method, url: Url, security: SecurityType) -> Self {
		Self { method, url, headers: HeaderMap::new(), body: None, security }
	}

	/// Returns the bytes that request signatures are computed over: the encoded query string
	/// followed by the body, exactly as they go over the wire.
	pub fn canonical_payload(&self) -> Vec<u8> {
		let mut payload = self.url.query().unwrap_or_default().as_bytes().to_vec();

		if let Some(body) = self.body.as_deref() {
			payload.extend_from_slice(body);
		}

		payload
	}

	/// Returns a header value when it is present and valid UTF-8.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}

	/// Returns the first decoded value of a query parameter.
	pub fn query_param(&self, name: &str) -> Option<String> {
		self.url.query_pairs().find(|(key, _)| key == name).map(|(_, value)| value.into_owned())
	}

	/// Inserts (or replaces) a header.
	pub fn insert_header(
		&mut self,
		name: HeaderName,
		value: &str,
	) -> Result<(), crate::error::ConfigError> {
		let value = HeaderValue::from_str(value)
			.map_err(|_| crate::error::ConfigError::InvalidHeader { name: name.to_string() })?;

		self.headers.insert(name, value);

		Ok(())
	}
}

/// Blocking transport: every call occupies the caller's thread for its duration.
///
/// Implementations must be `Send + Sync + 'static` so one instance can back every pipeline a
/// binder builds.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Dispatches the request and waits for the full response.
	fn execute(&self, request: ApiRequest) -> Result<HttpResponse, TransportError>;
}

/// Event-loop transport whose futures are driven by a reactor.
///
/// Returned futures own everything they need so they can be spawned onto another thread.
pub trait AsyncTransport
where
	Self: 'static + Send + Sync,
{
	/// Starts dispatching the request.
	fn call(&self, request: ApiRequest) -> TransportFuture;
}

/// Blocking reqwest engine used by a binder's shared pipeline.
///
/// `reqwest::blocking` spins up its own internal runtime; construct and drop this type outside
/// of async contexts.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestBlockingTransport(pub reqwest::blocking::Client);
#[cfg(feature = "reqwest")]
impl ReqwestBlockingTransport {
	/// Builds a transport with reqwest's default blocking client.
	pub fn new() -> Result<Self, crate::error::ConfigError> {
		Ok(Self(reqwest::blocking::Client::builder().build()?))
	}

	/// Wraps an existing blocking client.
	pub fn with_client(client: reqwest::blocking::Client) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestBlockingTransport {
	fn execute(&self, request: ApiRequest) -> Result<HttpResponse, TransportError> {
		let ApiRequest { method, url, headers, body, .. } = request;
		let mut builder = self.0.request(method, url).headers(headers);

		if let Some(body) = body {
			builder = builder.body(body);
		}

		let response = self.0.execute(builder.build()?)?;
		let status = response.status();
		let headers = response.headers().to_owned();

		Ok(assemble_response(status, headers, response.bytes()?.to_vec()))
	}
}

/// Async reqwest engine handed out by [`TokioReactor`](crate::reactor::TokioReactor).
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestAsyncTransport(pub reqwest::Client);
#[cfg(feature = "reqwest")]
impl ReqwestAsyncTransport {
	/// Wraps an existing async client.
	pub fn with_client(client: reqwest::Client) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsyncTransport for ReqwestAsyncTransport {
	fn call(&self, request: ApiRequest) -> TransportFuture {
		let client = self.0.clone();

		Box::pin(async move {
			let ApiRequest { method, url, headers, body, .. } = request;
			let mut builder = client.request(method, url).headers(headers);

			if let Some(body) = body {
				builder = builder.body(body);
			}

			let response = client.execute(builder.build()?).await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let bytes = response.bytes().await?;

			Ok(assemble_response(status, headers, bytes.to_vec()))
		})
	}
}

#[cfg(feature = "reqwest")]
fn assemble_response(status: http::StatusCode, headers: HeaderMap, body: Vec<u8>) -> HttpResponse {
	let mut response = HttpResponse::new(body);

	*response.status_mut() = status;
	*response.headers_mut() = headers;

	response
}

//! Demonstrates plugging a custom blocking engine and a caller interceptor into the binder.
//!
//! 1. Implement [`HttpTransport`] for any engine; here a fixture table answers offline.
//! 2. Implement [`RequestInterceptor`] to amend requests; caller stages run before signing, so
//!    the parameters they add are covered by the signature.
//! 3. Hand both to [`ServiceBinder::with_transport`] and bind services as usual.

// std
use std::collections::HashMap;
// crates.io
use color_eyre::Result;
// self
use binance_rest_binder::{
	auth::{Credentials, RequestInterceptor},
	binder::ServiceBinder,
	error::TransportError,
	http::{ApiRequest, HttpResponse, HttpTransport},
	http_types::StatusCode,
	pipeline::PipelineConfig,
	service::{ApiService, Call, Endpoint, ServiceClient},
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let config = PipelineConfig::builder()
		.base_url("https://testnet.binance.vision")
		.interceptor(RecvWindow(5_000))
		.build()?;
	let transport = FixtureTransport::from([
		("/api/v3/time", (200, r#"{"serverTime":1499827319559}"#)),
		("/api/v3/account", (401, r#"{"code":-2015,"msg":"Invalid API-key, IP, or permissions."}"#)),
	]);
	let binder = ServiceBinder::with_transport(config, std::sync::Arc::new(transport))?;
	let market: Market = binder.bind();

	println!("time: {}", market.time().execute()?);

	let credentials = Credentials::new("demo-key", "demo-secret")?;
	let market: Market = binder.bind_authenticated(&credentials)?;
	let call = market.account(1499827319559);
	let prepared = call.pipeline().prepare(&call.request()?)?;

	println!("signed url: {}", prepared.url);

	match call.execute() {
		Ok(account) => println!("account: {account}"),
		Err(e) => match e.as_api() {
			Some(api) => println!("rejected with {} (HTTP {}): {}", api.code, api.status, api.message),
			None => return Err(e.into()),
		},
	}

	Ok(())
}

struct Market(ServiceClient);
impl Market {
	const ACCOUNT: Endpoint = Endpoint::get("/api/v3/account").signed();
	const TIME: Endpoint = Endpoint::get("/api/v3/time");

	fn time(&self) -> Call<serde_json::Value> {
		self.0.call(Self::TIME)
	}

	fn account(&self, timestamp: u64) -> Call<serde_json::Value> {
		self.0.call(Self::ACCOUNT).param("timestamp", timestamp)
	}
}
impl ApiService for Market {
	fn from_client(client: ServiceClient) -> Self {
		Self(client)
	}
}

#[derive(Debug)]
struct RecvWindow(u32);
impl RequestInterceptor for RecvWindow {
	fn intercept(&self, request: &ApiRequest) -> binance_rest_binder::error::Result<ApiRequest> {
		let mut out = request.clone();

		if request.security.requires_signature() {
			out.url.query_pairs_mut().append_pair("recvWindow", &self.0.to_string());
		}

		Ok(out)
	}
}

/// Answers from an in-memory table keyed by path; unknown paths fail like a dead socket.
struct FixtureTransport(HashMap<&'static str, (u16, &'static str)>);
impl HttpTransport for FixtureTransport {
	fn execute(&self, request: ApiRequest) -> Result<HttpResponse, TransportError> {
		let Some(&(status, body)) = self.0.get(request.url.path()) else {
			return Err(TransportError::Io(std::io::ErrorKind::NotConnected.into()));
		};
		let mut response = HttpResponse::new(body.as_bytes().to_vec());

		*response.status_mut() = StatusCode::from_u16(status).map_err(TransportError::network)?;

		Ok(response)
	}
}
impl<const N: usize> From<[(&'static str, (u16, &'static str)); N]> for FixtureTransport {
	fn from(fixtures: [(&'static str, (u16, &'static str)); N]) -> Self {
		Self(HashMap::from(fixtures))
	}
}

#![cfg(feature = "tokio")]

// std
use std::thread;
// crates.io
use httpmock::prelude::*;
use tokio::runtime::Runtime;
// self
use binance_rest_binder::{
	API_KEY_HEADER, SIGNATURE_PARAM,
	auth::{Credentials, sign},
	binder::ServiceBinder,
	error::{Error, TransportError},
	pipeline::PipelineConfig,
	reactor::TokioReactor,
	service::{Endpoint, ServiceClient},
};

fn binder(base_url: &str) -> ServiceBinder {
	let config = PipelineConfig::builder()
		.base_url(base_url)
		.build()
		.expect("Mock server base URL should be valid.");

	ServiceBinder::with_config(config).expect("Reqwest binder should build.")
}

#[test]
fn reactor_pipeline_signs_and_blocks_until_completion() {
	let runtime = Runtime::new().expect("Test runtime should start.");
	let server = MockServer::start();
	let signature = sign("reactor-secret", "timestamp=7");
	let mock = server.mock(|when, then| {
		when.method(GET)
			.path("/api/v3/account")
			.query_param(SIGNATURE_PARAM, &signature)
			.header(API_KEY_HEADER, "reactor-key");
		then.status(200).header("content-type", "application/json").body(r#"{"balances":[]}"#);
	});
	let binder = binder(&server.base_url());
	let credentials =
		Credentials::new("reactor-key", "reactor-secret").expect("Test credentials should be valid.");
	let client: ServiceClient = binder
		.bind_on_reactor(Some(&credentials), TokioReactor::new(runtime.handle().clone()))
		.expect("Reactor bind should succeed.");
	let account = client
		.call::<serde_json::Value>(Endpoint::get("/api/v3/account").signed())
		.param("timestamp", 7)
		.execute()
		.expect("Reactor call should succeed.");

	mock.assert();
	assert_eq!(account["balances"], serde_json::json!([]));
	assert!(binder.shared_pipeline().auth().is_none());
}

#[test]
fn reactor_calls_from_many_threads_share_one_runtime() {
	let runtime = Runtime::new().expect("Test runtime should start.");
	let server = MockServer::start();
	let mock = server.mock(|when, then| {
		when.method(GET).path("/api/v3/ping");
		then.status(200).header("content-type", "application/json").body("{}");
	});
	let client: ServiceClient = binder(&server.base_url())
		.bind_on_reactor(None, TokioReactor::new(runtime.handle().clone()))
		.expect("Reactor bind should succeed.");

	thread::scope(|scope| {
		for _ in 0..4 {
			scope.spawn(|| {
				client
					.call::<serde_json::Value>(Endpoint::get("/api/v3/ping"))
					.execute()
					.expect("Ping should succeed.");
			});
		}
	});

	assert_eq!(mock.calls(), 4);
}

#[test]
fn shut_down_reactor_reports_transport_error() {
	let runtime = Runtime::new().expect("Test runtime should start.");
	let reactor = TokioReactor::new(runtime.handle().clone());
	let client: ServiceClient = binder("http://127.0.0.1:9")
		.bind_on_reactor(None, reactor)
		.expect("Reactor bind should succeed.");

	runtime.shutdown_background();

	let err = client
		.call::<serde_json::Value>(Endpoint::get("/api/v3/ping"))
		.execute()
		.expect_err("A stopped runtime cannot drive calls.");

	assert!(matches!(err, Error::Transport(TransportError::ReactorShutdown)), "{err:?}");
}

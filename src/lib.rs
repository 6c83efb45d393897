//! Typed Binance REST service bindings over pluggable HTTP pipelines.
//!
//! Bind a service once, attach API-key headers and HMAC-SHA256 signatures automatically, and
//! swap blocking or event-loop transports without touching call sites.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod binder;
pub mod error;
pub mod http;
pub mod invoke;
pub mod obs;
pub mod pipeline;
pub mod reactor;
pub mod service;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and test doubles for unit and integration tests; enabled via
	//! `cfg(test)` or the `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::collections::VecDeque;
	// crates.io
	use ::http::StatusCode;
	// self
	use crate::{
		binder::ServiceBinder,
		error::TransportError,
		http::{ApiRequest, HttpResponse, HttpTransport},
		pipeline::PipelineConfig,
	};

	/// Canned reply served by [`RecordingTransport`].
	#[derive(Debug)]
	pub enum CannedReply {
		/// Respond with the given status and JSON body.
		Respond(u16, &'static str),
		/// Fail at the I/O layer with the given error kind.
		Fail(std::io::ErrorKind),
	}

	/// Blocking transport double that records every dispatched request and replays canned
	/// replies in order (the last reply repeats once the queue drains).
	#[derive(Debug, Default)]
	pub struct RecordingTransport {
		requests: Mutex<Vec<ApiRequest>>,
		replies: Mutex<VecDeque<CannedReply>>,
	}
	impl RecordingTransport {
		/// Creates a transport that answers every request with `200 {}`.
		pub fn ok() -> Arc<Self> {
			Self::replying([CannedReply::Respond(200, "{}")])
		}

		/// Creates a transport that serves `replies` in order.
		pub fn replying(replies: impl IntoIterator<Item = CannedReply>) -> Arc<Self> {
			Arc::new(Self {
				requests: Default::default(),
				replies: Mutex::new(replies.into_iter().collect()),
			})
		}

		/// Returns clones of every request observed so far.
		pub fn requests(&self) -> Vec<ApiRequest> {
			self.requests.lock().clone()
		}

		/// Returns the most recent request, if any.
		pub fn last_request(&self) -> Option<ApiRequest> {
			self.requests.lock().last().cloned()
		}
	}
	impl HttpTransport for RecordingTransport {
		fn execute(&self, request: ApiRequest) -> Result<HttpResponse, TransportError> {
			self.requests.lock().push(request);

			let mut replies = self.replies.lock();
			let reply =
				if replies.len() > 1 { replies.pop_front() } else { replies.front().map(clone_reply) };

			match reply.unwrap_or(CannedReply::Respond(200, "{}")) {
				CannedReply::Respond(status, body) => {
					let mut response = HttpResponse::new(body.as_bytes().to_vec());

					*response.status_mut() =
						StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

					Ok(response)
				},
				CannedReply::Fail(kind) => Err(TransportError::Io(std::io::Error::new(
					kind,
					"recording transport failure",
				))),
			}
		}
	}

	fn clone_reply(reply: &CannedReply) -> CannedReply {
		match reply {
			CannedReply::Respond(status, body) => CannedReply::Respond(*status, body),
			CannedReply::Fail(kind) => CannedReply::Fail(*kind),
		}
	}

	/// Builds a [`ServiceBinder`] over a [`RecordingTransport`] with the given base URL.
	pub fn recording_binder(
		base_url: &str,
		transport: Arc<RecordingTransport>,
	) -> ServiceBinder {
		let config = PipelineConfig::builder()
			.base_url(base_url)
			.build()
			.expect("Test base URL should be valid.");

		ServiceBinder::with_transport(config, transport)
			.expect("Recording transport binder should build.")
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		marker::PhantomData,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::Error as ReqwestError;
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

/// Default REST endpoint for the Binance spot API.
pub const API_BASE_URL: &str = "https://api.binance.com";
/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";
/// Query parameter carrying the request signature.
pub const SIGNATURE_PARAM: &str = "signature";

pub use ::http as http_types;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
#[cfg(all(test, not(feature = "tokio")))] use tokio as _;

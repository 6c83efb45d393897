//! Synchronous invocation of prepared calls and classification of their outcomes.
//!
//! Every call makes exactly one attempt. The calling thread blocks until the pipeline's
//! transport answers (for event-loop pipelines, until the reactor reports completion) and
//! the response is then classified:
//!
//! - 2xx: the body is decoded into the call's payload type.
//! - any other status: the body is decoded as [`ApiErrorBody`] and surfaced as
//!   [`ApiError`].
//! - transport failures and undecodable bodies surface as [`TransportError`].

// self
use crate::{
	_prelude::*,
	error::{ApiError, TransportError},
	http::HttpResponse,
	obs::{self, CallOutcomeKind, CallSpan},
	pipeline::JsonCodec,
	service::Call,
};

/// Wire shape of a failure response body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
	/// Exchange-defined error code.
	pub code: i64,
	/// Human-readable message.
	#[serde(alias = "msg")]
	pub message: String,
}
impl ApiErrorBody {
	/// Attaches the HTTP status, producing the caller-facing error.
	pub fn into_error(self, status: u16) -> ApiError {
		ApiError { code: self.code, message: self.message, status }
	}
}

/// Classified result of one dispatched call.
#[derive(Debug)]
pub enum CallOutcome<T> {
	/// The response was successful and decoded.
	Success(T),
	/// The endpoint answered with a structured failure.
	Failure {
		/// Decoded error body.
		body: ApiErrorBody,
		/// HTTP status of the response.
		status: u16,
	},
	/// The transport failed, or a response body could not be decoded.
	TransportFailure(TransportError),
}
impl<T> CallOutcome<T> {
	/// Folds the outcome back into a [`Result`].
	pub fn into_result(self) -> Result<T> {
		match self {
			Self::Success(payload) => Ok(payload),
			Self::Failure { body, status } => Err(body.into_error(status).into()),
			Self::TransportFailure(e) => Err(e.into()),
		}
	}

	fn kind(&self) -> CallOutcomeKind {
		match self {
			Self::Success(_) => CallOutcomeKind::Success,
			Self::Failure { .. } => CallOutcomeKind::ApiFailure,
			Self::TransportFailure(_) => CallOutcomeKind::TransportFailure,
		}
	}
}

/// Executes `call`, blocking the calling thread until the transport completes or fails.
pub fn execute_sync<T>(call: Call<T>) -> Result<T>
where
	T: DeserializeOwned,
{
	outcome(call)?.into_result()
}

/// Executes `call` and returns its classified outcome.
///
/// The `Err` channel only carries failures raised before the request reaches the transport
/// (an unresolvable endpoint or a rejecting interceptor); everything after dispatch is
/// reported through [`CallOutcome`].
pub fn outcome<T>(call: Call<T>) -> Result<CallOutcome<T>>
where
	T: DeserializeOwned,
{
	let pipeline = Arc::clone(call.pipeline());
	let kind = pipeline.kind();
	let _span = CallSpan::new(kind, call.endpoint().path).entered();

	obs::record_call_outcome(kind, CallOutcomeKind::Attempt);

	let prepared = call
		.request()
		.map_err(Error::from)
		.and_then(|request| pipeline.prepare(&request))
		.inspect_err(|_| obs::record_call_outcome(kind, CallOutcomeKind::TransportFailure))?;
	let outcome = match pipeline.send(prepared) {
		Ok(response) => classify(pipeline.codec(), &response),
		Err(e) => CallOutcome::TransportFailure(e),
	};

	obs::record_call_outcome(kind, outcome.kind());

	Ok(outcome)
}

/// Decodes a failure response body with `codec`.
pub fn decode_api_error(
	codec: JsonCodec,
	response: &HttpResponse,
) -> Result<ApiErrorBody, TransportError> {
	codec
		.decode(response.body())
		.map_err(|source| TransportError::ErrorBodyDecode { source, status: response.status().as_u16() })
}

fn classify<T>(codec: JsonCodec, response: &HttpResponse) -> CallOutcome<T>
where
	T: DeserializeOwned,
{
	let status = response.status().as_u16();

	if response.status().is_success() {
		return match codec.decode(response.body()) {
			Ok(payload) => CallOutcome::Success(payload),
			Err(source) => CallOutcome::TransportFailure(TransportError::Decode { source, status }),
		};
	}

	match decode_api_error(codec, response) {
		Ok(body) => CallOutcome::Failure { body, status },
		Err(e) => CallOutcome::TransportFailure(e),
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::io::ErrorKind;
	// self
	use super::*;
	use crate::{
		_preludet::{CannedReply, RecordingTransport, recording_binder},
		service::{Endpoint, ServiceClient},
	};

	#[derive(Debug, Deserialize, PartialEq)]
	struct ServerTime {
		#[serde(rename = "serverTime")]
		server_time: u64,
	}

	fn client(reply: CannedReply) -> ServiceClient {
		recording_binder(crate::API_BASE_URL, RecordingTransport::replying([reply])).bind()
	}

	#[test]
	fn success_status_decodes_payload() {
		let time = client(CannedReply::Respond(200, r#"{"serverTime":1499827319559}"#))
			.call::<ServerTime>(Endpoint::get("/api/v3/time"))
			.execute()
			.expect("200 responses should decode.");

		assert_eq!(time, ServerTime { server_time: 1499827319559 });
	}

	#[test]
	fn failure_status_surfaces_api_error() {
		let err = client(CannedReply::Respond(
			400,
			r#"{"code":-1100,"message":"Illegal characters found in parameter."}"#,
		))
		.call::<ServerTime>(Endpoint::get("/api/v3/time"))
		.execute()
		.expect_err("400 responses should fail.");

		match err {
			Error::Api(ApiError { code, message, status }) => {
				assert_eq!(code, -1100);
				assert_eq!(message, "Illegal characters found in parameter.");
				assert_eq!(status, 400);
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn live_msg_field_is_accepted() {
		let outcome = client(CannedReply::Respond(429, r#"{"code":-1003,"msg":"Too many requests."}"#))
			.call::<ServerTime>(Endpoint::get("/api/v3/time"))
			.outcome()
			.expect("Outcome should be classified.");

		assert!(matches!(
			outcome,
			CallOutcome::Failure { body: ApiErrorBody { code: -1003, .. }, status: 429 }
		));
	}

	#[test]
	fn connection_reset_is_a_transport_error() {
		let err = client(CannedReply::Fail(ErrorKind::ConnectionReset))
			.call::<ServerTime>(Endpoint::get("/api/v3/time"))
			.execute()
			.expect_err("Transport failures should surface.");

		match err {
			Error::Transport(TransportError::Io(io)) =>
				assert_eq!(io.kind(), ErrorKind::ConnectionReset),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn undecodable_bodies_are_transport_errors() {
		let err = client(CannedReply::Respond(502, "<html>Bad Gateway</html>"))
			.call::<ServerTime>(Endpoint::get("/api/v3/time"))
			.execute()
			.expect_err("HTML error pages cannot be decoded.");

		assert!(matches!(err, Error::Transport(TransportError::ErrorBodyDecode { status: 502, .. })));

		let err = client(CannedReply::Respond(200, r#"{"serverTime":"soon"}"#))
			.call::<ServerTime>(Endpoint::get("/api/v3/time"))
			.execute()
			.expect_err("Mistyped payloads cannot be decoded.");

		match err {
			Error::Transport(TransportError::Decode { source, status }) => {
				assert_eq!(status, 200);
				assert_eq!(source.path().to_string(), "serverTime");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn each_call_is_attempted_exactly_once() {
		let transport = RecordingTransport::replying([CannedReply::Fail(ErrorKind::TimedOut)]);
		let client: ServiceClient = recording_binder(crate::API_BASE_URL, transport.clone()).bind();
		let _ = client.call::<ServerTime>(Endpoint::get("/api/v3/time")).execute();

		assert_eq!(transport.requests().len(), 1);
	}
}

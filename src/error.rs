//! Binder-level error types shared across pipelines, transports, and calls.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The endpoint executed the request and returned a structured failure.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Transport failure (network, I/O, malformed or undecodable response).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Local configuration problem; never reaches the network.
	#[error(transparent)]
	Config(#[from] ConfigError),
}
impl Error {
	/// Returns the structured API failure, if this error carries one.
	pub fn as_api(&self) -> Option<&ApiError> {
		match self {
			Self::Api(e) => Some(e),
			_ => None,
		}
	}
}

/// Structured failure decoded from a non-success response body.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("API returned error {code} (HTTP {status}): {message}")]
pub struct ApiError {
	/// Exchange-defined error code (e.g. `-1100`).
	pub code: i64,
	/// Human-readable message supplied by the exchange.
	pub message: String,
	/// HTTP status of the failed response.
	pub status: u16,
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed or cannot carry paths.
	#[error("Base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// Offending input.
		url: String,
		/// Underlying parsing failure, when parsing was the problem.
		#[source]
		source: Option<url::ParseError>,
	},
	/// Endpoint path cannot be joined onto the base URL.
	#[error("Endpoint path `{path}` cannot be joined onto the base URL.")]
	InvalidEndpoint {
		/// Endpoint path.
		path: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A header value contains bytes that HTTP does not allow.
	#[error("Header `{name}` has an invalid value.")]
	InvalidHeader {
		/// Header name.
		name: String,
	},
	/// Request body could not be encoded by the payload codec.
	#[error("Request body could not be encoded.")]
	Encode {
		/// Structured encoding failure.
		#[source]
		source: serde_json::Error,
	},

	/// A secret was supplied without an API key.
	#[error("Credentials carry a secret but no API key.")]
	MissingApiKey,
	/// An API key was supplied without a secret.
	#[error("Credentials carry an API key but no secret.")]
	MissingSecret,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, I/O, response decoding).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying I/O failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
	/// Successful response body did not match the expected payload shape.
	#[error("API returned a malformed response body (HTTP {status}).")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Failure response body did not match the `{code, message}` error shape.
	#[error("API returned an undecodable error body (HTTP {status}).")]
	ErrorBodyDecode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// The reactor dropped the call before it completed.
	#[error("Reactor shut down before the call completed.")]
	ReactorShutdown,
	/// A reactor call was made from inside an asynchronous execution context, where parking
	/// the thread would stall the runtime.
	#[error("Event-loop pipelines cannot be called from within an async task.")]
	BlockingInAsyncContext,
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn api_error_display_carries_code_and_message() {
		let err: Error =
			ApiError { code: -1121, message: "Invalid symbol.".into(), status: 400 }.into();

		assert_eq!(err.to_string(), "API returned error -1121 (HTTP 400): Invalid symbol.");
		assert_eq!(err.as_api().map(|api| api.code), Some(-1121));
	}

	#[test]
	fn transport_errors_never_expose_api_payload() {
		let err: Error = TransportError::ReactorShutdown.into();

		assert!(err.as_api().is_none());
	}
}

//! Fixed JSON payload codec shared by requests, responses, and error bodies.

// self
use crate::{_prelude::*, error::ConfigError};

/// Path-aware JSON decode failure.
pub type DecodeError = serde_path_to_error::Error<serde_json::Error>;

/// JSON codec used for every body a pipeline touches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JsonCodec;
impl JsonCodec {
	/// Media type attached to encoded request bodies.
	pub const CONTENT_TYPE: &'static str = "application/json";

	/// Encodes a request body.
	pub fn encode<T>(&self, value: &T) -> Result<Vec<u8>, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		serde_json::to_vec(value).map_err(|source| ConfigError::Encode { source })
	}

	/// Decodes a body, reporting the JSON path of the first mismatch.
	pub fn decode<T>(&self, bytes: &[u8]) -> Result<T, DecodeError>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(bytes);

		serde_path_to_error::deserialize(&mut de)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[allow(dead_code)]
	#[derive(Debug, Deserialize)]
	struct Ticker {
		symbol: String,
		price: String,
	}

	#[test]
	fn decode_reports_failing_path() {
		let err = JsonCodec
			.decode::<Vec<Ticker>>(br#"[{"symbol":"BTCUSDT","price":"1"},{"symbol":"ETHUSDT"}]"#)
			.expect_err("Second element lacks a price.");

		assert_eq!(err.path().to_string(), "[1]");
	}

	#[test]
	fn encode_produces_compact_json() {
		let body = JsonCodec
			.encode(&serde_json::json!({ "listenKey": "abc" }))
			.expect("JSON values always encode.");

		assert_eq!(body, br#"{"listenKey":"abc"}"#);
	}
}

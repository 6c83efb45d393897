//! HMAC-SHA256 request signatures.

// crates.io
use hmac::{Hmac, Mac, digest::KeyInit};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs `payload` with `secret` and returns the lowercase hex digest.
///
/// The payload is the request's canonical bytes (see
/// [`ApiRequest::canonical_payload`](crate::http::ApiRequest::canonical_payload)).
pub fn sign(secret: &str, payload: impl AsRef<[u8]>) -> String {
	let mut mac = <HmacSha256 as KeyInit>::new_from_slice(secret.as_bytes())
		.expect("HMAC accepts keys of any length");

	mac.update(payload.as_ref());

	hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn matches_published_binance_vector() {
		// Example from the Binance API documentation for SIGNED endpoints.
		let secret = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";
		let payload = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";

		assert_eq!(
			sign(secret, payload),
			"c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
		);
	}

	#[test]
	fn is_deterministic_and_key_sensitive() {
		assert_eq!(sign("a", "timestamp=1"), sign("a", "timestamp=1"));
		assert_ne!(sign("a", "timestamp=1"), sign("b", "timestamp=1"));
	}

	#[test]
	fn signs_raw_bytes_without_lossy_conversion() {
		let invalid_utf8 = b"timestamp=1\xff\xfe";

		assert_eq!(sign("a", invalid_utf8), sign("a", invalid_utf8.as_slice()));
		assert_ne!(sign("a", invalid_utf8), sign("a", "timestamp=1\u{fffd}\u{fffd}"));
	}
}

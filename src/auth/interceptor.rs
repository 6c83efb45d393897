//! Request transform stages and the API-key/signature interceptor.

// crates.io
use http::header::HeaderName;
// self
use crate::{
	_prelude::*,
	auth::{Credentials, signer},
	http::ApiRequest,
};

/// A request transform applied by a pipeline before dispatch.
///
/// Implementations receive a shared reference and return a new request; the input is never
/// mutated in place. Stages run in installation order.
pub trait RequestInterceptor
where
	Self: Debug + Send + Sync,
{
	/// Returns the transformed request.
	fn intercept(&self, request: &ApiRequest) -> Result<ApiRequest>;
}

/// Attaches the `X-MBX-APIKEY` header and, for signed endpoints, a trailing `signature`
/// query parameter computed over [`ApiRequest::canonical_payload`].
///
/// Timestamps are the caller's responsibility; the interceptor only signs what is already in
/// the request. Two interceptors are equal when their credentials are equal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthInterceptor {
	credentials: Credentials,
}
impl AuthInterceptor {
	/// Creates an interceptor for the given credentials.
	pub fn new(credentials: Credentials) -> Self {
		Self { credentials }
	}

	/// Returns the credentials this interceptor signs with.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}
}
impl RequestInterceptor for AuthInterceptor {
	fn intercept(&self, request: &ApiRequest) -> Result<ApiRequest> {
		let mut transformed = request.clone();

		if !request.security.requires_api_key() {
			return Ok(transformed);
		}

		transformed
			.insert_header(HeaderName::from_static("x-mbx-apikey"), self.credentials.api_key())?;

		if request.security.requires_signature() {
			let payload = request.canonical_payload();

			// Nothing to sign; the endpoint will reject the call on its own.
			if !payload.is_empty() {
				let signature = signer::sign(self.credentials.secret().expose(), &payload);

				transformed.url.query_pairs_mut().append_pair(crate::SIGNATURE_PARAM, &signature);
			}
		}

		Ok(transformed)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use http::Method;
	// self
	use super::*;
	use crate::http::SecurityType;

	fn interceptor() -> AuthInterceptor {
		AuthInterceptor::new(Credentials::new("key", "secret").expect("Credentials should build."))
	}

	fn request(path_and_query: &str, security: SecurityType) -> ApiRequest {
		let url = Url::parse(&format!("https://api.binance.com{path_and_query}"))
			.expect("Test URL should parse.");

		ApiRequest::new(Method::GET, url, security)
	}

	#[test]
	fn public_endpoints_pass_through() {
		let original = request("/api/v3/ping", SecurityType::None);
		let out = interceptor().intercept(&original).expect("Interception should succeed.");

		assert!(out.header(crate::API_KEY_HEADER).is_none());
		assert_eq!(out.url, original.url);
	}

	#[test]
	fn api_key_endpoints_only_get_the_header() {
		let original = request("/api/v3/userDataStream", SecurityType::ApiKey);
		let out = interceptor().intercept(&original).expect("Interception should succeed.");

		assert_eq!(out.header(crate::API_KEY_HEADER), Some("key"));
		assert!(out.query_param(crate::SIGNATURE_PARAM).is_none());
	}

	#[test]
	fn signed_endpoints_get_trailing_signature_without_touching_input() {
		let original = request("/api/v3/account?recvWindow=5000&timestamp=42", SecurityType::Signed);
		let out = interceptor().intercept(&original).expect("Interception should succeed.");
		let expected = signer::sign("secret", "recvWindow=5000&timestamp=42");

		assert_eq!(out.header(crate::API_KEY_HEADER), Some("key"));
		assert_eq!(
			out.url.query(),
			Some(format!("recvWindow=5000&timestamp=42&signature={expected}").as_str())
		);
		assert!(original.header(crate::API_KEY_HEADER).is_none());
		assert_eq!(original.url.query(), Some("recvWindow=5000&timestamp=42"));
	}

	#[test]
	fn signed_endpoint_without_payload_is_not_signed() {
		let out = interceptor()
			.intercept(&request("/api/v3/account", SecurityType::Signed))
			.expect("Interception should succeed.");

		assert_eq!(out.header(crate::API_KEY_HEADER), Some("key"));
		assert!(out.query_param(crate::SIGNATURE_PARAM).is_none());
	}

	#[test]
	fn signature_covers_raw_body_bytes() {
		let mut original = request("/api/v3/order?timestamp=1", SecurityType::Signed);

		original.body = Some(b"\xffqty=1".to_vec());

		let out = interceptor().intercept(&original).expect("Interception should succeed.");

		assert_eq!(
			out.query_param(crate::SIGNATURE_PARAM),
			Some(signer::sign("secret", b"timestamp=1\xffqty=1"))
		);
	}

	#[test]
	fn equality_follows_credentials() {
		let other =
			AuthInterceptor::new(Credentials::new("key", "other").expect("Credentials should build."));

		assert_eq!(interceptor(), interceptor());
		assert_ne!(interceptor(), other);
	}
}

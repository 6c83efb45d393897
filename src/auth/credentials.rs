//! API key + secret pair with a redacting secret wrapper.

// self
use crate::{_prelude::*, error::ConfigError};

/// Redacted API secret wrapper keeping signing material out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiSecret(String);
impl ApiSecret {
	/// Returns the inner secret. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for ApiSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for ApiSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ApiSecret").field(&"<redacted>").finish()
	}
}
impl Display for ApiSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Immutable API key + secret pair used by [`AuthInterceptor`](crate::auth::AuthInterceptor).
///
/// Two credentials are equal when both the key and the secret match.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	api_key: String,
	secret: ApiSecret,
}
impl Credentials {
	/// Builds credentials, rejecting empty halves.
	pub fn new(api_key: impl Into<String>, secret: impl Into<String>) -> Result<Self, ConfigError> {
		let api_key = api_key.into();
		let secret = secret.into();

		match (api_key.is_empty(), secret.is_empty()) {
			(false, false) => Ok(Self { api_key, secret: ApiSecret(secret) }),
			(true, _) => Err(ConfigError::MissingApiKey),
			(false, true) => Err(ConfigError::MissingSecret),
		}
	}

	/// Builds credentials from optional halves.
	///
	/// Both halves absent (or empty) yields `Ok(None)`, i.e. unauthenticated mode; a single
	/// half is a configuration error.
	pub fn from_parts(
		api_key: Option<&str>,
		secret: Option<&str>,
	) -> Result<Option<Self>, ConfigError> {
		let api_key = api_key.filter(|value| !value.is_empty());
		let secret = secret.filter(|value| !value.is_empty());

		match (api_key, secret) {
			(None, None) => Ok(None),
			(Some(key), Some(secret)) => Self::new(key, secret).map(Some),
			(None, Some(_)) => Err(ConfigError::MissingApiKey),
			(Some(_), None) => Err(ConfigError::MissingSecret),
		}
	}

	/// Returns the API key sent in the identity header.
	pub fn api_key(&self) -> &str {
		&self.api_key
	}

	/// Returns the signing secret.
	pub fn secret(&self) -> &ApiSecret {
		&self.secret
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("api_key", &self.api_key)
			.field("secret", &self.secret)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let credentials =
			Credentials::new("key", "super-secret").expect("Non-empty credentials should build.");

		assert_eq!(format!("{}", credentials.secret()), "<redacted>");
		assert_eq!(
			format!("{credentials:?}"),
			"Credentials { api_key: \"key\", secret: ApiSecret(\"<redacted>\") }"
		);
	}

	#[test]
	fn rejects_half_populated_credentials() {
		assert!(matches!(Credentials::new("", "secret"), Err(ConfigError::MissingApiKey)));
		assert!(matches!(Credentials::new("key", ""), Err(ConfigError::MissingSecret)));
		assert!(matches!(
			Credentials::from_parts(None, Some("secret")),
			Err(ConfigError::MissingApiKey)
		));
		assert!(matches!(
			Credentials::from_parts(Some("key"), Some("")),
			Err(ConfigError::MissingSecret)
		));
	}

	#[test]
	fn absent_parts_mean_unauthenticated() {
		assert!(matches!(Credentials::from_parts(None, None), Ok(None)));
		assert!(matches!(Credentials::from_parts(Some(""), Some("")), Ok(None)));

		let credentials = Credentials::from_parts(Some("key"), Some("secret"))
			.expect("Complete parts should build.")
			.expect("Complete parts should yield credentials.");

		assert_eq!(credentials.api_key(), "key");
		assert_eq!(credentials.secret().expose(), "secret");
	}

	#[test]
	fn equality_covers_key_and_secret() {
		let a = Credentials::new("key", "one").expect("Credentials should build.");
		let b = Credentials::new("key", "one").expect("Credentials should build.");
		let c = Credentials::new("key", "two").expect("Credentials should build.");

		assert_eq!(a, b);
		assert_ne!(a, c);
	}
}

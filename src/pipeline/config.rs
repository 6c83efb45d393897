//! Pipeline configuration and the auth-slot reconfiguration policy.

// self
use crate::{
	_prelude::*,
	auth::{AuthInterceptor, Credentials, RequestInterceptor},
	error::ConfigError,
	pipeline::JsonCodec,
};

/// Result of installing credentials into a [`PipelineConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReconfigureOutcome {
	/// Equal credentials were already installed; the existing pipeline stays in use.
	Reused,
	/// No credentials were installed before.
	Installed,
	/// Different credentials were installed and have been swapped out.
	Replaced,
}
impl ReconfigureOutcome {
	/// Returns `true` when the pipeline has to be rebuilt.
	pub const fn requires_rebuild(self) -> bool {
		!matches!(self, Self::Reused)
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Reused => "reused",
			Self::Installed => "installed",
			Self::Replaced => "replaced",
		}
	}
}
impl Display for ReconfigureOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Source of truth that pipelines are built from.
///
/// The authentication stage lives in a dedicated slot instead of the general interceptor
/// list, so at most one [`AuthInterceptor`] is ever installed. It always runs last, after
/// every caller-supplied interceptor, so the signature covers whatever they add.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
	/// Base endpoint every endpoint path is joined onto.
	pub base_url: Url,
	/// Payload codec for bodies and error bodies.
	pub codec: JsonCodec,
	/// Caller-supplied interceptors, applied in order.
	pub interceptors: Vec<Arc<dyn RequestInterceptor>>,
	auth: Option<AuthInterceptor>,
}
impl PipelineConfig {
	/// Returns a builder seeded with the Binance spot base URL.
	pub fn builder() -> PipelineConfigBuilder {
		PipelineConfigBuilder::default()
	}

	/// Returns the installed authentication stage, if any.
	pub fn auth(&self) -> Option<&AuthInterceptor> {
		self.auth.as_ref()
	}

	/// Returns the installed credentials, if any.
	pub fn installed_credentials(&self) -> Option<&Credentials> {
		self.auth.as_ref().map(AuthInterceptor::credentials)
	}

	/// Installs `credentials` unless equal ones are already present.
	pub fn install_auth(&mut self, credentials: &Credentials) -> ReconfigureOutcome {
		let outcome = match self.installed_credentials() {
			Some(current) if current == credentials => return ReconfigureOutcome::Reused,
			Some(_) => ReconfigureOutcome::Replaced,
			None => ReconfigureOutcome::Installed,
		};

		self.auth = Some(AuthInterceptor::new(credentials.clone()));

		outcome
	}

	/// Returns a copy of this config with the authentication slot emptied.
	pub fn without_auth(&self) -> Self {
		Self { auth: None, ..self.clone() }
	}

	/// Returns the full stage chain: caller interceptors followed by the auth stage.
	pub fn chain(&self) -> Vec<Arc<dyn RequestInterceptor>> {
		let mut chain = self.interceptors.clone();

		if let Some(auth) = self.auth.clone() {
			chain.push(Arc::new(auth));
		}

		chain
	}
}

/// Builder for [`PipelineConfig`] values.
#[derive(Debug)]
pub struct PipelineConfigBuilder {
	/// Base URL; defaults to [`API_BASE_URL`](crate::API_BASE_URL).
	pub base_url: String,
	/// Caller-supplied interceptors.
	pub interceptors: Vec<Arc<dyn RequestInterceptor>>,
}
impl PipelineConfigBuilder {
	/// Overrides the base URL (e.g. the spot testnet).
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = url.into();

		self
	}

	/// Appends a caller-supplied interceptor.
	pub fn interceptor<I>(mut self, interceptor: I) -> Self
	where
		I: 'static + RequestInterceptor,
	{
		self.interceptors.push(Arc::new(interceptor));

		self
	}

	/// Consumes the builder and validates the base URL.
	pub fn build(self) -> Result<PipelineConfig, ConfigError> {
		let base_url = Url::parse(&self.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
			url: self.base_url.clone(),
			source: Some(source),
		})?;

		if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
			return Err(ConfigError::InvalidBaseUrl { url: self.base_url, source: None });
		}

		Ok(PipelineConfig {
			base_url,
			codec: JsonCodec,
			interceptors: self.interceptors,
			auth: None,
		})
	}
}
impl Default for PipelineConfigBuilder {
	fn default() -> Self {
		Self { base_url: crate::API_BASE_URL.to_owned(), interceptors: Vec::new() }
	}
}

#[cfg(test)]
mod tests {
	//! Pipeline configuration and the auth-slot reconfiguration policy.

// self
	use super::*;

	fn credentials(secret: &str) -> Credentials {
		Credentials::new("key", secret).expect("Credentials should build.")
	}

	#[test]
	fn builder_defaults_to_binance_spot() {
		let config = PipelineConfig::builder().build().expect("Default config should build.");

		assert_eq!(config.base_url.as_str(), "https://api.binance.com/");
		assert!(config.auth().is_none());
		assert!(config.chain().is_empty());
	}

	#[test]
	fn builder_rejects_unusable_base_urls() {
		for url in ["not a url", "mailto:ops@example.com", "ftp://example.com"] {
			let err = PipelineConfig::builder()
				.base_url(url)
				.build()
				.expect_err("Unusable base URLs must be rejected.");

			assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }), "{url}: {err:?}");
		}
	}

	#[test]
	fn auth_slot_holds_at_most_one_interceptor() {
		let mut config = PipelineConfig::builder().build().expect("Default config should build.");

		assert_eq!(config.install_auth(&credentials("one")), ReconfigureOutcome::Installed);
		assert_eq!(config.install_auth(&credentials("one")), ReconfigureOutcome::Reused);
		assert_eq!(config.install_auth(&credentials("two")), ReconfigureOutcome::Replaced);
		assert_eq!(config.chain().len(), 1);
		assert_eq!(config.installed_credentials(), Some(&credentials("two")));
		assert!(config.without_auth().auth().is_none());
	}
}

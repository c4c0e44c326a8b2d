//! Client configuration: backend base URL, request timeout, and environment overrides.

// std
use std::{env, time::Duration as StdDuration};
// self
use crate::{_prelude::*, error::ConfigError};

/// Base URL used when the app environment is `production`.
pub const PRODUCTION_BASE_URL: &str = "https://chainsync-backend-winter-sound-6706.fly.dev";
/// Base URL used for local development.
pub const DEVELOPMENT_BASE_URL: &str = "http://127.0.0.1:8000";
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_millis(30_000);

/// Environment variable holding an explicit base URL.
pub const ENV_BASE_URL: &str = "CHAINSYNC_API_BASE_URL";
/// Environment variable selecting the deployment (`production` or anything else).
pub const ENV_APP_ENV: &str = "CHAINSYNC_APP_ENV";
/// Environment variable overriding the timeout in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "CHAINSYNC_API_TIMEOUT_MS";

/// Validated client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Backend base URL; endpoint paths are appended verbatim.
	pub base_url: Url,
	/// Deadline applied to every request.
	pub timeout: StdDuration,
	/// Optional `User-Agent` header value.
	pub user_agent: Option<String>,
}
impl ClientConfig {
	/// Creates a builder for the provided base URL.
	pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
		ClientConfigBuilder::new(base_url)
	}

	/// Resolves configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| env::var(name).ok())
	}

	/// Resolves configuration through `lookup`, which maps variable names to values.
	///
	/// An explicit base URL wins; otherwise the app environment picks the production or
	/// development backend.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let base_url = lookup(ENV_BASE_URL).filter(|value| !value.trim().is_empty()).unwrap_or_else(
			|| match lookup(ENV_APP_ENV).as_deref().map(str::trim) {
				Some("production") => PRODUCTION_BASE_URL.into(),
				_ => DEVELOPMENT_BASE_URL.into(),
			},
		);
		let mut builder = Self::builder(base_url);

		if let Some(raw) = lookup(ENV_TIMEOUT_MS).filter(|value| !value.trim().is_empty()) {
			let millis = raw
				.trim()
				.parse::<u64>()
				.map_err(|_| ConfigError::InvalidTimeout { value: raw.clone() })?;

			builder = builder.timeout(StdDuration::from_millis(millis));
		}

		builder.build()
	}

	/// Joins an endpoint path (and optional query pairs) onto the base URL.
	pub fn endpoint_url(&self, path: &str, query: &[(String, String)]) -> Result<Url, ConfigError> {
		let base = self.base_url.as_str().trim_end_matches('/');
		let joined = if path.starts_with('/') {
			format!("{base}{path}")
		} else {
			format!("{base}/{path}")
		};
		let mut url = Url::parse(&joined)
			.map_err(|source| ConfigError::InvalidPath { path: path.to_owned(), source })?;

		if !query.is_empty() {
			url.query_pairs_mut().extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
		}

		Ok(url)
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Clone, Debug)]
pub struct ClientConfigBuilder {
	/// Raw base URL, validated on build.
	pub base_url: String,
	/// Request timeout.
	pub timeout: StdDuration,
	/// Optional `User-Agent` header value.
	pub user_agent: Option<String>,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with the provided base URL and the default timeout.
	pub fn new(base_url: impl Into<String>) -> Self {
		Self { base_url: base_url.into(), timeout: DEFAULT_TIMEOUT, user_agent: None }
	}

	/// Overrides the request timeout.
	pub fn timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Sets the `User-Agent` header value.
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let raw = self.base_url.trim().trim_end_matches('/');
		let base_url = Url::parse(raw)
			.map_err(|source| ConfigError::InvalidBaseUrl { url: self.base_url.clone(), source })?;

		if !matches!(base_url.scheme(), "http" | "https") {
			return Err(ConfigError::UnsupportedScheme { scheme: base_url.scheme().to_owned() });
		}
		if self.timeout.is_zero() {
			return Err(ConfigError::ZeroTimeout);
		}

		Ok(ClientConfig { base_url, timeout: self.timeout, user_agent: self.user_agent })
	}
}

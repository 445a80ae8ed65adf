//! Client configuration and the builder that produces a `SnapchatClient`.
//!
//! # Design
//! Configuration is an immutable `ClientConfig` snapshot. The client keeps it
//! behind an `Arc` and replaces the whole snapshot when the access token is
//! rotated, so a request always sees one consistent host/version/token/headers
//! combination. Defaults are constants; the environment is only consulted
//! when the caller opts in with `ClientBuilder::from_env`.

use std::collections::BTreeMap;
use std::sync::Arc;

use ureq::http::{HeaderName, HeaderValue};

use crate::client::SnapchatClient;
use crate::error::ApiError;
use crate::http::{HttpTransport, UreqTransport};

/// Default host for calls to the Snapchat Ads API.
pub const DEFAULT_HOST: &str = "https://adsapi.snapchat.com";

/// Default API version segment.
pub const DEFAULT_VERSION: &str = "v1";

/// Environment variable read by `ClientBuilder::from_env` to override the host.
pub const HOST_ENV_VAR: &str = "SNAPCHAT_ADS_HOST";

/// Environment variable read by `ClientBuilder::from_env` to override the version.
pub const VERSION_ENV_VAR: &str = "SNAPCHAT_ADS_API_VERSION";

/// Product name sent in the `User-Agent` header, followed by the API version.
pub const USER_AGENT_PRODUCT: &str = "Snapchat Ads API Rust SDK";

/// One consistent view of the client's settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    host: String,
    version: String,
    access_token: Option<String>,
    custom_headers: BTreeMap<String, String>,
}

impl ClientConfig {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn custom_headers(&self) -> &BTreeMap<String, String> {
        &self.custom_headers
    }

    pub fn user_agent(&self) -> String {
        format!("{USER_AGENT_PRODUCT} {}", self.version)
    }

    /// Copy of this snapshot carrying a different token.
    pub(crate) fn with_access_token(&self, access_token: String) -> Self {
        Self {
            access_token: Some(access_token),
            ..self.clone()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            version: DEFAULT_VERSION.to_string(),
            access_token: None,
            custom_headers: BTreeMap::new(),
        }
    }
}

/// Builder for configuring a [`SnapchatClient`].
///
/// ```rust,no_run
/// use snapads_core::SnapchatClient;
///
/// let client = SnapchatClient::builder()
///     .access_token("token")
///     .header("X-Request-Source", "reporting")
///     .from_env()
///     .build()?;
/// # Ok::<(), snapads_core::ApiError>(())
/// ```
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl ClientBuilder {
    pub(crate) fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            transport: None,
        }
    }

    /// Bearer token attached to every request.
    pub fn access_token(mut self, access_token: impl Into<String>) -> Self {
        self.config.access_token = Some(access_token.into());
        self
    }

    /// Replace the HTTP transport entirely.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Send requests through a caller-configured ureq agent.
    pub fn agent(self, agent: ureq::Agent) -> Self {
        self.transport(Arc::new(UreqTransport::with_agent(agent)))
    }

    /// Override the base URL. A trailing `/` is dropped.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        let host = host.into();
        self.config.host = host.strip_suffix('/').unwrap_or(&host).to_string();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.config.version = version.into();
        self
    }

    /// Add one custom header, replacing an earlier one with the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config
            .custom_headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Merge a set of custom headers.
    pub fn headers<I, K, V>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        headers
            .into_iter()
            .fold(self, |builder, (name, value)| builder.header(name, value))
    }

    /// Apply host/version overrides from the process environment.
    pub fn from_env(self) -> Self {
        self.from_env_with(|name| std::env::var(name).ok())
    }

    /// Apply host/version overrides from an arbitrary lookup.
    ///
    /// Unset or empty values leave the current setting alone.
    pub fn from_env_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(HOST_ENV_VAR).filter(|value| !value.is_empty()) {
            self = self.host(host);
        }
        if let Some(version) = lookup(VERSION_ENV_VAR).filter(|value| !value.is_empty()) {
            self = self.version(version);
        }
        self
    }

    /// Validate the configuration and build the client.
    ///
    /// ## Errors
    ///
    /// Returns `ApiError::RequestBuild` if the host or version is empty or a
    /// custom header name or value is not valid HTTP.
    pub fn build(self) -> Result<SnapchatClient, ApiError> {
        if self.config.host.is_empty() {
            return Err(ApiError::RequestBuild("host cannot be empty".to_string()));
        }
        if self.config.version.is_empty() {
            return Err(ApiError::RequestBuild(
                "api version cannot be empty".to_string(),
            ));
        }
        for (name, value) in &self.config.custom_headers {
            validate_header(name, value)?;
        }

        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(UreqTransport::new()));
        Ok(SnapchatClient::from_parts(self.config, transport))
    }
}

pub(crate) fn validate_header(name: &str, value: &str) -> Result<(), ApiError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| ApiError::RequestBuild(format!("invalid header name '{name}': {e}")))?;
    HeaderValue::from_str(value)
        .map_err(|e| ApiError::RequestBuild(format!("invalid value for header '{name}': {e}")))?;
    Ok(())
}

//! HTTP transport types and the pluggable transport seam.
//!
//! # Design
//! Requests and responses are plain data. `SnapchatClient` builds an
//! `HttpRequest`, hands it to an `HttpTransport`, and interprets the returned
//! `HttpResponse`. The transport is the only component that touches the
//! network, so tests swap in a recording fake and host-does-IO callers can
//! skip it entirely and feed responses to `SnapchatClient::decode_response`.
//!
//! `UreqTransport` is the default, a blocking transport over `ureq`.

use std::collections::BTreeMap;
use std::time::Duration;

use thiserror::Error;

/// Global timeout applied by the default agent when the caller's context has
/// no deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Header names are stored lower-cased, so inserting a header that is already
/// present replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub(crate) fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }
}

/// An HTTP response described as plain data. The body has been read in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

/// Network-level failure reported by a transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    TimedOut,
    #[error("{0}")]
    Failed(String),
}

/// Executes one HTTP round trip.
///
/// `timeout` is the time left on the caller's context, if it has a deadline.
/// Implementations make exactly one attempt and must return the whole body.
pub trait HttpTransport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
        timeout: Option<Duration>,
    ) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport backed by a `ureq::Agent`.
///
/// The agent is configured to hand 4xx/5xx responses back as data so the
/// client can classify status codes itself.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(DEFAULT_TIMEOUT))
            .build()
            .new_agent();
        Self { agent }
    }

    /// Wrap a caller-configured agent.
    ///
    /// Status-as-error is switched off per request, so any agent works.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for UreqTransport {
    fn send(
        &self,
        request: HttpRequest,
        timeout: Option<Duration>,
    ) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let result = match (method, body) {
            (HttpMethod::Get, _) => prepare(self.agent.get(&url), &headers, timeout).call(),
            (HttpMethod::Delete, _) => prepare(self.agent.delete(&url), &headers, timeout).call(),
            (HttpMethod::Post, Some(body)) => {
                prepare(self.agent.post(&url), &headers, timeout).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => {
                prepare(self.agent.post(&url), &headers, timeout).send_empty()
            }
            (HttpMethod::Put, Some(body)) => {
                prepare(self.agent.put(&url), &headers, timeout).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => prepare(self.agent.put(&url), &headers, timeout).send_empty(),
        };

        let mut response = result.map_err(transport_error)?;
        let status = response.status().as_u16();
        let response_headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_owned(), value.to_owned()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(transport_error)?;

        Ok(HttpResponse {
            status,
            headers: response_headers,
            body,
        })
    }
}

fn prepare<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &BTreeMap<String, String>,
    timeout: Option<Duration>,
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let config = builder.config().http_status_as_error(false);
    match timeout {
        Some(timeout) => config.timeout_global(Some(timeout)).build(),
        None => config.build(),
    }
}

fn transport_error(error: ureq::Error) -> TransportError {
    match error {
        ureq::Error::Timeout(_) => TransportError::TimedOut,
        other => TransportError::Failed(other.to_string()),
    }
}

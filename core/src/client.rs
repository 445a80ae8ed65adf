//! Request construction, execution, and response decoding for the Snapchat
//! Ads API.
//!
//! # Design
//! `SnapchatClient` owns a configuration snapshot and a transport. A call
//! goes through three steps, each usable on its own:
//!
//! 1. `build_request` / `build_json_request` turn a method, a relative path
//!    and an optional body into an `HttpRequest`. No I/O happens here.
//! 2. `execute` sends the request through the transport under the caller's
//!    `Context`, exactly once.
//! 3. `decode_response` maps the status code and decodes the JSON body.
//!
//! Resource accessors (`client.ads()`, `client.campaigns()`, ...) layer the
//! envelope rules from `crate::envelope` on top.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, Span};
use ureq::http::Uri;

use crate::config::{validate_header, ClientBuilder, ClientConfig};
use crate::context::Context;
use crate::error::{ApiError, HttpStatusError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::resource::{Measurements, Resource, Users};
use crate::types::{Ad, AdAccount, AdSquad, Campaign, FundingSource, Organization};

/// Client for the Snapchat Ads API.
///
/// The client is `Send + Sync`; share it by reference or in an `Arc` and call
/// it from as many threads as needed. Each call builds its own request.
pub struct SnapchatClient {
    config: RwLock<Arc<ClientConfig>>,
    transport: Arc<dyn HttpTransport>,
}

impl SnapchatClient {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Client with default settings and the given access token.
    pub fn new(access_token: impl Into<String>) -> Result<Self, ApiError> {
        Self::builder().access_token(access_token).build()
    }

    pub(crate) fn from_parts(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config: RwLock::new(Arc::new(config)),
            transport,
        }
    }

    /// The current configuration snapshot.
    pub fn config(&self) -> Arc<ClientConfig> {
        Arc::clone(&self.config.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Copy of the custom headers sent with every request.
    pub fn custom_headers(&self) -> BTreeMap<String, String> {
        self.config().custom_headers().clone()
    }

    /// Replace an outdated access token.
    ///
    /// Requests already in flight keep the snapshot they started with.
    pub fn update_access_token(&self, access_token: impl Into<String>) {
        let mut slot = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let next = slot.with_access_token(access_token.into());
        *slot = Arc::new(next);
    }

    /// Build a request without a body.
    pub fn build_request(&self, method: HttpMethod, path: &str) -> Result<HttpRequest, ApiError> {
        assemble(&self.config(), method, path, None)
    }

    /// Build a request with a JSON body.
    pub fn build_json_request<B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_string(body).map_err(ApiError::Encoding)?;
        assemble(&self.config(), method, path, Some(body))
    }

    /// Send `request` once and decode the JSON response into `T`.
    ///
    /// ## Errors
    ///
    /// - `Canceled` / `TimedOut` if `ctx` is done before or during the call
    /// - `Transport` if no response arrived
    /// - `Status` for any status outside 200..=399
    /// - `Decode` if the body is not the expected JSON
    ///
    /// The transport call blocks. A [`Context::cancel`] issued mid-flight is
    /// observed only after the transport returns, at which point the response
    /// is discarded undecoded.
    #[instrument(
        name = "snapchat_request",
        skip_all,
        fields(
            http.method = request.method.as_str(),
            http.url = %request.url,
            http.status_code = tracing::field::Empty,
        )
    )]
    pub fn execute<T>(&self, ctx: &Context, request: HttpRequest) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        ctx.check()?;
        debug!("sending request");

        let response = self
            .transport
            .send(request, ctx.remaining())
            .map_err(|error| match error {
                TransportError::TimedOut => ApiError::TimedOut,
                TransportError::Failed(message) => ApiError::Transport(message),
            })?;

        Span::current().record("http.status_code", response.status);
        ctx.check()?;
        debug!("response received");

        decode_response(response)
    }

    /// Build, send and decode in one step.
    pub(crate) fn call<T>(
        &self,
        ctx: &Context,
        method: HttpMethod,
        path: &str,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let request = self.build_request(method, path)?;
        self.execute(ctx, request)
    }

    pub fn ads(&self) -> Resource<'_, Ad> {
        Resource::new(self)
    }

    pub fn ad_squads(&self) -> Resource<'_, AdSquad> {
        Resource::new(self)
    }

    pub fn campaigns(&self) -> Resource<'_, Campaign> {
        Resource::new(self)
    }

    pub fn ad_accounts(&self) -> Resource<'_, AdAccount> {
        Resource::new(self)
    }

    pub fn organizations(&self) -> Resource<'_, Organization> {
        Resource::new(self)
    }

    pub fn funding_sources(&self) -> Resource<'_, FundingSource> {
        Resource::new(self)
    }

    pub fn measurements(&self) -> Measurements<'_> {
        Measurements::new(self)
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }
}

impl std::fmt::Debug for SnapchatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let config = self.config();
        f.debug_struct("SnapchatClient")
            .field("host", &config.host())
            .field("version", &config.version())
            .field("has_access_token", &config.access_token().is_some())
            .finish_non_exhaustive()
    }
}

/// Map the status code, then decode the body as JSON.
pub fn decode_response<T>(response: HttpResponse) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(ApiError::Decode)
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    match HttpStatusError::from_status(response.status) {
        None => Ok(()),
        Some(error) => Err(ApiError::Status {
            error,
            body: response.body.clone(),
        }),
    }
}

fn assemble(
    config: &ClientConfig,
    method: HttpMethod,
    path: &str,
    body: Option<String>,
) -> Result<HttpRequest, ApiError> {
    if path.is_empty() {
        return Err(ApiError::RequestBuild(
            "request path cannot be empty".to_string(),
        ));
    }

    let url = format!("{}/{}/{}", config.host(), config.version(), path);
    url.parse::<Uri>()
        .map_err(|e| ApiError::RequestBuild(format!("invalid url '{url}': {e}")))?;

    let mut request = HttpRequest::new(method, url);
    for (name, value) in config.custom_headers() {
        request.set_header(name, value.as_str());
    }

    request.set_header("user-agent", config.user_agent());
    if body.is_some() {
        request.set_header("content-type", "application/json");
    }
    if let Some(token) = config.access_token() {
        let value = format!("Bearer {token}");
        validate_header("authorization", &value)?;
        request.set_header("authorization", value);
    }

    request.body = body;
    Ok(request)
}

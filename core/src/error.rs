//! Error types for the Snapchat Ads client.
//!
//! # Design
//! Every layer fails fast with one of these variants and accessors pass them
//! through unchanged. HTTP status failures get their own enum so callers can
//! match on a recognised code (`HttpStatusError::TooManyRequests`) without
//! caring about the body, while `Other` keeps the exact numeric code for
//! anything unrecognised. Envelope-level failures carry a short description
//! of the operation, e.g. `get ad with id 42`.

use thiserror::Error;

/// Non-2xx/3xx status code returned by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HttpStatusError {
    #[error("400 bad request")]
    BadRequest,
    #[error("401 unauthorized")]
    Unauthorized,
    #[error("402 payment required")]
    PaymentRequired,
    #[error("403 forbidden")]
    Forbidden,
    #[error("404 not found")]
    NotFound,
    #[error("405 method not allowed")]
    MethodNotAllowed,
    #[error("406 not acceptable")]
    NotAcceptable,
    #[error("410 gone")]
    Gone,
    #[error("429 too many requests")]
    TooManyRequests,
    #[error("500 internal server error")]
    InternalServerError,
    #[error("503 service unavailable")]
    ServiceUnavailable,
    #[error("{0} status code returned from snapchat api")]
    Other(u16),
}

impl HttpStatusError {
    /// Classify a status code. Returns `None` for 200..=399.
    pub const fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=399 => None,
            400 => Some(Self::BadRequest),
            401 => Some(Self::Unauthorized),
            402 => Some(Self::PaymentRequired),
            403 => Some(Self::Forbidden),
            404 => Some(Self::NotFound),
            405 => Some(Self::MethodNotAllowed),
            406 => Some(Self::NotAcceptable),
            410 => Some(Self::Gone),
            429 => Some(Self::TooManyRequests),
            500 => Some(Self::InternalServerError),
            503 => Some(Self::ServiceUnavailable),
            other => Some(Self::Other(other)),
        }
    }

    pub const fn status(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::PaymentRequired => 402,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::NotAcceptable => 406,
            Self::Gone => 410,
            Self::TooManyRequests => 429,
            Self::InternalServerError => 500,
            Self::ServiceUnavailable => 503,
            Self::Other(status) => status,
        }
    }
}

/// Errors returned by `SnapchatClient` and its resource accessors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be assembled (empty path, bad URL, bad header).
    #[error("failed to build request: {0}")]
    RequestBuild(String),

    /// The request payload could not be serialized to JSON.
    #[error("failed to encode request body: {0}")]
    Encoding(#[source] serde_json::Error),

    /// The transport failed before a response arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// The caller's context was canceled before the response was used.
    #[error("request canceled")]
    Canceled,

    /// The caller's deadline elapsed before the response was used.
    #[error("request timed out")]
    TimedOut,

    /// The API answered with a status outside 200..=399.
    #[error("{error}")]
    Status { error: HttpStatusError, body: String },

    /// The response body is not the expected JSON.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// HTTP succeeded but the envelope's `request_status` is not "success".
    #[error("non-success status returned from snapchat api ({context}): {status}")]
    NonSuccessStatus { context: String, status: String },

    /// A singleton lookup came back with no entity.
    #[error("nothing found ({context})")]
    NotFound { context: String },

    /// A list came back with no successful entities.
    #[error("no results ({context})")]
    EmptyResult { context: String },
}

impl ApiError {
    /// The HTTP status classification, if this is a status error.
    pub const fn status_error(&self) -> Option<HttpStatusError> {
        match self {
            Self::Status { error, .. } => Some(*error),
            _ => None,
        }
    }

    /// True for network-level failures, including cancellation and timeout.
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Canceled | Self::TimedOut)
    }
}

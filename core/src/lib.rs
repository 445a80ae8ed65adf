//! Blocking client for the Snapchat Ads API.
//!
//! # Overview
//! Turns typed calls (`client.ads().get(&ctx, "42")`) into authenticated
//! HTTPS requests against `{host}/{version}/{path}` and decodes the API's
//! JSON envelopes into entity structs.
//!
//! # Design
//! - `SnapchatClient` holds a swappable configuration snapshot and a
//!   pluggable `HttpTransport`; `UreqTransport` is the default.
//! - Request building, execution, and decoding are separate steps, so a
//!   caller can do its own I/O and still use `decode_response` and the
//!   envelope helpers.
//! - Every response passes the envelope contract in `envelope`: the
//!   top-level status must be success, and list results keep only entries
//!   whose own status is success.
//! - Each call runs under a caller-supplied `Context` for cancellation and
//!   deadlines. There is no retry.

pub mod client;
pub mod config;
pub mod context;
pub mod envelope;
pub mod error;
pub mod http;
pub mod resource;
pub mod types;

pub use client::{decode_response, SnapchatClient};
pub use config::{ClientBuilder, ClientConfig, DEFAULT_HOST, DEFAULT_VERSION};
pub use context::Context;
pub use envelope::{Envelope, SubEnvelope};
pub use error::{ApiError, HttpStatusError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError, UreqTransport};
pub use resource::{Addressable, Deletable, Entity, Measurements, Resource, Users};
pub use types::{
    Ad, AdAccount, AdSquad, Campaign, CampaignMeasurementSpec, FundingSource, MeasurementStats,
    Organization, Timestamp, TotalStat, User,
};

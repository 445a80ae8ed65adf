//! The two-level success contract shared by every resource response.
//!
//! ```json
//! {
//!   "request_status": "SUCCESS",
//!   "request_id": "5f2a...",
//!   "ads": [
//!     { "sub_request_status": "SUCCESS", "ad": { "id": "..." } },
//!     { "sub_request_status": "ERROR", "sub_request_error_reason": "...", "ad": { "id": "..." } }
//!   ]
//! }
//! ```
//!
//! The array key and the per-item entity key vary by resource; `Entity`
//! supplies both. Status strings are compared case-insensitively against
//! `success`.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::resource::Entity;
use crate::types::null_as_default;

/// A decoded response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<E> {
    pub request_status: String,
    pub request_id: String,
    pub items: Vec<SubEnvelope<E>>,
}

/// One entry of an envelope, wrapping a single entity.
#[derive(Debug, Clone, PartialEq)]
pub struct SubEnvelope<E> {
    pub sub_request_status: String,
    pub sub_request_error_reason: Option<String>,
    /// `None` when the entry carried no entity under the expected key.
    pub entity: Option<E>,
}

impl<E> Envelope<E> {
    pub fn is_success(&self) -> bool {
        is_success(&self.request_status)
    }
}

impl<E> SubEnvelope<E> {
    pub fn is_success(&self) -> bool {
        is_success(&self.sub_request_status)
    }
}

pub fn is_success(status: &str) -> bool {
    status.eq_ignore_ascii_case("success")
}

#[derive(Deserialize)]
struct WireEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    request_status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    request_id: String,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

#[derive(Deserialize)]
struct WireSubEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    sub_request_status: String,
    #[serde(default)]
    sub_request_error_reason: Option<String>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl WireSubEnvelope {
    fn into_typed<E: Entity>(mut self) -> Result<SubEnvelope<E>, serde_json::Error> {
        let entity = match self.rest.remove(E::SINGULAR_KEY) {
            None | Some(Value::Null) => None,
            Some(value) => Some(serde_json::from_value(value)?),
        };
        Ok(SubEnvelope {
            sub_request_status: self.sub_request_status,
            sub_request_error_reason: self.sub_request_error_reason,
            entity,
        })
    }
}

impl<'de, E: Entity> Deserialize<'de> for Envelope<E> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut wire = WireEnvelope::deserialize(deserializer)?;
        let items = match wire.rest.remove(E::PLURAL_KEY) {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => {
                let raw: Vec<WireSubEnvelope> =
                    serde_json::from_value(value).map_err(D::Error::custom)?;
                raw.into_iter()
                    .map(WireSubEnvelope::into_typed)
                    .collect::<Result<_, _>>()
                    .map_err(D::Error::custom)?
            }
        };

        Ok(Self {
            request_status: wire.request_status,
            request_id: wire.request_id,
            items,
        })
    }
}

/// Top-level check only. Returns the envelope untouched on success.
pub fn ensure_success<E>(envelope: Envelope<E>, context: &str) -> Result<Envelope<E>, ApiError> {
    if envelope.is_success() {
        Ok(envelope)
    } else {
        Err(ApiError::NonSuccessStatus {
            context: context.to_string(),
            status: envelope.request_status,
        })
    }
}

/// The entity for a singleton lookup.
///
/// Uses the first entry as-is, see [`first_entity`].
pub fn extract_single<E>(envelope: Envelope<E>, context: &str) -> Result<E, ApiError> {
    let envelope = ensure_success(envelope, context)?;
    first_entity(envelope.items).ok_or_else(|| ApiError::NotFound {
        context: context.to_string(),
    })
}

/// Entities whose own status is success, in response order.
///
/// A successful entry that carries no entity is skipped; it does not count
/// toward the non-empty check.
pub fn extract_list<E>(envelope: Envelope<E>, context: &str) -> Result<Vec<E>, ApiError> {
    let envelope = ensure_success(envelope, context)?;
    let entities: Vec<E> = envelope
        .items
        .into_iter()
        .filter(SubEnvelope::is_success)
        .filter_map(|item| item.entity)
        .collect();

    if entities.is_empty() {
        return Err(ApiError::EmptyResult {
            context: context.to_string(),
        });
    }
    Ok(entities)
}

pub fn extract_delete_ack<E>(envelope: Envelope<E>, context: &str) -> Result<(), ApiError> {
    ensure_success(envelope, context).map(|_| ())
}

/// Entity of the first entry, ignoring that entry's own status and every
/// later entry.
pub fn first_entity<E>(items: Vec<SubEnvelope<E>>) -> Option<E> {
    items.into_iter().next().and_then(|item| item.entity)
}

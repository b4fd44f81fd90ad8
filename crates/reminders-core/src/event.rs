//! Domain event abstractions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::revision::StreamRevision;

/// Metadata attached to every domain event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Aggregate/stream this event belongs to.
    pub stream_id: String,
    /// Position of the event within its stream.
    pub version: StreamRevision,
    /// Timestamp of event creation.
    pub timestamp: DateTime<Utc>,
}

impl EventMetadata {
    /// Builds metadata for an event of type `event_type`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if `stream_id` is blank.
    pub fn new(
        event_type: &'static str,
        stream_id: impl Into<String>,
        version: StreamRevision,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let stream_id = stream_id.into();
        require_present(event_type, "stream_id", &stream_id)?;
        Ok(Self {
            stream_id,
            version,
            timestamp,
        })
    }
}

/// Fails with `DomainError::MissingField` when `value` is blank.
///
/// # Errors
///
/// Returns `DomainError::MissingField` naming `event_type` and `field`.
pub fn require_present(
    event_type: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::MissingField { event_type, field });
    }
    Ok(())
}

/// Trait that all domain events implement.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the event type name (used for serialization routing).
    fn event_type(&self) -> &'static str;

    /// Serializes the event payload to JSON.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the payload cannot be encoded.
    fn to_payload(&self) -> Result<serde_json::Value, DomainError>;

    /// Returns the metadata for this event.
    fn metadata(&self) -> &EventMetadata;

    /// Returns the stream this event belongs to.
    fn stream_id(&self) -> &str {
        &self.metadata().stream_id
    }

    /// Returns the revision carried by this event.
    fn version(&self) -> StreamRevision {
        self.metadata().version
    }

    /// Returns when this event was raised.
    fn timestamp(&self) -> DateTime<Utc> {
        self.metadata().timestamp
    }
}

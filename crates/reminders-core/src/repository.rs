//! Event repository abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;
use crate::revision::StreamRevision;

/// Stored representation of a domain event.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEvent {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Stream (aggregate) this event belongs to.
    pub stream_id: String,
    /// Parent the stream is indexed under, set by the event that attaches it.
    pub parent_id: Option<String>,
    /// Event type name for deserialization routing.
    pub event_type: String,
    /// Serialized event payload.
    pub payload: serde_json::Value,
    /// Position within the stream.
    pub version: StreamRevision,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

/// Repository trait for loading and appending domain events.
///
/// Implementations must serialize appends per stream: an append succeeds
/// only if `expected_version` still matches the stream's last revision.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Load all events for a given stream, ordered by version.
    async fn load_events(&self, stream_id: &str) -> Result<Vec<StoredEvent>, DomainError>;

    /// Append new events to a stream with optimistic concurrency.
    /// `expected_version` is the last known revision of the stream.
    async fn append_events(
        &self,
        stream_id: &str,
        expected_version: StreamRevision,
        events: &[StoredEvent],
    ) -> Result<(), DomainError>;

    /// Returns the ids of every stream indexed under `parent_id`, in the
    /// order they were first attached.
    async fn stream_ids_by_parent(&self, parent_id: &str) -> Result<Vec<String>, DomainError>;
}

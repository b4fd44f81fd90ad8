//! Domain error types.

use thiserror::Error;

use crate::revision::StreamRevision;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A required field was absent when constructing an event.
    #[error("missing required field '{field}' for {event_type}")]
    MissingField {
        /// The event type being constructed.
        event_type: &'static str,
        /// The absent field.
        field: &'static str,
    },

    /// A country code did not consist of exactly two alphabetic characters.
    #[error("country code is expected to consist of exactly 2 alphabetic characters - value: '{0}'")]
    InvalidCountry(String),

    /// An event does not directly follow the revision of the state it is
    /// folded into.
    #[error("inconsistent stream revision for stream '{stream_id}': {actual} (expected: {expected})")]
    InconsistentRevision {
        /// The stream the event belongs to.
        stream_id: String,
        /// The revision carried by the event.
        actual: StreamRevision,
        /// The revision the state expected next.
        expected: StreamRevision,
    },

    /// A stored event could not be mapped to a known event variant.
    #[error("unexpected event type: {0}")]
    UnexpectedEvent(String),

    /// A command was rejected because of the aggregate's current status.
    #[error("update denied for reminder '{id}' (status: '{status}'): {action}")]
    UpdateDenied {
        /// The aggregate identifier.
        id: String,
        /// The status the aggregate was in.
        status: String,
        /// Description of the attempted action.
        action: String,
    },

    /// A creation command targeted an identifier that already has history.
    #[error("unexpected command: reminder ID is already present: {0}")]
    AlreadyPresent(String),

    /// An aggregate was not found.
    #[error("unexpected command: reminder ID does not exist: {0}")]
    AggregateNotFound(String),

    /// Optimistic concurrency conflict.
    #[error("concurrency conflict on aggregate {aggregate_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: String,
        /// The expected version.
        expected: StreamRevision,
        /// The actual version found.
        actual: StreamRevision,
    },

    /// A validation error in caller-supplied input.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Returns `true` for expected, caller-recoverable rejections of a
    /// command, as opposed to corruption or infrastructure failures.
    #[must_use]
    pub fn is_domain_rule_violation(&self) -> bool {
        matches!(
            self,
            Self::UpdateDenied { .. } | Self::AlreadyPresent(_) | Self::AggregateNotFound(_)
        )
    }
}

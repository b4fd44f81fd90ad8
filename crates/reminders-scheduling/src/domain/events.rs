//! Domain events for the Reminder Scheduling context.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use reminders_core::error::DomainError;
use reminders_core::event::{DomainEvent, EventMetadata, require_present};
use reminders_core::revision::StreamRevision;
use serde::{Deserialize, Serialize};

use super::country::Country;

/// The kind of follow-up a reminder asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderType {
    /// Call the customer back.
    CallCustomer,
}

impl fmt::Display for ReminderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CallCustomer => f.write_str("CALL_CUSTOMER"),
        }
    }
}

/// Emitted when a reminder is first scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderScheduled {
    /// The intervention the reminder belongs to.
    pub intervention_id: String,
    /// What the reminder asks for.
    pub reminder_type: ReminderType,
    /// The country handling the reminder.
    pub country: Country,
    /// When the reminder is due.
    pub scheduled_time: DateTime<FixedOffset>,
}

/// Emitted when a reminder is moved to another time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRescheduled {
    /// The new due time.
    pub scheduled_time: DateTime<FixedOffset>,
}

/// Emitted when a reminder is assigned to an operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderAssigned {
    /// The operator now in charge.
    pub assignee: String,
}

/// Emitted when a reminder is handed over to another country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderTransferred {
    /// The country now handling the reminder.
    pub country: Country,
}

/// Event type identifier for [`ReminderScheduled`].
pub const REMINDER_SCHEDULED_EVENT_TYPE: &str = "reminder.scheduled";

/// Event type identifier for [`ReminderRescheduled`].
pub const REMINDER_RESCHEDULED_EVENT_TYPE: &str = "reminder.rescheduled";

/// Event type identifier for a reopened reminder.
pub const REMINDER_REOPENED_EVENT_TYPE: &str = "reminder.reopened";

/// Event type identifier for [`ReminderAssigned`].
pub const REMINDER_ASSIGNED_EVENT_TYPE: &str = "reminder.assigned";

/// Event type identifier for an unassigned reminder.
pub const REMINDER_UNASSIGNED_EVENT_TYPE: &str = "reminder.unassigned";

/// Event type identifier for [`ReminderTransferred`].
pub const REMINDER_TRANSFERRED_EVENT_TYPE: &str = "reminder.transferred";

/// Event type identifier for a cancelled reminder.
pub const REMINDER_CANCELLED_EVENT_TYPE: &str = "reminder.cancelled";

/// Event type identifier for a reminder marked as done.
pub const REMINDER_MARKED_AS_DONE_EVENT_TYPE: &str = "reminder.marked_as_done";

/// Every event type the reminder stream may contain.
pub const REMINDER_EVENT_TYPES: [&str; 8] = [
    REMINDER_SCHEDULED_EVENT_TYPE,
    REMINDER_RESCHEDULED_EVENT_TYPE,
    REMINDER_REOPENED_EVENT_TYPE,
    REMINDER_ASSIGNED_EVENT_TYPE,
    REMINDER_UNASSIGNED_EVENT_TYPE,
    REMINDER_TRANSFERRED_EVENT_TYPE,
    REMINDER_CANCELLED_EVENT_TYPE,
    REMINDER_MARKED_AS_DONE_EVENT_TYPE,
];

/// Event payload variants for the Reminder Scheduling context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderEventKind {
    /// A reminder has been scheduled.
    Scheduled(ReminderScheduled),
    /// A reminder has been moved to another time.
    Rescheduled(ReminderRescheduled),
    /// A cancelled or done reminder is pending again.
    Reopened,
    /// A reminder has been assigned to an operator.
    Assigned(ReminderAssigned),
    /// A reminder no longer has an operator.
    Unassigned,
    /// A reminder has been handed over to another country.
    Transferred(ReminderTransferred),
    /// A reminder has been cancelled.
    Cancelled,
    /// A reminder has been completed.
    MarkedAsDone,
}

impl ReminderEventKind {
    /// Returns the event type name of this variant.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Scheduled(_) => REMINDER_SCHEDULED_EVENT_TYPE,
            Self::Rescheduled(_) => REMINDER_RESCHEDULED_EVENT_TYPE,
            Self::Reopened => REMINDER_REOPENED_EVENT_TYPE,
            Self::Assigned(_) => REMINDER_ASSIGNED_EVENT_TYPE,
            Self::Unassigned => REMINDER_UNASSIGNED_EVENT_TYPE,
            Self::Transferred(_) => REMINDER_TRANSFERRED_EVENT_TYPE,
            Self::Cancelled => REMINDER_CANCELLED_EVENT_TYPE,
            Self::MarkedAsDone => REMINDER_MARKED_AS_DONE_EVENT_TYPE,
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        match self {
            Self::Scheduled(payload) => require_present(
                REMINDER_SCHEDULED_EVENT_TYPE,
                "intervention_id",
                &payload.intervention_id,
            ),
            Self::Assigned(payload) => {
                require_present(REMINDER_ASSIGNED_EVENT_TYPE, "assignee", &payload.assignee)
            }
            Self::Rescheduled(_)
            | Self::Reopened
            | Self::Unassigned
            | Self::Transferred(_)
            | Self::Cancelled
            | Self::MarkedAsDone => Ok(()),
        }
    }
}

/// Domain event envelope for the Reminder Scheduling context.
///
/// Fields are private so that every event goes through [`ReminderEvent::new`]
/// and its required-field checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderEvent {
    metadata: EventMetadata,
    kind: ReminderEventKind,
}

impl ReminderEvent {
    /// Wraps a payload in its envelope.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if the stream id or a required
    /// payload field is blank.
    pub fn new(metadata: EventMetadata, kind: ReminderEventKind) -> Result<Self, DomainError> {
        require_present(kind.event_type(), "stream_id", &metadata.stream_id)?;
        kind.validate()?;
        Ok(Self { metadata, kind })
    }

    fn build(
        stream_id: &str,
        version: StreamRevision,
        timestamp: DateTime<Utc>,
        kind: ReminderEventKind,
    ) -> Result<Self, DomainError> {
        let metadata = EventMetadata::new(kind.event_type(), stream_id, version, timestamp)?;
        Self::new(metadata, kind)
    }

    /// Builds a [`ReminderScheduled`] event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if `stream_id` or
    /// `intervention_id` is blank.
    pub fn scheduled(
        stream_id: &str,
        version: StreamRevision,
        timestamp: DateTime<Utc>,
        intervention_id: &str,
        reminder_type: ReminderType,
        country: Country,
        scheduled_time: DateTime<FixedOffset>,
    ) -> Result<Self, DomainError> {
        Self::build(
            stream_id,
            version,
            timestamp,
            ReminderEventKind::Scheduled(ReminderScheduled {
                intervention_id: intervention_id.to_owned(),
                reminder_type,
                country,
                scheduled_time,
            }),
        )
    }

    /// Builds a [`ReminderRescheduled`] event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if `stream_id` is blank.
    pub fn rescheduled(
        stream_id: &str,
        version: StreamRevision,
        timestamp: DateTime<Utc>,
        scheduled_time: DateTime<FixedOffset>,
    ) -> Result<Self, DomainError> {
        Self::build(
            stream_id,
            version,
            timestamp,
            ReminderEventKind::Rescheduled(ReminderRescheduled { scheduled_time }),
        )
    }

    /// Builds a reopened event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if `stream_id` is blank.
    pub fn reopened(
        stream_id: &str,
        version: StreamRevision,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Self::build(stream_id, version, timestamp, ReminderEventKind::Reopened)
    }

    /// Builds a [`ReminderAssigned`] event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if `stream_id` or `assignee` is
    /// blank.
    pub fn assigned(
        stream_id: &str,
        version: StreamRevision,
        timestamp: DateTime<Utc>,
        assignee: &str,
    ) -> Result<Self, DomainError> {
        Self::build(
            stream_id,
            version,
            timestamp,
            ReminderEventKind::Assigned(ReminderAssigned {
                assignee: assignee.to_owned(),
            }),
        )
    }

    /// Builds an unassigned event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if `stream_id` is blank.
    pub fn unassigned(
        stream_id: &str,
        version: StreamRevision,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Self::build(stream_id, version, timestamp, ReminderEventKind::Unassigned)
    }

    /// Builds a [`ReminderTransferred`] event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if `stream_id` is blank.
    pub fn transferred(
        stream_id: &str,
        version: StreamRevision,
        timestamp: DateTime<Utc>,
        country: Country,
    ) -> Result<Self, DomainError> {
        Self::build(
            stream_id,
            version,
            timestamp,
            ReminderEventKind::Transferred(ReminderTransferred { country }),
        )
    }

    /// Builds a cancelled event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if `stream_id` is blank.
    pub fn cancelled(
        stream_id: &str,
        version: StreamRevision,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Self::build(stream_id, version, timestamp, ReminderEventKind::Cancelled)
    }

    /// Builds a marked-as-done event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if `stream_id` is blank.
    pub fn marked_as_done(
        stream_id: &str,
        version: StreamRevision,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Self::build(stream_id, version, timestamp, ReminderEventKind::MarkedAsDone)
    }

    /// Returns the event payload.
    #[must_use]
    pub fn kind(&self) -> &ReminderEventKind {
        &self.kind
    }
}

impl DomainEvent for ReminderEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> Result<serde_json::Value, DomainError> {
        serde_json::to_value(&self.kind).map_err(|e| {
            DomainError::Infrastructure(format!("event serialization failed: {e}"))
        })
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}

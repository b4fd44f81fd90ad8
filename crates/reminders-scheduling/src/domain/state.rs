//! Reminder state: the fold of a reminder's event stream.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use reminders_core::error::DomainError;
use reminders_core::event::DomainEvent;
use reminders_core::revision::StreamRevision;
use reminders_core::state::State;
use serde::{Deserialize, Serialize};

use super::country::Country;
use super::events::{ReminderEvent, ReminderEventKind, ReminderType};

/// Lifecycle status of a created reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderStatus {
    /// Waiting to be handled.
    Pending,
    /// Withdrawn before completion.
    Cancelled,
    /// Completed.
    Done,
}

impl fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "PENDING",
            Self::Cancelled => "CANCELLED",
            Self::Done => "DONE",
        };
        f.write_str(label)
    }
}

/// Immutable snapshot of a reminder at a given revision.
///
/// The default value is the blank state of a reminder with no history:
/// revision 0 and every other field unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReminderState {
    /// Revision of the last folded event.
    pub version: StreamRevision,
    /// Reminder identifier, set by the scheduling event.
    pub id: Option<String>,
    /// Intervention the reminder belongs to.
    pub intervention_id: Option<String>,
    /// Lifecycle status; absent only before scheduling.
    pub status: Option<ReminderStatus>,
    /// What the reminder asks for.
    pub reminder_type: Option<ReminderType>,
    /// Operator in charge, if any.
    pub assignee: Option<String>,
    /// Country handling the reminder.
    pub country: Option<Country>,
    /// When the reminder is due.
    pub scheduled_time: Option<DateTime<FixedOffset>>,
}

impl ReminderState {
    /// Returns the state of a reminder with no history.
    #[must_use]
    pub fn blank() -> Self {
        Self::default()
    }

    /// Returns `true` if the reminder is waiting to be handled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == Some(ReminderStatus::Pending)
    }
}

impl State for ReminderState {
    type Event = ReminderEvent;

    fn version(&self) -> StreamRevision {
        self.version
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn apply(&self, event: &ReminderEvent) -> Result<Self, DomainError> {
        self.ensure_next_revision(event)?;

        let base = Self {
            version: event.version(),
            ..self.clone()
        };
        let next = match event.kind() {
            ReminderEventKind::Scheduled(payload) => Self {
                id: Some(event.stream_id().to_owned()),
                intervention_id: Some(payload.intervention_id.clone()),
                status: Some(ReminderStatus::Pending),
                reminder_type: Some(payload.reminder_type),
                country: Some(payload.country.clone()),
                scheduled_time: Some(payload.scheduled_time),
                ..base
            },
            ReminderEventKind::Rescheduled(payload) => Self {
                scheduled_time: Some(payload.scheduled_time),
                ..base
            },
            ReminderEventKind::Reopened => Self {
                status: Some(ReminderStatus::Pending),
                ..base
            },
            ReminderEventKind::Assigned(payload) => Self {
                assignee: Some(payload.assignee.clone()),
                ..base
            },
            ReminderEventKind::Unassigned => Self {
                assignee: None,
                ..base
            },
            ReminderEventKind::Transferred(payload) => Self {
                country: Some(payload.country.clone()),
                ..base
            },
            ReminderEventKind::Cancelled => Self {
                status: Some(ReminderStatus::Cancelled),
                ..base
            },
            ReminderEventKind::MarkedAsDone => Self {
                status: Some(ReminderStatus::Done),
                ..base
            },
        };
        Ok(next)
    }
}

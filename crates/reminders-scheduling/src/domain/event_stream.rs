//! Reminder event streams and their replay.

use reminders_core::event_stream::EventStream;

use super::events::ReminderEvent;
use super::state::ReminderState;

/// The ordered history of one reminder, oldest event first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderEventStream {
    events: Vec<ReminderEvent>,
}

impl ReminderEventStream {
    /// The stream of a reminder with no history.
    #[must_use]
    pub const fn empty() -> Self {
        Self { events: Vec::new() }
    }

    /// Wraps events already in stored order.
    #[must_use]
    pub fn new(events: Vec<ReminderEvent>) -> Self {
        Self { events }
    }

    /// Consumes the stream, returning its events.
    #[must_use]
    pub fn into_events(self) -> Vec<ReminderEvent> {
        self.events
    }
}

impl From<Vec<ReminderEvent>> for ReminderEventStream {
    fn from(events: Vec<ReminderEvent>) -> Self {
        Self::new(events)
    }
}

impl EventStream for ReminderEventStream {
    type State = ReminderState;

    fn events(&self) -> &[ReminderEvent] {
        &self.events
    }

    fn blank_state(&self) -> ReminderState {
        ReminderState::blank()
    }
}

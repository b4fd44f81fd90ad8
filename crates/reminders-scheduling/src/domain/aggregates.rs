//! Aggregate roots for the Reminder Scheduling context.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use reminders_core::aggregate::Aggregate;
use reminders_core::clock::Clock;
use reminders_core::error::DomainError;
use reminders_core::event::EventMetadata;
use reminders_core::event_stream::EventStream;
use reminders_core::state::State;

use super::country::Country;
use super::event_stream::ReminderEventStream;
use super::events::{
    ReminderAssigned, ReminderEvent, ReminderEventKind, ReminderRescheduled, ReminderScheduled,
    ReminderTransferred, ReminderType,
};
use super::state::{ReminderState, ReminderStatus};

/// The aggregate root for a reminder.
///
/// Every command either raises its events and folds them into the state, or
/// fails and leaves both the state and the pending events untouched.
#[derive(Debug)]
pub struct ReminderAggregate {
    /// Current state, pending events included.
    state: ReminderState,
    /// Events raised since the aggregate was loaded, pending persistence.
    pending_events: Vec<ReminderEvent>,
    /// Time source stamping raised events.
    clock: Arc<dyn Clock>,
}

impl ReminderAggregate {
    /// Rehydrates a reminder by replaying its history.
    ///
    /// # Errors
    ///
    /// Returns the replay error if the history is inconsistent.
    pub fn from_history(
        history: &ReminderEventStream,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            state: history.replay()?,
            pending_events: Vec::new(),
            clock,
        })
    }

    /// Creates a brand-new reminder and raises its scheduling event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if `reminder_id` or
    /// `intervention_id` is blank.
    pub fn schedule_new(
        reminder_id: &str,
        intervention_id: &str,
        reminder_type: ReminderType,
        country: Country,
        scheduled_time: DateTime<FixedOffset>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DomainError> {
        let mut aggregate = Self::from_history(&ReminderEventStream::empty(), clock)?;
        aggregate.schedule(
            reminder_id,
            intervention_id,
            reminder_type,
            country,
            scheduled_time,
        )?;
        Ok(aggregate)
    }

    /// Schedules the reminder. Does nothing if it has already been scheduled.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if `reminder_id` or
    /// `intervention_id` is blank.
    pub fn schedule(
        &mut self,
        reminder_id: &str,
        intervention_id: &str,
        reminder_type: ReminderType,
        country: Country,
        scheduled_time: DateTime<FixedOffset>,
    ) -> Result<(), DomainError> {
        if self.state.status.is_some() {
            return Ok(());
        }
        self.raise_all(
            reminder_id,
            vec![ReminderEventKind::Scheduled(ReminderScheduled {
                intervention_id: intervention_id.to_owned(),
                reminder_type,
                country,
                scheduled_time,
            })],
        )
    }

    /// Moves a pending reminder to another time.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UpdateDenied` unless the reminder is pending.
    pub fn reschedule(&mut self, scheduled_time: DateTime<FixedOffset>) -> Result<(), DomainError> {
        if !self.state.is_pending() {
            return Err(self.deny(format!("reschedule to {}", scheduled_time.to_rfc3339())));
        }
        self.raise(ReminderEventKind::Rescheduled(ReminderRescheduled {
            scheduled_time,
        }))
    }

    /// Assigns a pending reminder to `operator`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UpdateDenied` unless the reminder is pending,
    /// or `DomainError::MissingField` if `operator` is blank.
    pub fn assign_to(&mut self, operator: &str) -> Result<(), DomainError> {
        if !self.state.is_pending() {
            return Err(self.deny(format!("assign to {operator}")));
        }
        self.raise(ReminderEventKind::Assigned(ReminderAssigned {
            assignee: operator.to_owned(),
        }))
    }

    /// Removes the operator of a pending reminder.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UpdateDenied` unless the reminder is pending.
    pub fn unassign(&mut self) -> Result<(), DomainError> {
        if !self.state.is_pending() {
            return Err(self.deny("unassign".to_owned()));
        }
        self.raise(ReminderEventKind::Unassigned)
    }

    /// Hands a pending reminder over to `country`. The reminder is always
    /// unassigned first, so two events are raised.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UpdateDenied` unless the reminder is pending.
    pub fn transfer_to(&mut self, country: Country) -> Result<(), DomainError> {
        if !self.state.is_pending() {
            return Err(self.deny(format!("transfer to {country}")));
        }
        let stream_id = self.stream_id().to_owned();
        self.raise_all(
            &stream_id,
            vec![
                ReminderEventKind::Unassigned,
                ReminderEventKind::Transferred(ReminderTransferred { country }),
            ],
        )
    }

    /// Completes a pending reminder. Does nothing if it is already done.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UpdateDenied` if the reminder is cancelled.
    pub fn mark_as_done(&mut self) -> Result<(), DomainError> {
        match self.state.status {
            Some(ReminderStatus::Pending) => self.raise(ReminderEventKind::MarkedAsDone),
            Some(ReminderStatus::Done) => Ok(()),
            _ => Err(self.deny("mark as done".to_owned())),
        }
    }

    /// Cancels a pending reminder. Does nothing if it is already cancelled.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UpdateDenied` if the reminder is done.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        match self.state.status {
            Some(ReminderStatus::Pending) => self.raise(ReminderEventKind::Cancelled),
            Some(ReminderStatus::Cancelled) => Ok(()),
            _ => Err(self.deny("cancel".to_owned())),
        }
    }

    /// Makes a cancelled or done reminder pending again. Does nothing if it
    /// is already pending.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if the reminder was never
    /// scheduled, since the event would have no stream id.
    pub fn reopen(&mut self) -> Result<(), DomainError> {
        if self.state.is_pending() {
            return Ok(());
        }
        self.raise(ReminderEventKind::Reopened)
    }

    fn stream_id(&self) -> &str {
        self.state.id().unwrap_or_default()
    }

    fn raise(&mut self, kind: ReminderEventKind) -> Result<(), DomainError> {
        let stream_id = self.stream_id().to_owned();
        self.raise_all(&stream_id, vec![kind])
    }

    /// Stamps each payload with the next revision and the clock's time and
    /// folds it into the state. Nothing is committed unless every event
    /// folds.
    fn raise_all(
        &mut self,
        stream_id: &str,
        kinds: Vec<ReminderEventKind>,
    ) -> Result<(), DomainError> {
        let mut state = self.state.clone();
        let mut raised = Vec::with_capacity(kinds.len());
        for kind in kinds {
            let metadata = EventMetadata::new(
                kind.event_type(),
                stream_id,
                state.version().next(),
                self.clock.now(),
            )?;
            let event = ReminderEvent::new(metadata, kind)?;
            state = state.apply(&event)?;
            raised.push(event);
        }
        self.state = state;
        self.pending_events.extend(raised);
        Ok(())
    }

    fn deny(&self, action: String) -> DomainError {
        DomainError::UpdateDenied {
            id: self.stream_id().to_owned(),
            status: self
                .state
                .status
                .map_or_else(|| "NONE".to_owned(), |status| status.to_string()),
            action,
        }
    }
}

impl Aggregate for ReminderAggregate {
    type State = ReminderState;

    fn state(&self) -> &ReminderState {
        &self.state
    }

    fn pending_events(&self) -> &[ReminderEvent] {
        &self.pending_events
    }

    fn clear_pending_events(&mut self) {
        self.pending_events.clear();
    }
}

//! Command handlers for the Reminder Scheduling context.
//!
//! Each handler loads the reminder, lets the aggregate decide, and persists
//! whatever it raised.

use std::sync::Arc;

use reminders_core::aggregate::Aggregate;
use reminders_core::clock::Clock;
use reminders_core::command::Command;
use reminders_core::error::DomainError;
use reminders_core::id::IdGenerator;
use tracing::{debug, info, instrument, warn};

use crate::application::event_store::ReminderEventStore;
use crate::application::require_id;
use crate::config::ReminderConfig;
use crate::domain::aggregates::ReminderAggregate;
use crate::domain::commands::{
    AssignReminder, CancelReminder, MarkReminderAsDone, ReminderCommand, RescheduleReminder,
    ReopenReminder, ScheduleReminder, TransferReminder, UnassignReminder,
};
use crate::domain::country::Country;
use crate::domain::state::ReminderState;

/// Orchestrates reminder commands against a [`ReminderEventStore`].
#[derive(Clone)]
pub struct ReminderCommandHandler {
    store: Arc<dyn ReminderEventStore>,
    id_generator: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    config: ReminderConfig,
}

impl std::fmt::Debug for ReminderCommandHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReminderCommandHandler")
            .field("id_generator", &self.id_generator)
            .field("clock", &self.clock)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReminderCommandHandler {
    /// Creates a handler. New reminders are stamped by `clock` and belong to
    /// the configured default country.
    #[must_use]
    pub fn new(
        store: Arc<dyn ReminderEventStore>,
        id_generator: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        config: ReminderConfig,
    ) -> Self {
        Self {
            store,
            id_generator,
            clock,
            config,
        }
    }

    /// Schedules a new reminder and returns its state.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the intervention id is blank,
    /// `DomainError::AlreadyPresent` if the generated id is taken, or the
    /// store's error if loading or saving fails.
    #[instrument(skip(self, command), fields(intervention_id = %command.intervention_id))]
    pub async fn schedule(&self, command: &ScheduleReminder) -> Result<ReminderState, DomainError> {
        let result = self.try_schedule(command).await;
        match &result {
            Ok(state) => info!(
                reminder_id = state.id.as_deref().unwrap_or_default(),
                "reminder scheduled"
            ),
            Err(err) => log_rejection(command, err),
        }
        result
    }

    async fn try_schedule(&self, command: &ScheduleReminder) -> Result<ReminderState, DomainError> {
        require_id("intervention id", &command.intervention_id)?;
        let reminder_id = self.id_generator.generate();
        if self.store.find(&reminder_id).await?.is_some() {
            return Err(DomainError::AlreadyPresent(reminder_id));
        }

        let mut aggregate = ReminderAggregate::schedule_new(
            &reminder_id,
            &command.intervention_id,
            command.reminder_type,
            self.config.default_country.clone(),
            command.scheduled_time,
            Arc::clone(&self.clock),
        )?;
        let state = aggregate.state().clone();
        self.store.save(&mut aggregate).await?;
        Ok(state)
    }

    /// Moves a reminder to another time.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` for an unknown reminder,
    /// `DomainError::UpdateDenied` unless it is pending, or the store's error.
    #[instrument(skip(self, command), fields(reminder_id = %command.reminder_id))]
    pub async fn reschedule(&self, command: &RescheduleReminder) -> Result<(), DomainError> {
        let scheduled_time = command.scheduled_time;
        self.handle(command, |reminder| reminder.reschedule(scheduled_time))
            .await
    }

    /// Makes a cancelled or done reminder pending again.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` for an unknown reminder, or
    /// the store's error.
    #[instrument(skip(self, command), fields(reminder_id = %command.reminder_id))]
    pub async fn reopen(&self, command: &ReopenReminder) -> Result<(), DomainError> {
        self.handle(command, ReminderAggregate::reopen).await
    }

    /// Cancels a reminder.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` for an unknown reminder,
    /// `DomainError::UpdateDenied` if it is done, or the store's error.
    #[instrument(skip(self, command), fields(reminder_id = %command.reminder_id))]
    pub async fn cancel(&self, command: &CancelReminder) -> Result<(), DomainError> {
        self.handle(command, ReminderAggregate::cancel).await
    }

    /// Completes a reminder.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` for an unknown reminder,
    /// `DomainError::UpdateDenied` if it is cancelled, or the store's error.
    #[instrument(skip(self, command), fields(reminder_id = %command.reminder_id))]
    pub async fn mark_as_done(&self, command: &MarkReminderAsDone) -> Result<(), DomainError> {
        self.handle(command, ReminderAggregate::mark_as_done).await
    }

    /// Assigns a reminder to an operator.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the operator is blank,
    /// `DomainError::AggregateNotFound` for an unknown reminder,
    /// `DomainError::UpdateDenied` unless it is pending, or the store's error.
    #[instrument(skip(self, command), fields(reminder_id = %command.reminder_id, operator = %command.operator))]
    pub async fn assign(&self, command: &AssignReminder) -> Result<(), DomainError> {
        if let Err(err) = require_id("operator", &command.operator) {
            log_rejection(command, &err);
            return Err(err);
        }
        self.handle(command, |reminder| reminder.assign_to(&command.operator))
            .await
    }

    /// Removes the operator of a reminder.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` for an unknown reminder,
    /// `DomainError::UpdateDenied` unless it is pending, or the store's error.
    #[instrument(skip(self, command), fields(reminder_id = %command.reminder_id))]
    pub async fn unassign(&self, command: &UnassignReminder) -> Result<(), DomainError> {
        self.handle(command, ReminderAggregate::unassign).await
    }

    /// Hands a reminder over to another country.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCountry` for a malformed country code,
    /// `DomainError::AggregateNotFound` for an unknown reminder,
    /// `DomainError::UpdateDenied` unless it is pending, or the store's error.
    #[instrument(skip(self, command), fields(reminder_id = %command.reminder_id, country = %command.country))]
    pub async fn transfer(&self, command: &TransferReminder) -> Result<(), DomainError> {
        let country = match Country::new(&command.country) {
            Ok(country) => country,
            Err(err) => {
                log_rejection(command, &err);
                return Err(err);
            }
        };
        self.handle(command, |reminder| reminder.transfer_to(country))
            .await
    }

    /// Loads the targeted reminder, applies `decide`, and saves the result.
    /// The save happens even when the decision raised nothing.
    async fn handle<C, F>(&self, command: &C, decide: F) -> Result<(), DomainError>
    where
        C: ReminderCommand,
        F: FnOnce(&mut ReminderAggregate) -> Result<(), DomainError> + Send,
    {
        let result = self.try_handle(command, decide).await;
        match &result {
            Ok(0) => debug!(command = command.command_type(), "no change"),
            Ok(raised) => info!(
                command = command.command_type(),
                events = raised,
                "reminder updated"
            ),
            Err(err) => log_rejection(command, err),
        }
        result.map(|_| ())
    }

    async fn try_handle<C, F>(&self, command: &C, decide: F) -> Result<usize, DomainError>
    where
        C: ReminderCommand,
        F: FnOnce(&mut ReminderAggregate) -> Result<(), DomainError> + Send,
    {
        let reminder_id = command.reminder_id();
        require_id("reminder id", reminder_id)?;
        let Some(mut aggregate) = self.store.find(reminder_id).await? else {
            return Err(DomainError::AggregateNotFound(reminder_id.to_owned()));
        };

        decide(&mut aggregate)?;
        let raised = aggregate.pending_events().len();
        self.store.save(&mut aggregate).await?;
        Ok(raised)
    }
}

fn log_rejection(command: &dyn Command, err: &DomainError) {
    let expected = err.is_domain_rule_violation()
        || matches!(
            err,
            DomainError::Validation(_)
                | DomainError::InvalidCountry(_)
                | DomainError::MissingField { .. }
        );
    if expected {
        debug!(command = command.command_type(), error = %err, "command rejected");
    } else {
        warn!(command = command.command_type(), error = %err, "command failed");
    }
}

//! Query handlers for the Reminder Scheduling context.
//!
//! Queries rehydrate reminders through the store and return their current
//! state; they never raise events.

use std::sync::Arc;

use reminders_core::aggregate::Aggregate;
use reminders_core::error::DomainError;
use tracing::{debug, instrument};

use crate::application::event_store::ReminderEventStore;
use crate::application::require_id;
use crate::domain::state::ReminderState;

/// Answers read-only questions about reminders.
#[derive(Clone)]
pub struct ReminderQueryHandler {
    store: Arc<dyn ReminderEventStore>,
}

impl std::fmt::Debug for ReminderQueryHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReminderQueryHandler").finish_non_exhaustive()
    }
}

impl ReminderQueryHandler {
    /// Creates a query handler reading from `store`.
    #[must_use]
    pub fn new(store: Arc<dyn ReminderEventStore>) -> Self {
        Self { store }
    }

    /// Returns the reminder `reminder_id` if it was scheduled on
    /// `intervention_id`, and `None` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if an id is blank, or the store's
    /// error if the reminder cannot be loaded.
    #[instrument(skip(self))]
    pub async fn get_reminder(
        &self,
        intervention_id: &str,
        reminder_id: &str,
    ) -> Result<Option<ReminderState>, DomainError> {
        require_id("intervention id", intervention_id)?;
        require_id("reminder id", reminder_id)?;

        let state = self
            .store
            .find(reminder_id)
            .await?
            .map(|aggregate| aggregate.state().clone())
            .filter(|state| state.intervention_id.as_deref() == Some(intervention_id));
        if state.is_none() {
            debug!("no such reminder on this intervention");
        }
        Ok(state)
    }

    /// Returns every reminder scheduled on `intervention_id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the id is blank, or the store's
    /// error if a reminder cannot be loaded.
    #[instrument(skip(self))]
    pub async fn get_reminders(
        &self,
        intervention_id: &str,
    ) -> Result<Vec<ReminderState>, DomainError> {
        require_id("intervention id", intervention_id)?;

        let states: Vec<ReminderState> = self
            .store
            .find_by_parent(intervention_id)
            .await?
            .iter()
            .map(|aggregate| aggregate.state().clone())
            .collect();
        debug!(count = states.len(), "reminders loaded");
        Ok(states)
    }
}

//! Application layer for the Reminder Scheduling context.

use reminders_core::error::DomainError;

pub mod command_handlers;
pub mod event_store;
pub mod query_handlers;

/// Rejects a blank caller-supplied identifier with `DomainError::Validation`.
fn require_id(name: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{name} must not be blank")));
    }
    Ok(())
}

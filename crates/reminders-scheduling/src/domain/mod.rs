//! Domain model for the Reminder Scheduling context.

pub mod aggregates;
pub mod commands;
pub mod country;
pub mod event_stream;
pub mod events;
pub mod state;

//! Reminders: Reminder Scheduling bounded context.
//!
//! Responsible for scheduling follow-up reminders on interventions, and for
//! their assignment, transfer between countries, and completion lifecycle.

pub mod application;
pub mod config;
pub mod domain;

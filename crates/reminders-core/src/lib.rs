//! Reminders Core: generic event-sourcing primitives.
//!
//! This crate defines the stream revision counter and the event, state,
//! event-stream and aggregate abstractions that the bounded contexts build
//! on, together with the narrow ports (clock, id generator, event
//! repository) they consume. It contains no infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod event_stream;
pub mod id;
pub mod repository;
pub mod revision;
pub mod state;

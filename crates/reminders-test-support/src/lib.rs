//! Shared test mocks and utilities for the reminders service.

mod clock;
mod id;
mod logging;
mod repository;

pub use clock::FixedClock;
pub use id::SequenceIdGenerator;
pub use logging::init_test_tracing;
pub use repository::{EmptyEventRepository, FailingEventRepository, RecordingEventRepository};

//! Reminders Event Store: `EventRepository` implementations.

pub mod in_memory;

pub use in_memory::InMemoryEventRepository;

//! Aggregate identifier generation.

use std::fmt;

use uuid::Uuid;

/// Source of identifiers for newly created aggregates.
pub trait IdGenerator: Send + Sync + fmt::Debug {
    /// Returns a fresh identifier.
    fn generate(&self) -> String;
}

/// Production generator producing time-ordered (v7) UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate(&self) -> String {
        Uuid::now_v7().to_string()
    }
}

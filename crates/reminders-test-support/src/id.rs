//! Test id generator: predictable `IdGenerator` implementation for tests.

use std::sync::Mutex;

use reminders_core::id::IdGenerator;

/// An id generator that hands out `<prefix>1`, `<prefix>2`, ... in order.
#[derive(Debug)]
pub struct SequenceIdGenerator {
    prefix: String,
    counter: Mutex<u64>,
}

impl SequenceIdGenerator {
    /// Create a generator whose ids start with `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Mutex::new(0),
        }
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn generate(&self) -> String {
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;
        format!("{}{}", self.prefix, *counter)
    }
}

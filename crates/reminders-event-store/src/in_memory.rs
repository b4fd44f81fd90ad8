//! In-memory implementation of the `EventRepository` trait.
//!
//! All operations go through a single mutex, so find/append sequences for one
//! stream are serialized within the process. Appends are additionally
//! guarded by an optimistic version check.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::{debug, warn};

use reminders_core::error::DomainError;
use reminders_core::repository::{EventRepository, StoredEvent};
use reminders_core::revision::StreamRevision;

#[derive(Debug, Default)]
struct Streams {
    events: HashMap<String, Vec<StoredEvent>>,
    by_parent: HashMap<String, Vec<String>>,
}

impl Streams {
    fn current_version(&self, stream_id: &str) -> StreamRevision {
        self.events
            .get(stream_id)
            .and_then(|events| events.last())
            .map_or(StreamRevision::INITIAL, |event| event.version)
    }

    fn index_parent(&mut self, parent_id: &str, stream_id: &str) {
        let streams = self.by_parent.entry(parent_id.to_owned()).or_default();
        if !streams.iter().any(|id| id == stream_id) {
            streams.push(stream_id.to_owned());
        }
    }
}

/// Process-local event repository backed by a `HashMap` of streams.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    streams: Mutex<Streams>,
}

impl InMemoryEventRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Streams>, DomainError> {
        self.streams
            .lock()
            .map_err(|_| DomainError::Infrastructure("event store lock poisoned".into()))
    }
}

/// Checks that `events` all belong to `stream_id` and continue it without
/// gaps from `expected_version`.
fn validate_batch(
    stream_id: &str,
    expected_version: StreamRevision,
    events: &[StoredEvent],
) -> Result<(), DomainError> {
    let mut previous = expected_version;
    for event in events {
        if event.stream_id != stream_id {
            return Err(DomainError::Validation(format!(
                "event {} belongs to stream '{}', not '{stream_id}'",
                event.event_id, event.stream_id
            )));
        }
        if !event.version.is_next(previous) {
            return Err(DomainError::InconsistentRevision {
                stream_id: stream_id.to_owned(),
                actual: event.version,
                expected: previous.next(),
            });
        }
        previous = event.version;
    }
    Ok(())
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn load_events(&self, stream_id: &str) -> Result<Vec<StoredEvent>, DomainError> {
        let streams = self.lock()?;
        Ok(streams.events.get(stream_id).cloned().unwrap_or_default())
    }

    async fn append_events(
        &self,
        stream_id: &str,
        expected_version: StreamRevision,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        let mut streams = self.lock()?;

        let actual = streams.current_version(stream_id);
        if actual != expected_version {
            warn!(%stream_id, %expected_version, %actual, "rejecting append on stale stream");
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id: stream_id.to_owned(),
                expected: expected_version,
                actual,
            });
        }
        if events.is_empty() {
            return Ok(());
        }
        validate_batch(stream_id, expected_version, events)?;

        for parent_id in events.iter().filter_map(|event| event.parent_id.as_deref()) {
            streams.index_parent(parent_id, stream_id);
        }
        streams
            .events
            .entry(stream_id.to_owned())
            .or_default()
            .extend_from_slice(events);

        debug!(%stream_id, count = events.len(), "appended events");
        Ok(())
    }

    async fn stream_ids_by_parent(&self, parent_id: &str) -> Result<Vec<String>, DomainError> {
        let streams = self.lock()?;
        Ok(streams.by_parent.get(parent_id).cloned().unwrap_or_default())
    }
}

//! Test repositories: mock `EventRepository` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use reminders_core::error::DomainError;
use reminders_core::repository::{EventRepository, StoredEvent};
use reminders_core::revision::StreamRevision;

/// An event repository that records all `append_events` calls. Returns the
/// configured events from `load_events` on every call, and the configured
/// stream ids from `stream_ids_by_parent`.
#[derive(Debug)]
pub struct RecordingEventRepository {
    load_result: Vec<StoredEvent>,
    parent_streams: Vec<String>,
    appended: Mutex<Vec<(String, StreamRevision, Vec<StoredEvent>)>>,
}

impl RecordingEventRepository {
    /// Create a new recording repository that will return `load_result` from
    /// every `load_events` call.
    #[must_use]
    pub fn new(load_result: Vec<StoredEvent>) -> Self {
        Self {
            load_result,
            parent_streams: Vec::new(),
            appended: Mutex::new(Vec::new()),
        }
    }

    /// Configures the stream ids returned by `stream_ids_by_parent`.
    #[must_use]
    pub fn with_parent_streams(mut self, stream_ids: Vec<String>) -> Self {
        self.parent_streams = stream_ids;
        self
    }

    /// Returns a snapshot of all events that were appended.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn appended_events(&self) -> Vec<(String, StreamRevision, Vec<StoredEvent>)> {
        self.appended.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventRepository for RecordingEventRepository {
    async fn load_events(&self, _stream_id: &str) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(self.load_result.clone())
    }

    async fn append_events(
        &self,
        stream_id: &str,
        expected_version: StreamRevision,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        self.appended
            .lock()
            .unwrap()
            .push((stream_id.to_owned(), expected_version, events.to_vec()));
        Ok(())
    }

    async fn stream_ids_by_parent(&self, _parent_id: &str) -> Result<Vec<String>, DomainError> {
        Ok(self.parent_streams.clone())
    }
}

/// An event repository that always returns an empty event list and silently
/// accepts appends. Useful for testing "aggregate not found" scenarios and
/// creation commands.
#[derive(Debug)]
pub struct EmptyEventRepository;

#[async_trait]
impl EventRepository for EmptyEventRepository {
    async fn load_events(&self, _stream_id: &str) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(vec![])
    }

    async fn append_events(
        &self,
        _stream_id: &str,
        _expected_version: StreamRevision,
        _events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        Ok(())
    }

    async fn stream_ids_by_parent(&self, _parent_id: &str) -> Result<Vec<String>, DomainError> {
        Ok(vec![])
    }
}

/// An event repository that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingEventRepository;

#[async_trait]
impl EventRepository for FailingEventRepository {
    async fn load_events(&self, _stream_id: &str) -> Result<Vec<StoredEvent>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn append_events(
        &self,
        _stream_id: &str,
        _expected_version: StreamRevision,
        _events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn stream_ids_by_parent(&self, _parent_id: &str) -> Result<Vec<String>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

//! Persistence port for reminder aggregates, and its adapter over an
//! [`EventRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use reminders_core::aggregate::Aggregate;
use reminders_core::clock::Clock;
use reminders_core::error::DomainError;
use reminders_core::event::{DomainEvent, EventMetadata};
use reminders_core::repository::{EventRepository, StoredEvent};
use tracing::debug;
use uuid::Uuid;

use crate::domain::aggregates::ReminderAggregate;
use crate::domain::event_stream::ReminderEventStream;
use crate::domain::events::{REMINDER_EVENT_TYPES, ReminderEvent, ReminderEventKind};

/// Loads and persists reminder aggregates.
///
/// Callers run find, decide and save for one reminder at a time;
/// implementations reject a save whose aggregate went stale in between.
#[async_trait]
pub trait ReminderEventStore: Send + Sync {
    /// Rehydrates the reminder `reminder_id`, or returns `None` if it has no
    /// events.
    async fn find(&self, reminder_id: &str) -> Result<Option<ReminderAggregate>, DomainError>;

    /// Rehydrates every reminder scheduled on `intervention_id`.
    async fn find_by_parent(
        &self,
        intervention_id: &str,
    ) -> Result<Vec<ReminderAggregate>, DomainError>;

    /// Appends the aggregate's pending events and clears them. Saving an
    /// aggregate without pending events succeeds and changes nothing.
    async fn save(&self, aggregate: &mut ReminderAggregate) -> Result<(), DomainError>;
}

/// Maps a reminder event to its stored form. Scheduled events index their
/// stream under the intervention.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the payload cannot be encoded.
pub fn to_stored_event(event: &ReminderEvent) -> Result<StoredEvent, DomainError> {
    let parent_id = match event.kind() {
        ReminderEventKind::Scheduled(payload) => Some(payload.intervention_id.clone()),
        _ => None,
    };
    Ok(StoredEvent {
        event_id: Uuid::now_v7(),
        stream_id: event.stream_id().to_owned(),
        parent_id,
        event_type: event.event_type().to_owned(),
        payload: event.to_payload()?,
        version: event.version(),
        occurred_at: event.timestamp(),
    })
}

/// Decodes a stored event back into a reminder event.
///
/// # Errors
///
/// Returns `DomainError::UnexpectedEvent` if the event type is not a
/// reminder event or disagrees with the payload,
/// `DomainError::Infrastructure` if the payload is malformed, and
/// `DomainError::MissingField` if a required field is blank.
pub fn from_stored_event(stored: &StoredEvent) -> Result<ReminderEvent, DomainError> {
    let Some(event_type) = REMINDER_EVENT_TYPES
        .into_iter()
        .find(|known| *known == stored.event_type)
    else {
        return Err(DomainError::UnexpectedEvent(stored.event_type.clone()));
    };
    let kind: ReminderEventKind = serde_json::from_value(stored.payload.clone())
        .map_err(|e| DomainError::Infrastructure(format!("event deserialization failed: {e}")))?;
    if kind.event_type() != event_type {
        return Err(DomainError::UnexpectedEvent(format!(
            "{event_type} carrying a {} payload",
            kind.event_type()
        )));
    }
    let metadata = EventMetadata::new(
        event_type,
        stored.stream_id.clone(),
        stored.version,
        stored.occurred_at,
    )?;
    ReminderEvent::new(metadata, kind)
}

/// Reconstitutes a `ReminderAggregate` from stored events.
///
/// # Errors
///
/// Returns the decoding error of the first undecodable event, or the replay
/// error if the history is inconsistent.
pub fn reconstitute(
    stored_events: &[StoredEvent],
    clock: Arc<dyn Clock>,
) -> Result<ReminderAggregate, DomainError> {
    let events = stored_events
        .iter()
        .map(from_stored_event)
        .collect::<Result<Vec<_>, _>>()?;
    ReminderAggregate::from_history(&ReminderEventStream::new(events), clock)
}

/// A [`ReminderEventStore`] backed by an [`EventRepository`]. Rehydrated
/// aggregates stamp their events with the store's clock.
#[derive(Clone)]
pub struct RepositoryReminderStore {
    repo: Arc<dyn EventRepository>,
    clock: Arc<dyn Clock>,
}

impl RepositoryReminderStore {
    /// Creates a store over `repo`.
    #[must_use]
    pub fn new(repo: Arc<dyn EventRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

impl std::fmt::Debug for RepositoryReminderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryReminderStore")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ReminderEventStore for RepositoryReminderStore {
    async fn find(&self, reminder_id: &str) -> Result<Option<ReminderAggregate>, DomainError> {
        let stored_events = self.repo.load_events(reminder_id).await?;
        if stored_events.is_empty() {
            return Ok(None);
        }
        reconstitute(&stored_events, Arc::clone(&self.clock)).map(Some)
    }

    async fn find_by_parent(
        &self,
        intervention_id: &str,
    ) -> Result<Vec<ReminderAggregate>, DomainError> {
        let reminder_ids = self.repo.stream_ids_by_parent(intervention_id).await?;
        let mut aggregates = Vec::with_capacity(reminder_ids.len());
        for reminder_id in reminder_ids {
            if let Some(aggregate) = self.find(&reminder_id).await? {
                aggregates.push(aggregate);
            }
        }
        Ok(aggregates)
    }

    async fn save(&self, aggregate: &mut ReminderAggregate) -> Result<(), DomainError> {
        let Some(first) = aggregate.pending_events().first() else {
            return Ok(());
        };
        let stream_id = first.stream_id().to_owned();
        let stored_events = aggregate
            .pending_events()
            .iter()
            .map(to_stored_event)
            .collect::<Result<Vec<_>, _>>()?;

        self.repo
            .append_events(&stream_id, aggregate.persisted_version(), &stored_events)
            .await?;
        debug!(
            stream_id = %stream_id,
            count = stored_events.len(),
            version = %aggregate.version(),
            "saved reminder events"
        );

        aggregate.clear_pending_events();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, TimeZone, Utc};
    use reminders_core::revision::StreamRevision;
    use reminders_test_support::{
        EmptyEventRepository, FailingEventRepository, FixedClock, RecordingEventRepository,
    };

    use crate::domain::country::Country;
    use crate::domain::events::ReminderType;
    use crate::domain::state::ReminderStatus;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::new_year_eve())
    }

    fn due() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2022-03-04T11:30:00+01:00").unwrap()
    }

    fn scheduled_event() -> ReminderEvent {
        ReminderEvent::scheduled(
            "R1",
            StreamRevision::new(1),
            Utc.with_ymd_and_hms(2017, 6, 1, 8, 0, 0).unwrap(),
            "I1",
            ReminderType::CallCustomer,
            Country::new("FR").unwrap(),
            due(),
        )
        .unwrap()
    }

    fn stored_history() -> Vec<StoredEvent> {
        let assigned = ReminderEvent::assigned(
            "R1",
            StreamRevision::new(2),
            Utc.with_ymd_and_hms(2017, 6, 2, 8, 0, 0).unwrap(),
            "alice",
        )
        .unwrap();
        vec![
            to_stored_event(&scheduled_event()).unwrap(),
            to_stored_event(&assigned).unwrap(),
        ]
    }

    #[test]
    fn test_to_stored_event_indexes_scheduled_event_under_intervention() {
        // Act
        let stored = to_stored_event(&scheduled_event()).unwrap();

        // Assert
        assert_eq!(stored.stream_id, "R1");
        assert_eq!(stored.parent_id.as_deref(), Some("I1"));
        assert_eq!(stored.event_type, "reminder.scheduled");
        assert_eq!(stored.version, StreamRevision::new(1));
        assert_eq!(
            stored.occurred_at,
            Utc.with_ymd_and_hms(2017, 6, 1, 8, 0, 0).unwrap()
        );
        assert_eq!(stored.event_id.get_version_num(), 7);
    }

    #[test]
    fn test_to_stored_event_leaves_other_events_unindexed() {
        let cancelled =
            ReminderEvent::cancelled("R1", StreamRevision::new(2), FixedClock::new_year_eve().0)
                .unwrap();

        let stored = to_stored_event(&cancelled).unwrap();

        assert_eq!(stored.parent_id, None);
        assert_eq!(stored.payload, serde_json::json!("Cancelled"));
    }

    #[test]
    fn test_from_stored_event_restores_event() {
        let event = scheduled_event();
        let stored = to_stored_event(&event).unwrap();

        let decoded = from_stored_event(&stored).unwrap();

        assert_eq!(decoded, event);
    }

    #[test]
    fn test_from_stored_event_rejects_unknown_event_type() {
        let mut stored = to_stored_event(&scheduled_event()).unwrap();
        stored.event_type = "reminder.snoozed".to_owned();

        match from_stored_event(&stored).unwrap_err() {
            DomainError::UnexpectedEvent(event_type) => {
                assert_eq!(event_type, "reminder.snoozed");
            }
            other => panic!("expected UnexpectedEvent, got {other:?}"),
        }
    }

    #[test]
    fn test_from_stored_event_rejects_payload_of_another_type() {
        let mut stored = to_stored_event(&scheduled_event()).unwrap();
        stored.event_type = "reminder.cancelled".to_owned();

        assert!(matches!(
            from_stored_event(&stored).unwrap_err(),
            DomainError::UnexpectedEvent(_)
        ));
    }

    #[test]
    fn test_from_stored_event_rejects_malformed_payload() {
        let mut stored = to_stored_event(&scheduled_event()).unwrap();
        stored.payload = serde_json::json!({ "Scheduled": { "country": "FRA" } });

        assert!(matches!(
            from_stored_event(&stored).unwrap_err(),
            DomainError::Infrastructure(_)
        ));
    }

    #[test]
    fn test_from_stored_event_rejects_blank_assignee() {
        let mut stored = stored_history().remove(1);
        stored.payload = serde_json::json!({ "Assigned": { "assignee": "" } });

        assert!(matches!(
            from_stored_event(&stored).unwrap_err(),
            DomainError::MissingField {
                field: "assignee",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_find_replays_stored_history() {
        // Arrange
        let repo = Arc::new(RecordingEventRepository::new(stored_history()));
        let store = RepositoryReminderStore::new(repo, clock());

        // Act
        let aggregate = store.find("R1").await.unwrap().unwrap();

        // Assert
        let state = aggregate.state();
        assert_eq!(state.version, StreamRevision::new(2));
        assert_eq!(state.id.as_deref(), Some("R1"));
        assert_eq!(state.intervention_id.as_deref(), Some("I1"));
        assert_eq!(state.status, Some(ReminderStatus::Pending));
        assert_eq!(state.assignee.as_deref(), Some("alice"));
        assert_eq!(state.scheduled_time, Some(due()));
        assert!(aggregate.pending_events().is_empty());
    }

    #[tokio::test]
    async fn test_find_returns_none_for_empty_stream() {
        let store = RepositoryReminderStore::new(Arc::new(EmptyEventRepository), clock());

        let result = store.find("R404").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_find_propagates_repository_failure() {
        let store = RepositoryReminderStore::new(Arc::new(FailingEventRepository), clock());

        match store.find("R1").await.unwrap_err() {
            DomainError::Infrastructure(msg) => assert_eq!(msg, "connection refused"),
            other => panic!("expected Infrastructure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_find_by_parent_rehydrates_each_indexed_stream() {
        let repo = RecordingEventRepository::new(stored_history())
            .with_parent_streams(vec!["R1".to_owned(), "R1".to_owned()]);
        let store = RepositoryReminderStore::new(Arc::new(repo), clock());

        let aggregates = store.find_by_parent("I1").await.unwrap();

        assert_eq!(aggregates.len(), 2);
        assert!(
            aggregates
                .iter()
                .all(|a| a.version() == StreamRevision::new(2))
        );
    }

    #[tokio::test]
    async fn test_save_appends_pending_events_at_persisted_version() {
        // Arrange
        let repo = Arc::new(RecordingEventRepository::new(stored_history()));
        let store = RepositoryReminderStore::new(repo.clone(), clock());
        let mut aggregate = store.find("R1").await.unwrap().unwrap();
        aggregate.transfer_to(Country::new("IT").unwrap()).unwrap();

        // Act
        store.save(&mut aggregate).await.unwrap();

        // Assert
        let appended = repo.appended_events();
        assert_eq!(appended.len(), 1);
        let (stream_id, expected_version, events) = &appended[0];
        assert_eq!(stream_id, "R1");
        assert_eq!(*expected_version, StreamRevision::new(2));
        let types: Vec<&str> = events.iter().map(|e| e.event_type.as_str()).collect();
        assert_eq!(types, vec!["reminder.unassigned", "reminder.transferred"]);
        assert_eq!(events[0].version, StreamRevision::new(3));
        assert_eq!(events[1].version, StreamRevision::new(4));
        assert!(events.iter().all(|e| e.occurred_at == FixedClock::new_year_eve().0));
        assert!(aggregate.pending_events().is_empty());
        assert_eq!(aggregate.persisted_version(), StreamRevision::new(4));
    }

    #[tokio::test]
    async fn test_save_without_pending_events_skips_repository() {
        let store = RepositoryReminderStore::new(Arc::new(FailingEventRepository), clock());
        let mut aggregate =
            ReminderAggregate::from_history(&ReminderEventStream::new(vec![scheduled_event()]), clock())
                .unwrap();

        store.save(&mut aggregate).await.unwrap();

        assert_eq!(aggregate.version(), StreamRevision::new(1));
    }

    #[tokio::test]
    async fn test_save_keeps_pending_events_when_append_fails() {
        let store = RepositoryReminderStore::new(Arc::new(FailingEventRepository), clock());
        let mut aggregate =
            ReminderAggregate::from_history(&ReminderEventStream::new(vec![scheduled_event()]), clock())
                .unwrap();
        aggregate.cancel().unwrap();

        let result = store.save(&mut aggregate).await;

        assert!(matches!(result.unwrap_err(), DomainError::Infrastructure(_)));
        assert_eq!(aggregate.pending_events().len(), 1);
    }
}

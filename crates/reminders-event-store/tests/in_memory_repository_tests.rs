//! Integration tests for `InMemoryEventRepository`.

use chrono::Utc;
use reminders_core::error::DomainError;
use reminders_core::repository::{EventRepository, StoredEvent};
use reminders_core::revision::StreamRevision;
use reminders_event_store::InMemoryEventRepository;
use uuid::Uuid;

/// Helper to build a `StoredEvent` with sensible defaults.
fn make_stored_event(stream_id: &str, version: u64) -> StoredEvent {
    StoredEvent {
        event_id: Uuid::new_v4(),
        stream_id: stream_id.to_owned(),
        parent_id: None,
        event_type: "TestEvent".to_owned(),
        payload: serde_json::json!({"key": "value"}),
        version: StreamRevision::new(version),
        occurred_at: Utc::now(),
    }
}

fn with_parent(mut event: StoredEvent, parent_id: &str) -> StoredEvent {
    event.parent_id = Some(parent_id.to_owned());
    event
}

// --- load_events ---

#[tokio::test]
async fn test_load_events_returns_empty_vec_for_nonexistent_stream() {
    let repo = InMemoryEventRepository::new();

    let events = repo.load_events("missing").await.unwrap();

    assert!(events.is_empty());
}

// --- append_events + load_events round-trip ---

#[tokio::test]
async fn test_append_and_load_single_event() {
    let repo = InMemoryEventRepository::new();
    let event = make_stored_event("R1", 1);

    repo.append_events("R1", StreamRevision::INITIAL, std::slice::from_ref(&event))
        .await
        .unwrap();

    let loaded = repo.load_events("R1").await.unwrap();
    assert_eq!(loaded, vec![event]);
}

// --- ordering ---

#[tokio::test]
async fn test_append_in_batches_preserves_version_order() {
    let repo = InMemoryEventRepository::new();
    repo.append_events(
        "R1",
        StreamRevision::INITIAL,
        &[make_stored_event("R1", 1), make_stored_event("R1", 2)],
    )
    .await
    .unwrap();

    repo.append_events("R1", StreamRevision::new(2), &[make_stored_event("R1", 3)])
        .await
        .unwrap();

    let versions: Vec<u64> = repo
        .load_events("R1")
        .await
        .unwrap()
        .iter()
        .map(|event| event.version.value())
        .collect();
    assert_eq!(versions, vec![1, 2, 3]);
}

// --- optimistic concurrency ---

#[tokio::test]
async fn test_append_with_stale_expected_version_is_rejected() {
    let repo = InMemoryEventRepository::new();
    repo.append_events("R1", StreamRevision::INITIAL, &[make_stored_event("R1", 1)])
        .await
        .unwrap();

    let result = repo
        .append_events("R1", StreamRevision::INITIAL, &[make_stored_event("R1", 1)])
        .await;

    match result.unwrap_err() {
        DomainError::ConcurrencyConflict {
            aggregate_id,
            expected,
            actual,
        } => {
            assert_eq!(aggregate_id, "R1");
            assert_eq!(expected, StreamRevision::INITIAL);
            assert_eq!(actual, StreamRevision::new(1));
        }
        other => panic!("expected ConcurrencyConflict, got {other:?}"),
    }
    assert_eq!(repo.load_events("R1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_append_with_version_gap_is_rejected() {
    let repo = InMemoryEventRepository::new();

    let result = repo
        .append_events(
            "R1",
            StreamRevision::INITIAL,
            &[make_stored_event("R1", 1), make_stored_event("R1", 3)],
        )
        .await;

    assert!(matches!(
        result.unwrap_err(),
        DomainError::InconsistentRevision { .. }
    ));
    assert!(repo.load_events("R1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_append_of_foreign_stream_event_is_rejected() {
    let repo = InMemoryEventRepository::new();

    let result = repo
        .append_events("R1", StreamRevision::INITIAL, &[make_stored_event("R2", 1)])
        .await;

    assert!(matches!(result.unwrap_err(), DomainError::Validation(_)));
}

#[tokio::test]
async fn test_append_of_empty_batch_is_accepted() {
    let repo = InMemoryEventRepository::new();

    repo.append_events("R1", StreamRevision::INITIAL, &[])
        .await
        .unwrap();

    assert!(repo.load_events("R1").await.unwrap().is_empty());
}

// --- stream isolation ---

#[tokio::test]
async fn test_streams_are_isolated() {
    let repo = InMemoryEventRepository::new();
    repo.append_events("R1", StreamRevision::INITIAL, &[make_stored_event("R1", 1)])
        .await
        .unwrap();
    repo.append_events("R2", StreamRevision::INITIAL, &[make_stored_event("R2", 1)])
        .await
        .unwrap();

    let r1 = repo.load_events("R1").await.unwrap();
    let r2 = repo.load_events("R2").await.unwrap();

    assert_eq!(r1.len(), 1);
    assert_eq!(r2.len(), 1);
    assert_eq!(r1[0].stream_id, "R1");
    assert_eq!(r2[0].stream_id, "R2");
}

// --- parent index ---

#[tokio::test]
async fn test_stream_ids_by_parent_lists_attached_streams_in_order() {
    let repo = InMemoryEventRepository::new();
    repo.append_events(
        "R2",
        StreamRevision::INITIAL,
        &[with_parent(make_stored_event("R2", 1), "I1")],
    )
    .await
    .unwrap();
    repo.append_events(
        "R1",
        StreamRevision::INITIAL,
        &[with_parent(make_stored_event("R1", 1), "I1")],
    )
    .await
    .unwrap();
    repo.append_events(
        "R3",
        StreamRevision::INITIAL,
        &[with_parent(make_stored_event("R3", 1), "I2")],
    )
    .await
    .unwrap();
    repo.append_events("R1", StreamRevision::new(1), &[make_stored_event("R1", 2)])
        .await
        .unwrap();

    let streams = repo.stream_ids_by_parent("I1").await.unwrap();

    assert_eq!(streams, vec!["R2".to_owned(), "R1".to_owned()]);
    assert!(repo.stream_ids_by_parent("I9").await.unwrap().is_empty());
}

//! Integration tests for the PostgreSQL repository
//!
//! These tests use real PostgreSQL via testcontainers to ensure:
//! - Queries, filters and ordering match the in-memory repository
//! - Constraints (unique email, cascade) are enforced
//! - The row lock serializes concurrent registrations
//!
//! They need Docker and are ignored by default: `cargo test -- --ignored`

use chrono::{Duration, Utc};
use domain_events::*;
use futures::future::join_all;
use std::sync::Arc;
use test_utils::{assertions::*, TestDataBuilder, TestDatabase};

fn event_input(builder: &TestDataBuilder, max_attendees: u32) -> CreateEvent {
    let start = Utc::now() + Duration::days(2);
    CreateEvent {
        name: builder.name("event", "pg"),
        description: None,
        start_time: start,
        end_time: start + Duration::hours(4),
        location: "Auditorium".to_string(),
        max_attendees,
    }
}

fn attendee_input(event_id: uuid::Uuid, email: &str) -> CreateAttendee {
    CreateAttendee {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        email: email.to_string(),
        phone_number: "555-0199".to_string(),
        event_id,
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_and_get_event() {
    let db = TestDatabase::new().await;
    let repo = PgEventRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("pg_create_get");

    let created = repo.create_event(event_input(&builder, 30)).await.unwrap();
    assert_eq!(created.status, EventStatus::Scheduled);

    let fetched = assert_some(
        repo.get_event(created.id).await.unwrap(),
        "event should exist",
    );
    assert_uuid_eq(fetched.id, created.id, "fetched event id");
    assert_eq!(fetched.name, created.name);
    assert_eq!(fetched.max_attendees, 30);
    assert_eq!(
        fetched.start_time.timestamp_micros(),
        created.start_time.timestamp_micros()
    );
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_list_events_filters_and_orders() {
    let db = TestDatabase::new().await;
    let repo = PgEventRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("pg_list");

    let mut ids = Vec::new();
    for _ in 0..4 {
        ids.push(repo.create_event(event_input(&builder, 5)).await.unwrap().id);
    }
    let canceled = repo.get_event(ids[3]).await.unwrap().unwrap();
    repo.update_event(
        canceled.id,
        UpdateEvent {
            name: canceled.name.clone(),
            description: None,
            start_time: canceled.start_time,
            end_time: canceled.end_time,
            location: canceled.location.clone(),
            max_attendees: canceled.max_attendees,
            status: EventStatus::Canceled,
        },
    )
    .await
    .unwrap();

    let scheduled: Vec<_> = repo
        .list_events(EventFilter {
            status: Some(EventStatus::Scheduled),
            skip: 1,
            ..Default::default()
        })
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(scheduled, ids[1..3].to_vec());

    let during = repo
        .list_events(EventFilter {
            instant: Some(canceled.start_time + Duration::hours(1)),
            location: Some("Auditorium".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(during.len(), 4);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_concurrent_registrations_respect_capacity() {
    let db = TestDatabase::new().await;
    let repo = Arc::new(PgEventRepository::new(db.connection()));
    let service = Arc::new(EventService::from_shared(repo.clone()));
    let builder = TestDataBuilder::from_test_name("pg_concurrent");

    let event = service.create_event(event_input(&builder, 3)).await.unwrap();

    let tasks = builder.emails("rush", 12).into_iter().map(|email| {
        let service = service.clone();
        let event_id = event.id;
        tokio::spawn(async move {
            service
                .register_attendee(attendee_input(event_id, &email))
                .await
        })
    });
    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 3);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| e.kind() == ErrorKind::CapacityExceeded));
    assert_eq!(repo.list_attendees(event.id).await.unwrap().len(), 3);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_unique_email_and_cascade_delete() {
    let db = TestDatabase::new().await;
    let repo = PgEventRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("pg_unique_cascade");

    let first = repo.create_event(event_input(&builder, 5)).await.unwrap();
    let second = repo.create_event(event_input(&builder, 5)).await.unwrap();

    let email = builder.email("shared");
    let registered = repo
        .register_attendee(attendee_input(first.id, &email))
        .await
        .unwrap();
    let duplicate = repo
        .register_attendee(attendee_input(second.id, &email))
        .await;
    assert!(matches!(duplicate, Err(EventError::DuplicateEmail(_))));

    assert!(repo.check_in(registered.id).await.unwrap().unwrap().checked_in);
    let found = repo
        .find_attendee_by_email(first.id, &email.to_uppercase())
        .await
        .unwrap();
    assert!(found.is_some_and(|a| a.checked_in));

    assert_eq!(repo.delete_event(first.id).await.unwrap(), Some(1));
    assert!(repo.get_attendee(registered.id).await.unwrap().is_none());
    assert!(repo.check_in(registered.id).await.unwrap().is_none());
    assert_eq!(repo.delete_event(first.id).await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_check_in_racing_event_delete_never_errors() {
    let db = TestDatabase::new().await;
    let repo = Arc::new(PgEventRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("pg_check_in_race");

    let event = repo.create_event(event_input(&builder, 20)).await.unwrap();
    let mut ids = Vec::new();
    for email in builder.emails("guest", 20) {
        let attendee = repo
            .register_attendee(attendee_input(event.id, &email))
            .await
            .unwrap();
        ids.push(attendee.id);
    }

    let check_ins = ids.iter().map(|id| {
        let repo = repo.clone();
        let id = *id;
        tokio::spawn(async move { repo.check_in(id).await })
    });
    let delete = {
        let repo = repo.clone();
        tokio::spawn(async move { repo.delete_event(event.id).await })
    };

    let results = join_all(check_ins).await;
    assert_eq!(delete.await.unwrap().unwrap(), Some(20));
    for result in results {
        // Either checked in before the delete or gone afterwards
        assert!(result.unwrap().is_ok());
    }
    assert!(repo.list_attendees(event.id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_reconciler_against_postgres() {
    let db = TestDatabase::new().await;
    let repo = Arc::new(PgEventRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("pg_reconciler");
    let now = Utc::now();

    let mut past = event_input(&builder, 5);
    past.start_time = now - Duration::hours(2);
    past.end_time = now - Duration::hours(1);
    let past = repo.create_event(past).await.unwrap();
    let future = repo.create_event(event_input(&builder, 5)).await.unwrap();

    let mut canceled = event_input(&builder, 5);
    canceled.start_time = now - Duration::hours(3);
    canceled.end_time = now - Duration::hours(2);
    let canceled = repo.create_event(canceled).await.unwrap();
    repo.update_event(
        canceled.id,
        UpdateEvent {
            name: canceled.name.clone(),
            description: None,
            start_time: canceled.start_time,
            end_time: canceled.end_time,
            location: canceled.location.clone(),
            max_attendees: canceled.max_attendees,
            status: EventStatus::Canceled,
        },
    )
    .await
    .unwrap();

    let reconciler = StatusReconciler::new(repo.clone());
    let report = assert_some(reconciler.reconcile_at(now).await.unwrap(), "pass should run");
    assert_eq!(report.completed, 2);

    assert_eq!(
        repo.get_event(past.id).await.unwrap().unwrap().status,
        EventStatus::Completed
    );
    assert_eq!(
        repo.get_event(canceled.id).await.unwrap().unwrap().status,
        EventStatus::Completed
    );
    assert_eq!(
        repo.get_event(future.id).await.unwrap().unwrap().status,
        EventStatus::Scheduled
    );
    assert!(!repo.complete_event(past.id).await.unwrap());
}

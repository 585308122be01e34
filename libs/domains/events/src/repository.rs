use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::capacity;
use crate::error::{EventError, EventResult};
use crate::models::{
    normalize_email, Attendee, CreateAttendee, CreateEvent, Event, EventFilter, EventStatus,
    UpdateEvent,
};

/// Repository trait for Event and Attendee persistence
///
/// Every method is one atomic unit with respect to the others: implementations
/// must never let a reader observe half of a write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert a new event in `Scheduled` status
    async fn create_event(&self, input: CreateEvent) -> EventResult<Event>;

    async fn get_event(&self, id: Uuid) -> EventResult<Option<Event>>;

    /// List events matching the filter, ordered by id, paginated by skip/limit
    async fn list_events(&self, filter: EventFilter) -> EventResult<Vec<Event>>;

    /// Replace every mutable field; `None` if the event does not exist
    async fn update_event(&self, id: Uuid, input: UpdateEvent) -> EventResult<Option<Event>>;

    /// Remove the event and all of its attendees.
    ///
    /// Returns the number of attendees removed, or `None` if the event does not exist.
    async fn delete_event(&self, id: Uuid) -> EventResult<Option<u64>>;

    /// Events whose `end_time` is before `now` and whose status is not Completed
    async fn overdue_events(&self, now: DateTime<Utc>) -> EventResult<Vec<Event>>;

    /// Move an event to `Completed` unless it already is.
    ///
    /// Returns whether the status changed.
    async fn complete_event(&self, id: Uuid) -> EventResult<bool>;

    /// Insert an attendee after checking, in one atomic unit, that the event
    /// exists, that it has room and that the email is unused.
    async fn register_attendee(&self, input: CreateAttendee) -> EventResult<Attendee>;

    async fn get_attendee(&self, id: Uuid) -> EventResult<Option<Attendee>>;

    /// Set `checked_in`; `None` if the attendee does not exist
    async fn check_in(&self, id: Uuid) -> EventResult<Option<Attendee>>;

    /// Look up an attendee of `event_id` by (already normalized) email
    async fn find_attendee_by_email(
        &self,
        event_id: Uuid,
        email: &str,
    ) -> EventResult<Option<Attendee>>;

    /// Attendees of an event, ordered by id
    async fn list_attendees(&self, event_id: Uuid) -> EventResult<Vec<Attendee>>;
}

#[derive(Debug, Default)]
struct Store {
    // UUID v7 keys keep both maps in creation order
    events: BTreeMap<Uuid, Event>,
    attendees: BTreeMap<Uuid, Attendee>,
}

impl Store {
    fn attendee_count(&self, event_id: Uuid) -> u64 {
        self.attendees
            .values()
            .filter(|a| a.event_id == event_id)
            .count() as u64
    }
}

/// In-memory implementation of EventRepository (for development/testing)
///
/// Both tables sit behind one lock, so every write is serialized against
/// every other operation.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create_event(&self, input: CreateEvent) -> EventResult<Event> {
        let mut store = self.store.write().await;

        let event = Event::new(input);
        store.events.insert(event.id, event.clone());

        tracing::info!(event_id = %event.id, "Created event");
        Ok(event)
    }

    async fn get_event(&self, id: Uuid) -> EventResult<Option<Event>> {
        let store = self.store.read().await;
        Ok(store.events.get(&id).cloned())
    }

    async fn list_events(&self, filter: EventFilter) -> EventResult<Vec<Event>> {
        let store = self.store.read().await;

        let result = store
            .events
            .values()
            .filter(|e| filter.matches(e))
            .skip(filter.skip)
            .take(filter.limit)
            .cloned()
            .collect();

        Ok(result)
    }

    async fn update_event(&self, id: Uuid, input: UpdateEvent) -> EventResult<Option<Event>> {
        let mut store = self.store.write().await;

        let Some(event) = store.events.get_mut(&id) else {
            return Ok(None);
        };
        event.apply_update(input)?;

        tracing::info!(event_id = %id, status = %event.status, "Updated event");
        Ok(Some(event.clone()))
    }

    async fn delete_event(&self, id: Uuid) -> EventResult<Option<u64>> {
        let mut store = self.store.write().await;

        if store.events.remove(&id).is_none() {
            return Ok(None);
        }

        let before = store.attendees.len();
        store.attendees.retain(|_, a| a.event_id != id);
        let removed = (before - store.attendees.len()) as u64;

        tracing::info!(event_id = %id, attendees_removed = removed, "Deleted event");
        Ok(Some(removed))
    }

    async fn overdue_events(&self, now: DateTime<Utc>) -> EventResult<Vec<Event>> {
        let store = self.store.read().await;
        Ok(store
            .events
            .values()
            .filter(|e| e.is_overdue(now))
            .cloned()
            .collect())
    }

    async fn complete_event(&self, id: Uuid) -> EventResult<bool> {
        let mut store = self.store.write().await;

        match store.events.get_mut(&id) {
            Some(event) if event.status != EventStatus::Completed => {
                event.status = EventStatus::Completed;
                event.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn register_attendee(&self, input: CreateAttendee) -> EventResult<Attendee> {
        let mut guard = self.store.write().await;
        let store = &mut *guard;

        let event = store
            .events
            .get(&input.event_id)
            .ok_or(EventError::EventNotFound(input.event_id))?;

        capacity::ensure_capacity(event, store.attendee_count(event.id))?;

        let email = normalize_email(&input.email);
        if store.attendees.values().any(|a| a.email == email) {
            return Err(EventError::DuplicateEmail(email));
        }

        let attendee = Attendee::new(input);
        store.attendees.insert(attendee.id, attendee.clone());

        tracing::info!(
            attendee_id = %attendee.id,
            event_id = %attendee.event_id,
            "Registered attendee"
        );
        Ok(attendee)
    }

    async fn get_attendee(&self, id: Uuid) -> EventResult<Option<Attendee>> {
        let store = self.store.read().await;
        Ok(store.attendees.get(&id).cloned())
    }

    async fn check_in(&self, id: Uuid) -> EventResult<Option<Attendee>> {
        let mut store = self.store.write().await;

        Ok(store.attendees.get_mut(&id).map(|attendee| {
            attendee.checked_in = true;
            attendee.clone()
        }))
    }

    async fn find_attendee_by_email(
        &self,
        event_id: Uuid,
        email: &str,
    ) -> EventResult<Option<Attendee>> {
        let store = self.store.read().await;
        Ok(store
            .attendees
            .values()
            .find(|a| a.event_id == event_id && a.email == email)
            .cloned())
    }

    async fn list_attendees(&self, event_id: Uuid) -> EventResult<Vec<Attendee>> {
        let store = self.store.read().await;
        Ok(store
            .attendees
            .values()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect())
    }
}

use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::bulk::BulkCheckInProcessor;
use crate::error::{EventError, EventResult};
use crate::models::{
    normalize_email, Attendee, BulkCheckInSummary, CheckInRow, CreateAttendee, CreateEvent, Event,
    EventFilter, UpdateEvent,
};
use crate::repository::EventRepository;

/// Service layer for event and attendee business logic
#[derive(Clone)]
pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R) -> Self {
        Self::from_shared(Arc::new(repository))
    }

    /// Build a service over a repository that is also used elsewhere (e.g. by the reconciler)
    pub fn from_shared(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> Arc<R> {
        self.repository.clone()
    }

    /// Create a new event in Scheduled status
    pub async fn create_event(&self, input: CreateEvent) -> EventResult<Event> {
        input
            .validate()
            .map_err(|e| EventError::Validation(e.to_string()))?;

        self.repository.create_event(input).await
    }

    /// List events with filters
    pub async fn list_events(&self, filter: EventFilter) -> EventResult<Vec<Event>> {
        self.repository.list_events(filter).await
    }

    /// Get an event by ID
    pub async fn get_event(&self, id: Uuid) -> EventResult<Event> {
        self.repository
            .get_event(id)
            .await?
            .ok_or(EventError::EventNotFound(id))
    }

    /// Replace every field of an event, status included
    pub async fn update_event(&self, id: Uuid, input: UpdateEvent) -> EventResult<Event> {
        input
            .validate()
            .map_err(|e| EventError::Validation(e.to_string()))?;

        self.repository
            .update_event(id, input)
            .await?
            .ok_or(EventError::EventNotFound(id))
    }

    /// Delete an event together with its attendees
    pub async fn delete_event(&self, id: Uuid) -> EventResult<()> {
        match self.repository.delete_event(id).await? {
            Some(_) => Ok(()),
            None => Err(EventError::EventNotFound(id)),
        }
    }

    /// Register an attendee, subject to the event's capacity
    pub async fn register_attendee(&self, mut input: CreateAttendee) -> EventResult<Attendee> {
        input.email = normalize_email(&input.email);
        input
            .validate()
            .map_err(|e| EventError::Validation(e.to_string()))?;

        self.repository.register_attendee(input).await
    }

    /// Get an attendee by ID
    pub async fn get_attendee(&self, id: Uuid) -> EventResult<Attendee> {
        self.repository
            .get_attendee(id)
            .await?
            .ok_or(EventError::AttendeeNotFound(id))
    }

    /// Mark an attendee as checked in. Checking in twice is not an error.
    pub async fn check_in(&self, attendee_id: Uuid) -> EventResult<Attendee> {
        self.repository
            .check_in(attendee_id)
            .await?
            .ok_or(EventError::AttendeeNotFound(attendee_id))
    }

    /// Attendees of an event; an unknown event simply has none
    pub async fn list_attendees(&self, event_id: Uuid) -> EventResult<Vec<Attendee>> {
        self.repository.list_attendees(event_id).await
    }

    /// Check in every attendee of `event_id` named by `rows`
    pub async fn bulk_check_in<I>(&self, event_id: Uuid, rows: I) -> EventResult<BulkCheckInSummary>
    where
        I: IntoIterator<Item = CheckInRow>,
    {
        BulkCheckInProcessor::new(self.repository.clone())
            .process(event_id, rows)
            .await
    }
}

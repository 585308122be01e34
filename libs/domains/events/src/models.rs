use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::{EventError, EventResult};

/// Rejects time windows that end before they start
fn check_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), ValidationError> {
    if end < start {
        let mut err = ValidationError::new("end_before_start");
        err.message = Some("end_time must not be earlier than start_time".into());
        return Err(err);
    }
    Ok(())
}

fn validate_create_window(input: &CreateEvent) -> Result<(), ValidationError> {
    check_window(input.start_time, input.end_time)
}

fn validate_update_window(input: &UpdateEvent) -> Result<(), ValidationError> {
    check_window(input.start_time, input.end_time)
}

/// Canonical form used for storage and every lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Lifecycle status of an event
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "event_status")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventStatus {
    /// Not started yet
    #[default]
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
    /// In progress (only ever set manually)
    #[sea_orm(string_value = "ongoing")]
    Ongoing,
    /// Finished; set by the reconciler once `end_time` has passed
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Called off by an operator
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

impl EventStatus {
    /// Forward-only transition table; Completed and Canceled are closed to manual changes.
    /// Restating the current status is a no-op and always allowed.
    pub fn can_transition_to(self, next: EventStatus) -> bool {
        use EventStatus::*;

        if self == next {
            return true;
        }
        match self {
            Scheduled => matches!(next, Ongoing | Completed | Canceled),
            Ongoing => matches!(next, Completed | Canceled),
            Completed | Canceled => false,
        }
    }
}

/// A scheduled activity with a capacity and a time window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    /// Unique identifier (UUID v7, so ordering by id follows creation order)
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: String,
    /// Upper bound on registered attendees; zero closes registration entirely
    pub max_attendees: u32,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A person registered to an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Attendee {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Stored normalized (trimmed, lower-case); unique across all events
    pub email: String,
    pub phone_number: String,
    pub event_id: Uuid,
    /// Monotonic: once true it stays true
    pub checked_in: bool,
    pub created_at: DateTime<Utc>,
}

/// DTO for creating a new event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_create_window", skip_on_field_errors = false))]
pub struct CreateEvent {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: String,
    pub max_attendees: u32,
}

/// Full replacement of every mutable event field, status included
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_update_window", skip_on_field_errors = false))]
pub struct UpdateEvent {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: String,
    pub max_attendees: u32,
    pub status: EventStatus,
}

/// DTO for registering an attendee to an event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAttendee {
    #[validate(length(min = 1, message = "first_name must not be empty"))]
    pub first_name: String,
    pub last_name: String,
    #[validate(email(message = "email is not a valid address"))]
    pub email: String,
    pub phone_number: String,
    pub event_id: Uuid,
}

/// Query filters for listing events
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct EventFilter {
    pub status: Option<EventStatus>,
    pub location: Option<String>,
    /// Only events running at this instant (`start_time <= date <= end_time`)
    #[serde(rename = "date")]
    pub instant: Option<DateTime<Utc>>,
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            status: None,
            location: None,
            instant: None,
            skip: 0,
            limit: default_limit(),
        }
    }
}

impl EventFilter {
    /// Whether `event` satisfies every provided filter (pagination not included)
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(status) = self.status {
            if event.status != status {
                return false;
            }
        }
        if let Some(ref location) = self.location {
            if &event.location != location {
                return false;
            }
        }
        if let Some(instant) = self.instant {
            if event.start_time > instant || event.end_time < instant {
                return false;
            }
        }
        true
    }
}

/// One row of an uploaded check-in list
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, ToSchema)]
pub struct CheckInRow {
    #[serde(default)]
    pub email: Option<String>,
}

impl CheckInRow {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
        }
    }
}

/// Per-row outcome counts of a bulk check-in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BulkCheckInSummary {
    /// Rows received
    pub rows: usize,
    /// Attendees flipped to checked in by this batch
    pub checked_in: usize,
    /// Matching attendees that were already checked in
    pub already_checked_in: usize,
    /// Rows whose email matched no attendee of the event
    pub unmatched: usize,
    /// Rows without a usable email
    pub malformed: usize,
}

impl Event {
    /// Create a new event from CreateEvent DTO
    pub fn new(input: CreateEvent) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            start_time: input.start_time,
            end_time: input.end_time,
            location: input.location,
            max_attendees: input.max_attendees,
            status: EventStatus::Scheduled,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every mutable field, rejecting backward status moves
    pub fn apply_update(&mut self, update: UpdateEvent) -> EventResult<()> {
        if !self.status.can_transition_to(update.status) {
            return Err(EventError::InvalidStatusTransition {
                from: self.status,
                to: update.status,
            });
        }

        self.name = update.name;
        self.description = update.description;
        self.start_time = update.start_time;
        self.end_time = update.end_time;
        self.location = update.location;
        self.max_attendees = update.max_attendees;
        self.status = update.status;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Past its end and not yet completed; canceled events qualify too
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.end_time < now && self.status != EventStatus::Completed
    }
}

impl Attendee {
    pub fn new(input: CreateAttendee) -> Self {
        Self {
            id: Uuid::now_v7(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: normalize_email(&input.email),
            phone_number: input.phone_number,
            event_id: input.event_id,
            checked_in: false,
            created_at: Utc::now(),
        }
    }
}

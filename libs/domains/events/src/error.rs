use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use uuid::Uuid;

use crate::models::EventStatus;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("An attendee with email '{0}' is already registered")]
    DuplicateEmail(String),

    #[error("Cannot change event status from {from} to {to}")]
    InvalidStatusTransition { from: EventStatus, to: EventStatus },

    #[error("Event not found: {0}")]
    EventNotFound(Uuid),

    #[error("Attendee not found: {0}")]
    AttendeeNotFound(Uuid),

    #[error("Event {event_id} is full ({max_attendees} attendees)")]
    CapacityExceeded { event_id: Uuid, max_attendees: u32 },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    CapacityExceeded,
    /// Storage or other infrastructure failure, never a caller mistake
    Infrastructure,
}

impl EventError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EventError::Validation(_)
            | EventError::DuplicateEmail(_)
            | EventError::InvalidStatusTransition { .. } => ErrorKind::Validation,
            EventError::EventNotFound(_) | EventError::AttendeeNotFound(_) => ErrorKind::NotFound,
            EventError::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            EventError::Internal(_) => ErrorKind::Infrastructure,
        }
    }
}

pub type EventResult<T> = Result<T, EventError>;

impl From<DbErr> for EventError {
    fn from(err: DbErr) -> Self {
        // attendees.email carries the only unique index besides primary keys
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            return EventError::DuplicateEmail(detail);
        }
        EventError::Internal(format!("Database error: {}", err))
    }
}

/// Convert EventError to AppError for standardized error responses
impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::Validation(msg) => AppError::BadRequest(msg),
            err @ (EventError::DuplicateEmail(_) | EventError::InvalidStatusTransition { .. }) => {
                AppError::BadRequest(err.to_string())
            }
            EventError::EventNotFound(id) => AppError::NotFound(format!("Event {} not found", id)),
            EventError::AttendeeNotFound(id) => {
                AppError::NotFound(format!("Attendee {} not found", id))
            }
            EventError::CapacityExceeded { event_id, .. } => {
                AppError::Conflict(format!("Event {} is full", event_id))
            }
            EventError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

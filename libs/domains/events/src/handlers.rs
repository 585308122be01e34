use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
    ErrorResponse, JsonBody, UuidPath, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::bulk::parse_checkin_csv;
use crate::error::EventResult;
use crate::models::{
    Attendee, BulkCheckInSummary, CreateAttendee, CreateEvent, Event, EventFilter, EventStatus,
    UpdateEvent,
};
use crate::repository::EventRepository;
use crate::service::EventService;

pub const EVENTS_TAG: &str = "events";
pub const ATTENDEES_TAG: &str = "attendees";

/// OpenAPI documentation for the Events API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_events,
        create_event,
        get_event,
        update_event,
        delete_event,
        list_event_attendees,
        bulk_check_in,
        register_attendee,
        check_in_attendee,
    ),
    components(
        schemas(
            Event,
            EventStatus,
            CreateEvent,
            UpdateEvent,
            EventFilter,
            Attendee,
            CreateAttendee,
            BulkCheckInSummary
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = EVENTS_TAG, description = "Event scheduling and lifecycle"),
        (name = ATTENDEES_TAG, description = "Attendee registration and check-in")
    )
)]
pub struct ApiDoc;

/// Create the events router with all HTTP endpoints
pub fn router<R: EventRepository + 'static>(service: EventService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/events/{id}/attendees", get(list_event_attendees))
        .route("/events/{id}/attendees/checkin", post(bulk_check_in))
        .route("/attendees", post(register_attendee))
        .route("/attendees/{id}/checkin", put(check_in_attendee))
        .with_state(shared_service)
}

/// List events with optional filters
#[utoipa::path(
    get,
    path = "/events",
    tag = EVENTS_TAG,
    params(EventFilter),
    responses(
        (status = 200, description = "Matching events ordered by creation", body = Vec<Event>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Query(filter): Query<EventFilter>,
) -> EventResult<Json<Vec<Event>>> {
    let events = service.list_events(filter).await?;
    Ok(Json(events))
}

/// Create a new event
#[utoipa::path(
    post,
    path = "/events",
    tag = EVENTS_TAG,
    request_body = CreateEvent,
    responses(
        (status = 201, description = "Event created in scheduled status", body = Event),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateEvent>,
) -> EventResult<impl IntoResponse> {
    let event = service.create_event(input).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Get an event by ID
#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = EVENTS_TAG,
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    UuidPath(id): UuidPath,
) -> EventResult<Json<Event>> {
    let event = service.get_event(id).await?;
    Ok(Json(event))
}

/// Replace an event, status included
#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = EVENTS_TAG,
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = UpdateEvent,
    responses(
        (status = 200, description = "Event updated successfully", body = Event),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateEvent>,
) -> EventResult<Json<Event>> {
    let event = service.update_event(id, input).await?;
    Ok(Json(event))
}

/// Delete an event and every attendee registered to it
#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = EVENTS_TAG,
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 204, description = "Event deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    UuidPath(id): UuidPath,
) -> EventResult<impl IntoResponse> {
    service.delete_event(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the attendees of an event
#[utoipa::path(
    get,
    path = "/events/{id}/attendees",
    tag = ATTENDEES_TAG,
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Attendees ordered by registration", body = Vec<Attendee>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_event_attendees<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    UuidPath(id): UuidPath,
) -> EventResult<Json<Vec<Attendee>>> {
    let attendees = service.list_attendees(id).await?;
    Ok(Json(attendees))
}

/// Check in attendees listed in a CSV document with an `email` column
#[utoipa::path(
    post,
    path = "/events/{id}/attendees/checkin",
    tag = ATTENDEES_TAG,
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body(content = String, content_type = "text/csv", description = "CSV with an `email` header"),
    responses(
        (status = 200, description = "Per-row outcome counts", body = BulkCheckInSummary),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn bulk_check_in<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    UuidPath(id): UuidPath,
    body: Bytes,
) -> EventResult<Json<BulkCheckInSummary>> {
    let rows = parse_checkin_csv(&body);
    let summary = service.bulk_check_in(id, rows).await?;
    Ok(Json(summary))
}

/// Register an attendee to an event
#[utoipa::path(
    post,
    path = "/attendees",
    tag = ATTENDEES_TAG,
    request_body = CreateAttendee,
    responses(
        (status = 201, description = "Attendee registered", body = Attendee),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 422, description = "Body is not a CreateAttendee document", body = ErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register_attendee<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    // Not ValidatedJson: the service normalizes the email before validating it
    JsonBody(input): JsonBody<CreateAttendee>,
) -> EventResult<impl IntoResponse> {
    let attendee = service.register_attendee(input).await?;
    Ok((StatusCode::CREATED, Json(attendee)))
}

/// Mark an attendee as checked in
#[utoipa::path(
    put,
    path = "/attendees/{id}/checkin",
    tag = ATTENDEES_TAG,
    params(
        ("id" = Uuid, Path, description = "Attendee ID")
    ),
    responses(
        (status = 200, description = "Attendee checked in", body = Attendee),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn check_in_attendee<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    UuidPath(id): UuidPath,
) -> EventResult<Json<Attendee>> {
    let attendee = service.check_in(id).await?;
    Ok(Json(attendee))
}

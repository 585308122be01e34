//! Events Domain
//!
//! Events with a capacity and a time window, the attendees registered to
//! them, and the background job that completes events once they are over.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐
//! │  Handlers   │     │  Reconciler  │  ← HTTP endpoints / periodic job
//! └──────┬──────┘     └──────┬───────┘
//!        │                   │
//! ┌──────▼──────┐            │
//! │   Service   │  ← validation, bulk check-in
//! └──────┬──────┘            │
//!        │                   │
//! ┌──────▼───────────────────▼──┐
//! │         Repository          │  ← atomic units (trait + in-memory / Postgres)
//! └──────┬──────────────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Event, Attendee, DTOs, status machine, capacity policy
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_events::{
//!     handlers,
//!     reconciler::StatusReconciler,
//!     repository::InMemoryEventRepository,
//!     service::EventService,
//! };
//!
//! let repository = Arc::new(InMemoryEventRepository::new());
//! let service = EventService::from_shared(repository.clone());
//! let reconciler = StatusReconciler::new(repository);
//!
//! let router = handlers::router(service);
//! ```

pub mod bulk;
pub mod capacity;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod reconciler;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use bulk::{parse_checkin_csv, BulkCheckInProcessor};
pub use error::{ErrorKind, EventError, EventResult};
pub use handlers::ApiDoc;
pub use models::{
    normalize_email, Attendee, BulkCheckInSummary, CheckInRow, CreateAttendee, CreateEvent, Event,
    EventFilter, EventStatus, UpdateEvent,
};
pub use postgres::PgEventRepository;
pub use reconciler::{ReconcileReport, ReconcilerScheduler, StatusReconciler};
pub use repository::{EventRepository, InMemoryEventRepository};
pub use service::EventService;

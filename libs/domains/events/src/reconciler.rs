//! Periodic status reconciliation.
//!
//! Completes every event whose `end_time` has passed and that is not
//! already Completed, canceled ones included. Nothing here ever produces
//! `Ongoing` or `Canceled`; those are manual.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::EventResult;
use crate::repository::EventRepository;

/// Result of a single reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Overdue events found at the start of the pass
    pub examined: usize,
    pub completed: usize,
    /// Events whose status changed under us before we got to them
    pub unchanged: usize,
    /// Events whose update failed; retried on the next pass
    pub failed: usize,
}

pub struct StatusReconciler<R: EventRepository> {
    repository: Arc<R>,
    in_flight: Mutex<()>,
}

impl<R: EventRepository> StatusReconciler<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            in_flight: Mutex::new(()),
        }
    }

    /// Reconcile against the current wall clock
    pub async fn run_once(&self) -> EventResult<Option<ReconcileReport>> {
        self.reconcile_at(Utc::now()).await
    }

    /// Reconcile as if the wall clock read `now`.
    ///
    /// Returns `Ok(None)` without touching anything when another pass is
    /// still running. A failure on one event is logged and counted, and the
    /// pass carries on with the rest.
    pub async fn reconcile_at(&self, now: DateTime<Utc>) -> EventResult<Option<ReconcileReport>> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            warn!("Previous status reconciliation still running, skipping this pass");
            return Ok(None);
        };

        let overdue = self.repository.overdue_events(now).await?;
        let mut report = ReconcileReport {
            examined: overdue.len(),
            ..Default::default()
        };

        for event in overdue {
            match self.repository.complete_event(event.id).await {
                Ok(true) => {
                    debug!(event_id = %event.id, end_time = %event.end_time, "Event completed");
                    report.completed += 1;
                }
                Ok(false) => report.unchanged += 1,
                Err(e) => {
                    error!(event_id = %event.id, error = %e, "Failed to complete event");
                    report.failed += 1;
                }
            }
        }

        if report.examined > 0 {
            info!(
                examined = report.examined,
                completed = report.completed,
                unchanged = report.unchanged,
                failed = report.failed,
                "Status reconciliation finished"
            );
        }
        Ok(Some(report))
    }
}

/// Runs a [`StatusReconciler`] on a fixed interval until shut down.
pub struct ReconcilerScheduler {
    scheduler: JobScheduler,
    job_id: Uuid,
}

impl ReconcilerScheduler {
    pub async fn start<R>(
        reconciler: Arc<StatusReconciler<R>>,
        interval: Duration,
    ) -> Result<Self, JobSchedulerError>
    where
        R: EventRepository + 'static,
    {
        let scheduler = JobScheduler::new().await?;

        let job = Job::new_repeated_async(interval, move |_uuid, _lock| {
            let reconciler = reconciler.clone();

            Box::pin(async move {
                if let Err(e) = reconciler.run_once().await {
                    error!(error = %e, "Status reconciliation failed");
                }
            })
        })?;

        let job_id = scheduler.add(job).await?;
        scheduler.start().await?;

        info!(
            interval_secs = interval.as_secs(),
            "Status reconciler scheduled"
        );
        Ok(Self { scheduler, job_id })
    }

    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    /// Stop the timer. A pass already in progress is allowed to finish.
    pub async fn shutdown(mut self) -> Result<(), JobSchedulerError> {
        self.scheduler.remove(&self.job_id).await?;
        self.scheduler.shutdown().await?;
        info!("Status reconciler stopped");
        Ok(())
    }
}

//! Capacity policy for attendee registration.
//!
//! Repositories evaluate this inside the same atomic unit as the insert, so
//! the count they pass in is the count the new row will be added to.

use uuid::Uuid;

use crate::error::{EventError, EventResult};
use crate::models::Event;

/// Registration is allowed iff `current_count < max_attendees`.
pub fn admits(current_count: u64, max_attendees: u32) -> bool {
    current_count < u64::from(max_attendees)
}

/// Fails with `CapacityExceeded` when `event` cannot take another attendee.
pub fn ensure_capacity(event: &Event, current_count: u64) -> EventResult<()> {
    ensure_capacity_for(event.id, event.max_attendees, current_count)
}

pub(crate) fn ensure_capacity_for(
    event_id: Uuid,
    max_attendees: u32,
    current_count: u64,
) -> EventResult<()> {
    if admits(current_count, max_attendees) {
        return Ok(());
    }

    tracing::info!(
        event_id = %event_id,
        current_count,
        max_attendees,
        "Registration rejected: event is full"
    );
    Err(EventError::CapacityExceeded {
        event_id,
        max_attendees,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admits_below_limit() {
        assert!(admits(0, 1));
        assert!(admits(99, 100));
    }

    #[test]
    fn test_rejects_at_or_above_limit() {
        assert!(!admits(1, 1));
        assert!(!admits(150, 100));
    }

    #[test]
    fn test_zero_capacity_admits_nobody() {
        assert!(!admits(0, 0));
    }

    #[test]
    fn test_ensure_capacity_reports_event() {
        let event_id = Uuid::now_v7();
        let err = ensure_capacity_for(event_id, 2, 2).unwrap_err();

        match err {
            EventError::CapacityExceeded {
                event_id: id,
                max_attendees,
            } => {
                assert_eq!(id, event_id);
                assert_eq!(max_attendees, 2);
            }
            other => panic!("expected CapacityExceeded, got {:?}", other),
        }
    }
}

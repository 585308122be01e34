//! Bulk check-in from an uploaded attendee list.

use std::sync::Arc;
use uuid::Uuid;

use crate::error::{EventError, EventResult};
use crate::models::{normalize_email, BulkCheckInSummary, CheckInRow};
use crate::repository::EventRepository;

/// Parse a CSV document with an `email` header column into check-in rows.
///
/// Records that cannot be decoded, or whose email cell is blank, become rows
/// without an email so the processor counts them as malformed.
pub fn parse_checkin_csv(data: &[u8]) -> Vec<CheckInRow> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data);

    reader
        .deserialize::<CheckInRow>()
        .map(|record| match record {
            Ok(row) => CheckInRow {
                email: row.email.filter(|email| !email.is_empty()),
            },
            Err(e) => {
                tracing::debug!(error = %e, "Skipping undecodable check-in row");
                CheckInRow::default()
            }
        })
        .collect()
}

/// Applies check-in row by row. Unknown emails and malformed rows are
/// skipped, never fatal.
pub struct BulkCheckInProcessor<R: EventRepository> {
    repository: Arc<R>,
}

impl<R: EventRepository> BulkCheckInProcessor<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn process<I>(&self, event_id: Uuid, rows: I) -> EventResult<BulkCheckInSummary>
    where
        I: IntoIterator<Item = CheckInRow>,
    {
        if self.repository.get_event(event_id).await?.is_none() {
            return Err(EventError::EventNotFound(event_id));
        }

        let mut summary = BulkCheckInSummary::default();

        for row in rows {
            summary.rows += 1;

            let Some(email) = row.email.as_deref().map(normalize_email) else {
                summary.malformed += 1;
                continue;
            };
            if email.is_empty() {
                summary.malformed += 1;
                continue;
            }

            let Some(attendee) = self
                .repository
                .find_attendee_by_email(event_id, &email)
                .await?
            else {
                summary.unmatched += 1;
                continue;
            };

            if attendee.checked_in {
                summary.already_checked_in += 1;
                continue;
            }

            // The attendee can only disappear through a cascading delete of this event
            match self.repository.check_in(attendee.id).await? {
                Some(_) => summary.checked_in += 1,
                None => summary.unmatched += 1,
            }
        }

        tracing::info!(
            event_id = %event_id,
            rows = summary.rows,
            checked_in = summary.checked_in,
            already_checked_in = summary.already_checked_in,
            unmatched = summary.unmatched,
            malformed = summary.malformed,
            "Bulk check-in processed"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateAttendee, CreateEvent};
    use crate::repository::InMemoryEventRepository;
    use chrono::{Duration, Utc};

    #[test]
    fn test_parse_csv_with_extra_columns() {
        let data = b"first_name,email\nAda,ada@x.io\nGrace, grace@x.io \n";
        let rows = parse_checkin_csv(data);

        assert_eq!(
            rows,
            vec![CheckInRow::new("ada@x.io"), CheckInRow::new("grace@x.io")]
        );
    }

    #[test]
    fn test_parse_csv_blank_and_missing_emails_are_malformed() {
        let data = b"email,name\n,Nobody\nada@x.io,Ada\n";
        let rows = parse_checkin_csv(data);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].email, None);
        assert_eq!(rows[1].email.as_deref(), Some("ada@x.io"));
    }

    #[test]
    fn test_parse_csv_without_email_header() {
        let data = b"name\nAda\nGrace\n";
        let rows = parse_checkin_csv(data);

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.email.is_none()));
    }

    #[tokio::test]
    async fn test_process_counts_each_outcome() {
        let repo = Arc::new(InMemoryEventRepository::new());
        let start = Utc::now();
        let event = repo
            .create_event(CreateEvent {
                name: "Workshop".to_string(),
                description: None,
                start_time: start,
                end_time: start + Duration::hours(1),
                location: "Lab".to_string(),
                max_attendees: 10,
            })
            .await
            .unwrap();

        let mut ids = Vec::new();
        for email in ["a@x.io", "b@x.io"] {
            let attendee = repo
                .register_attendee(CreateAttendee {
                    first_name: "Test".to_string(),
                    last_name: String::new(),
                    email: email.to_string(),
                    phone_number: String::new(),
                    event_id: event.id,
                })
                .await
                .unwrap();
            ids.push(attendee.id);
        }
        repo.check_in(ids[1]).await.unwrap();

        let processor = BulkCheckInProcessor::new(repo.clone());
        let summary = processor
            .process(
                event.id,
                vec![
                    CheckInRow::new("A@X.IO"),
                    CheckInRow::new("b@x.io"),
                    CheckInRow::new("ghost@x.io"),
                    CheckInRow::default(),
                ],
            )
            .await
            .unwrap();

        assert_eq!(
            summary,
            BulkCheckInSummary {
                rows: 4,
                checked_in: 1,
                already_checked_in: 1,
                unmatched: 1,
                malformed: 1,
            }
        );
        assert!(repo.get_attendee(ids[0]).await.unwrap().unwrap().checked_in);
    }

    #[tokio::test]
    async fn test_process_unknown_event() {
        let repo = Arc::new(InMemoryEventRepository::new());
        let processor = BulkCheckInProcessor::new(repo);

        let missing = Uuid::now_v7();
        let result = processor
            .process(missing, vec![CheckInRow::new("a@x.io")])
            .await;

        assert!(matches!(result, Err(EventError::EventNotFound(id)) if id == missing));
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    capacity,
    entity::{attendees, events},
    error::{EventError, EventResult},
    models::{
        normalize_email, Attendee, CreateAttendee, CreateEvent, Event, EventFilter, EventStatus,
        UpdateEvent,
    },
    repository::EventRepository,
};

/// Postgres `LIMIT`/`OFFSET` take a signed bigint
const MAX_SQL_BOUND: u64 = i64::MAX as u64;

fn sql_bound(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX).min(MAX_SQL_BOUND)
}

/// PostgreSQL implementation of EventRepository.
///
/// Writes that read before they write run in a transaction holding a
/// `FOR UPDATE` lock on the event row, so two registrations for the same
/// event are checked against capacity one after the other.
#[derive(Clone)]
pub struct PgEventRepository {
    db: DatabaseConnection,
}

impl PgEventRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn create_event(&self, input: CreateEvent) -> EventResult<Event> {
        let active_model = events::ActiveModel::try_from(Event::new(input))?;
        let model = active_model.insert(&self.db).await?;

        tracing::info!(event_id = %model.id, "Created event");
        Ok(model.into())
    }

    async fn get_event(&self, id: Uuid) -> EventResult<Option<Event>> {
        let model = events::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn list_events(&self, filter: EventFilter) -> EventResult<Vec<Event>> {
        let mut query = events::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(events::Column::Status.eq(status));
        }

        if let Some(location) = filter.location {
            query = query.filter(events::Column::Location.eq(location));
        }

        if let Some(instant) = filter.instant {
            query = query
                .filter(events::Column::StartTime.lte(instant))
                .filter(events::Column::EndTime.gte(instant));
        }

        let models = query
            .order_by_asc(events::Column::Id)
            .offset(sql_bound(filter.skip))
            .limit(sql_bound(filter.limit))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_event(&self, id: Uuid, input: UpdateEvent) -> EventResult<Option<Event>> {
        let txn = self.db.begin().await?;

        let Some(model) = events::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        let mut event: Event = model.into();
        event.apply_update(input)?;

        let updated = events::ActiveModel::try_from(event)?.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(event_id = %id, status = %updated.status, "Updated event");
        Ok(Some(updated.into()))
    }

    async fn delete_event(&self, id: Uuid) -> EventResult<Option<u64>> {
        let txn = self.db.begin().await?;

        let exists = events::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .is_some();
        if !exists {
            return Ok(None);
        }

        let removed = attendees::Entity::delete_many()
            .filter(attendees::Column::EventId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        events::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(event_id = %id, attendees_removed = removed, "Deleted event");
        Ok(Some(removed))
    }

    async fn overdue_events(&self, now: DateTime<Utc>) -> EventResult<Vec<Event>> {
        let models = events::Entity::find()
            .filter(events::Column::EndTime.lt(now))
            .filter(events::Column::Status.ne(EventStatus::Completed))
            .order_by_asc(events::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn complete_event(&self, id: Uuid) -> EventResult<bool> {
        let txn = self.db.begin().await?;

        let model = events::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?;
        let Some(model) = model.filter(|m| m.status != EventStatus::Completed) else {
            return Ok(false);
        };

        let mut active_model: events::ActiveModel = model.into();
        active_model.status = sea_orm::ActiveValue::Set(EventStatus::Completed);
        active_model.updated_at = sea_orm::ActiveValue::Set(Utc::now().into());
        active_model.update(&txn).await?;
        txn.commit().await?;

        Ok(true)
    }

    async fn register_attendee(&self, input: CreateAttendee) -> EventResult<Attendee> {
        let txn = self.db.begin().await?;

        let event: Event = events::Entity::find_by_id(input.event_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(EventError::EventNotFound(input.event_id))?
            .into();

        let current = attendees::Entity::find()
            .filter(attendees::Column::EventId.eq(event.id))
            .count(&txn)
            .await?;
        capacity::ensure_capacity(&event, current)?;

        let attendee = Attendee::new(input);
        let taken = attendees::Entity::find()
            .filter(attendees::Column::Email.eq(attendee.email.as_str()))
            .one(&txn)
            .await?
            .is_some();
        if taken {
            return Err(EventError::DuplicateEmail(attendee.email));
        }

        // The unique index still rejects a concurrent insert for another event
        let model = attendees::ActiveModel::from(attendee).insert(&txn).await?;
        txn.commit().await?;

        tracing::info!(
            attendee_id = %model.id,
            event_id = %model.event_id,
            "Registered attendee"
        );
        Ok(model.into())
    }

    async fn get_attendee(&self, id: Uuid) -> EventResult<Option<Attendee>> {
        let model = attendees::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn check_in(&self, id: Uuid) -> EventResult<Option<Attendee>> {
        let txn = self.db.begin().await?;

        // A concurrent cascade delete either commits first (no row) or waits for us
        let Some(model) = attendees::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };
        if model.checked_in {
            return Ok(Some(model.into()));
        }

        let mut active_model: attendees::ActiveModel = model.into();
        active_model.checked_in = sea_orm::ActiveValue::Set(true);
        let updated = active_model.update(&txn).await?;
        txn.commit().await?;

        Ok(Some(updated.into()))
    }

    async fn find_attendee_by_email(
        &self,
        event_id: Uuid,
        email: &str,
    ) -> EventResult<Option<Attendee>> {
        let model = attendees::Entity::find()
            .filter(attendees::Column::EventId.eq(event_id))
            .filter(attendees::Column::Email.eq(normalize_email(email)))
            .one(&self.db)
            .await?;

        Ok(model.map(Into::into))
    }

    async fn list_attendees(&self, event_id: Uuid) -> EventResult<Vec<Attendee>> {
        let models = attendees::Entity::find()
            .filter(attendees::Column::EventId.eq(event_id))
            .order_by_asc(attendees::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}

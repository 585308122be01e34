use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

use crate::error::{EventError, EventResult};

/// `max_attendees` is stored as a non-negative `integer`
pub(crate) fn capacity_to_db(max_attendees: u32) -> EventResult<i32> {
    i32::try_from(max_attendees).map_err(|_| {
        EventError::Validation(format!(
            "max_attendees must not exceed {}",
            i32::MAX
        ))
    })
}

fn capacity_from_db(max_attendees: i32) -> u32 {
    u32::try_from(max_attendees).unwrap_or(0)
}

// ===== Events Entity =====

pub mod events {
    use super::*;
    use crate::models::EventStatus;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "events")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(column_type = "Text")]
        pub name: String,
        #[sea_orm(column_type = "Text", nullable)]
        pub description: Option<String>,
        pub start_time: DateTimeWithTimeZone,
        pub end_time: DateTimeWithTimeZone,
        #[sea_orm(column_type = "Text")]
        pub location: String,
        pub max_attendees: i32,
        pub status: EventStatus,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::attendees::Entity")]
        Attendees,
    }

    impl Related<super::attendees::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Attendees.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Event {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                name: model.name,
                description: model.description,
                start_time: model.start_time.into(),
                end_time: model.end_time.into(),
                location: model.location,
                max_attendees: capacity_from_db(model.max_attendees),
                status: model.status,
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
            }
        }
    }

    impl TryFrom<crate::models::Event> for ActiveModel {
        type Error = EventError;

        fn try_from(event: crate::models::Event) -> EventResult<Self> {
            Ok(ActiveModel {
                id: Set(event.id),
                name: Set(event.name),
                description: Set(event.description),
                start_time: Set(event.start_time.into()),
                end_time: Set(event.end_time.into()),
                location: Set(event.location),
                max_attendees: Set(capacity_to_db(event.max_attendees)?),
                status: Set(event.status),
                created_at: Set(event.created_at.into()),
                updated_at: Set(event.updated_at.into()),
            })
        }
    }
}

// ===== Attendees Entity =====

pub mod attendees {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "attendees")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(column_type = "Text")]
        pub first_name: String,
        #[sea_orm(column_type = "Text")]
        pub last_name: String,
        #[sea_orm(column_type = "Text", unique)]
        pub email: String,
        #[sea_orm(column_type = "Text")]
        pub phone_number: String,
        pub event_id: Uuid,
        pub checked_in: bool,
        pub created_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::events::Entity",
            from = "Column::EventId",
            to = "super::events::Column::Id",
            on_delete = "Cascade"
        )]
        Event,
    }

    impl Related<super::events::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Event.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Attendee {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                first_name: model.first_name,
                last_name: model.last_name,
                email: model.email,
                phone_number: model.phone_number,
                event_id: model.event_id,
                checked_in: model.checked_in,
                created_at: model.created_at.into(),
            }
        }
    }

    impl From<crate::models::Attendee> for ActiveModel {
        fn from(attendee: crate::models::Attendee) -> Self {
            ActiveModel {
                id: Set(attendee.id),
                first_name: Set(attendee.first_name),
                last_name: Set(attendee.last_name),
                email: Set(attendee.email),
                phone_number: Set(attendee.phone_number),
                event_id: Set(attendee.event_id),
                checked_in: Set(attendee.checked_in),
                created_at: Set(attendee.created_at.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_bounds() {
        assert_eq!(capacity_to_db(0).unwrap(), 0);
        assert_eq!(capacity_to_db(150).unwrap(), 150);
        assert!(matches!(
            capacity_to_db(u32::MAX),
            Err(EventError::Validation(_))
        ));
        assert_eq!(capacity_from_db(-1), 0);
        assert_eq!(capacity_from_db(42), 42);
    }
}

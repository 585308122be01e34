use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn statuses() -> [EventStatus; 4] {
    [
        EventStatus::Scheduled,
        EventStatus::Ongoing,
        EventStatus::Completed,
        EventStatus::Canceled,
    ]
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create event_status enum
        manager
            .create_type(
                Type::create()
                    .as_enum(EventStatus::Enum)
                    .values(statuses())
                    .to_owned(),
            )
            .await?;

        // Create events table
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(pk_uuid(Events::Id))
                    .col(text(Events::Name))
                    .col(text_null(Events::Description))
                    .col(timestamp_with_time_zone(Events::StartTime))
                    .col(timestamp_with_time_zone(Events::EndTime))
                    .col(text(Events::Location))
                    .col(integer(Events::MaxAttendees).check(Expr::col(Events::MaxAttendees).gte(0)))
                    .col(
                        ColumnDef::new(Events::Status)
                            .enumeration(EventStatus::Enum, statuses())
                            .not_null()
                            .default("scheduled"),
                    )
                    .col(
                        timestamp_with_time_zone(Events::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Events::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create attendees table
        manager
            .create_table(
                Table::create()
                    .table(Attendees::Table)
                    .if_not_exists()
                    .col(pk_uuid(Attendees::Id))
                    .col(text(Attendees::FirstName))
                    .col(text(Attendees::LastName).default(""))
                    .col(text(Attendees::Email).unique_key())
                    .col(text(Attendees::PhoneNumber).default(""))
                    .col(uuid(Attendees::EventId))
                    .col(boolean(Attendees::CheckedIn).default(false))
                    .col(
                        timestamp_with_time_zone(Attendees::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendees_event_id")
                            .from(Attendees::Table, Attendees::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create indexes
        manager
            .create_index(
                Index::create()
                    .name("idx_events_status")
                    .table(Events::Table)
                    .col(Events::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_events_end_time")
                    .table(Events::Table)
                    .col(Events::EndTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attendees_event_id")
                    .table(Attendees::Table)
                    .col(Attendees::EventId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attendees::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(EventStatus::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    Name,
    Description,
    StartTime,
    EndTime,
    Location,
    MaxAttendees,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Attendees {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    PhoneNumber,
    EventId,
    CheckedIn,
    CreatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum EventStatus {
    #[sea_orm(iden = "event_status")]
    Enum,
    #[sea_orm(iden = "scheduled")]
    Scheduled,
    #[sea_orm(iden = "ongoing")]
    Ongoing,
    #[sea_orm(iden = "completed")]
    Completed,
    #[sea_orm(iden = "canceled")]
    Canceled,
}

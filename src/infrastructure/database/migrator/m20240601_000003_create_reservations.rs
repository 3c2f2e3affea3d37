//! Create reservations table
//!
//! Guest bookings. `processed` is 0 (new), 1 (processed) or 2 (archived).

use sea_orm_migration::prelude::*;

use super::m20240601_000002_create_rooms::Rooms;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::FirstName).string().not_null())
                    .col(ColumnDef::new(Reservations::LastName).string().not_null())
                    .col(ColumnDef::new(Reservations::Email).string().not_null())
                    .col(ColumnDef::new(Reservations::Phone).string().not_null())
                    .col(ColumnDef::new(Reservations::StartDate).date().not_null())
                    .col(ColumnDef::new(Reservations::EndDate).date().not_null())
                    .col(ColumnDef::new(Reservations::RoomId).integer().not_null())
                    .col(
                        ColumnDef::new(Reservations::Processed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_room")
                            .from(Reservations::Table, Reservations::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_email")
                    .table(Reservations::Table)
                    .col(Reservations::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_processed")
                    .table(Reservations::Table)
                    .col(Reservations::Processed)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reservations {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    StartDate,
    EndDate,
    RoomId,
    Processed,
    CreatedAt,
    UpdatedAt,
}

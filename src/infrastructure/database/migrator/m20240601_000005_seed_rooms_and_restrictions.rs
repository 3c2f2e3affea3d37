//! Seed the two rooms and the restriction kinds

use chrono::Utc;
use sea_orm_migration::prelude::*;

use super::m20240601_000002_create_rooms::{Restrictions, Rooms};

const ROOMS: [(i32, &str); 2] = [(1, "General's Quarters"), (2, "Major's Suite")];
const RESTRICTIONS: [(i32, &str); 2] = [(1, "Reservation"), (2, "Owner Block")];

fn seed_error(e: sea_orm::sea_query::error::Error) -> DbErr {
    DbErr::Migration(format!("seed row: {}", e))
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = Utc::now();

        let mut rooms = Query::insert();
        rooms.into_table(Rooms::Table).columns([
            Rooms::Id,
            Rooms::RoomName,
            Rooms::CreatedAt,
            Rooms::UpdatedAt,
        ]);
        for (id, name) in ROOMS {
            rooms
                .values([id.into(), name.into(), now.into(), now.into()])
                .map_err(seed_error)?;
        }
        manager.exec_stmt(rooms.to_owned()).await?;

        let mut restrictions = Query::insert();
        restrictions.into_table(Restrictions::Table).columns([
            Restrictions::Id,
            Restrictions::RestrictionName,
            Restrictions::CreatedAt,
            Restrictions::UpdatedAt,
        ]);
        for (id, name) in RESTRICTIONS {
            restrictions
                .values([id.into(), name.into(), now.into(), now.into()])
                .map_err(seed_error)?;
        }
        manager.exec_stmt(restrictions.to_owned()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Restrictions::Table)
                    .and_where(Expr::col(Restrictions::Id).is_in([1, 2]))
                    .to_owned(),
            )
            .await?;
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Rooms::Table)
                    .and_where(Expr::col(Rooms::Id).is_in([1, 2]))
                    .to_owned(),
            )
            .await
    }
}

//! Room restriction entity: a `[start_date, end_date)` block on a room

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "room_restrictions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub start_date: Date,
    pub end_date: Date,

    pub room_id: i32,

    #[sea_orm(nullable)]
    pub reservation_id: Option<i32>,

    pub restriction_id: i32,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::room::Entity",
        from = "Column::RoomId",
        to = "super::room::Column::Id"
    )]
    Room,
    #[sea_orm(
        belongs_to = "super::reservation::Entity",
        from = "Column::ReservationId",
        to = "super::reservation::Column::Id"
    )]
    Reservation,
    #[sea_orm(
        belongs_to = "super::restriction::Entity",
        from = "Column::RestrictionId",
        to = "super::restriction::Column::Id"
    )]
    Restriction,
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

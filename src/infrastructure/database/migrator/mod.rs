//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_users;
mod m20240601_000002_create_rooms;
mod m20240601_000003_create_reservations;
mod m20240601_000004_create_room_restrictions;
mod m20240601_000005_seed_rooms_and_restrictions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_users::Migration),
            Box::new(m20240601_000002_create_rooms::Migration),
            Box::new(m20240601_000003_create_reservations::Migration),
            Box::new(m20240601_000004_create_room_restrictions::Migration),
            Box::new(m20240601_000005_seed_rooms_and_restrictions::Migration),
        ]
    }
}

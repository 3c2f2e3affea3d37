//! Deterministic in-memory DatabaseRepo for handler tests
//!
//! Fixed failure triggers:
//! - `insert_reservation` fails for room 2
//! - `insert_room_restriction` fails for room 1000
//! - `search_availability_for_all_rooms` is empty for 2050-10-01..02 and
//!   fails for 2050-11-11..12
//! - `search_availability_by_dates_by_room_id` fails for room 999
//! - `get_room_by_id` fails for ids above 2
//! - reservation lists fail after `with_failing_lists`

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::domain::{
    format_date, DatabaseRepo, DomainError, DomainResult, Processed, Reservation, Room,
    RoomRestriction, StayPeriod, User, ACCESS_LEVEL_ADMIN,
};

pub const TEST_ADMIN_ID: i32 = 1;
pub const TEST_ADMIN_EMAIL: &str = "admin@example.com";
pub const TEST_ADMIN_PASSWORD: &str = "password";

/// Room id the fake refuses to reserve
pub const FAILING_RESERVATION_ROOM: i32 = 2;
/// Room id the fake refuses to block
pub const FAILING_RESTRICTION_ROOM: i32 = 1000;
/// Room id whose availability lookup fails
pub const FAILING_AVAILABILITY_ROOM: i32 = 999;

fn storage(msg: &str) -> DomainError {
    DomainError::Storage(msg.to_string())
}

fn room_name(id: i32) -> &'static str {
    match id {
        1 => "General's Quarters",
        2 => "Major's Suite",
        _ => "",
    }
}

pub struct TestDatabaseRepo {
    reservations: DashMap<i32, Reservation>,
    restrictions: DashMap<i32, RoomRestriction>,
    users: DashMap<i32, User>,
    restriction_counter: AtomicI32,
    lists_fail: bool,
}

impl TestDatabaseRepo {
    pub fn new() -> Self {
        let repo = Self {
            reservations: DashMap::new(),
            restrictions: DashMap::new(),
            users: DashMap::new(),
            restriction_counter: AtomicI32::new(1),
            lists_fail: false,
        };

        let now = Utc::now();
        repo.users.insert(
            TEST_ADMIN_ID,
            User {
                id: TEST_ADMIN_ID,
                first_name: "Admin".to_string(),
                last_name: "User".to_string(),
                email: TEST_ADMIN_EMAIL.to_string(),
                password_hash: String::new(),
                access_level: ACCESS_LEVEL_ADMIN,
                created_at: now,
                updated_at: now,
            },
        );
        repo
    }

    /// Seed stored reservations for back-office tests.
    pub fn with_reservations(self, reservations: impl IntoIterator<Item = Reservation>) -> Self {
        for r in reservations {
            self.reservations.insert(r.id, r);
        }
        self
    }

    /// Make `all_reservations` and `all_new_reservations` fail.
    pub fn with_failing_lists(mut self) -> Self {
        self.lists_fail = true;
        self
    }

    /// Seed a block directly, bypassing the failure triggers.
    pub fn with_restriction(self, restriction: RoomRestriction) -> Self {
        let id = self.restriction_counter.fetch_add(1, Ordering::SeqCst);
        self.restrictions.insert(id, RoomRestriction { id, ..restriction });
        self
    }

    /// Every restriction accepted so far, in insertion order.
    pub fn restriction_inserts(&self) -> Vec<RoomRestriction> {
        let mut all: Vec<_> = self.restrictions.iter().map(|r| r.value().clone()).collect();
        all.sort_by_key(|r| r.id);
        all
    }

    pub fn stored_reservation(&self, id: i32) -> Option<Reservation> {
        self.reservations.get(&id).map(|r| r.value().clone())
    }
}

impl Default for TestDatabaseRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseRepo for TestDatabaseRepo {
    async fn ping(&self) -> DomainResult<()> {
        Ok(())
    }

    async fn insert_reservation(&self, reservation: &Reservation) -> DomainResult<i32> {
        if reservation.room_id == FAILING_RESERVATION_ROOM {
            return Err(storage("some error"));
        }
        let id = 1;
        self.reservations.insert(
            id,
            Reservation {
                id,
                ..reservation.clone()
            },
        );
        Ok(id)
    }

    async fn insert_room_restriction(&self, restriction: &RoomRestriction) -> DomainResult<()> {
        if restriction.room_id == FAILING_RESTRICTION_ROOM {
            return Err(storage("some error"));
        }
        let id = self.restriction_counter.fetch_add(1, Ordering::SeqCst);
        self.restrictions.insert(
            id,
            RoomRestriction {
                id,
                ..restriction.clone()
            },
        );
        Ok(())
    }

    async fn search_availability_by_dates_by_room_id(
        &self,
        period: StayPeriod,
        room_id: i32,
    ) -> DomainResult<bool> {
        if room_id == FAILING_AVAILABILITY_ROOM {
            return Err(storage("availability lookup failed"));
        }
        let blocked = self.restrictions.iter().any(|entry| {
            let r = entry.value();
            r.room_id == room_id
                && r.period().map(|p| p.overlaps(&period)).unwrap_or(false)
        });
        Ok(!blocked)
    }

    async fn search_availability_for_all_rooms(
        &self,
        period: StayPeriod,
    ) -> DomainResult<Vec<Room>> {
        let (start, end) = (format_date(period.start()), format_date(period.end()));
        match (start.as_str(), end.as_str()) {
            ("2050-10-01", "2050-10-02") => Ok(Vec::new()),
            ("2050-11-11", "2050-11-12") => Err(storage("error")),
            _ => Ok(vec![Room::new(1, room_name(1))]),
        }
    }

    async fn get_room_by_id(&self, id: i32) -> DomainResult<Room> {
        if id > 2 {
            return Err(DomainError::not_found("Room", id));
        }
        Ok(Room::new(id, room_name(id)))
    }

    async fn get_user_by_id(&self, id: i32) -> DomainResult<User> {
        self.users
            .get(&id)
            .map(|u| u.value().clone())
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    async fn update_user(&self, user: &User) -> DomainResult<()> {
        let mut stored = self
            .users
            .get_mut(&user.id)
            .ok_or_else(|| DomainError::not_found("User", user.id))?;
        stored.first_name = user.first_name.clone();
        stored.last_name = user.last_name.clone();
        stored.email = user.email.clone();
        stored.access_level = user.access_level;
        stored.updated_at = Utc::now();
        Ok(())
    }

    async fn authenticate(&self, email: &str, password: &str) -> DomainResult<(i32, String)> {
        if email == TEST_ADMIN_EMAIL && password == TEST_ADMIN_PASSWORD {
            return Ok((TEST_ADMIN_ID, String::new()));
        }
        Err(DomainError::Unauthorized("incorrect credentials".into()))
    }

    async fn all_reservations(&self) -> DomainResult<Vec<Reservation>> {
        if self.lists_fail {
            return Err(storage("reservation list unavailable"));
        }
        let mut all: Vec<_> = self.reservations.iter().map(|r| r.value().clone()).collect();
        all.sort_by_key(|r| (r.start_date, r.id));
        Ok(all)
    }

    async fn all_new_reservations(&self) -> DomainResult<Vec<Reservation>> {
        let mut all = self.all_reservations().await?;
        all.retain(|r| r.processed == Processed::New);
        Ok(all)
    }

    async fn get_reservation_by_id(&self, id: i32) -> DomainResult<Reservation> {
        self.stored_reservation(id)
            .ok_or_else(|| DomainError::not_found("Reservation", id))
    }

    async fn update_reservation(&self, reservation: &Reservation) -> DomainResult<()> {
        let mut stored = self
            .reservations
            .get_mut(&reservation.id)
            .ok_or_else(|| DomainError::not_found("Reservation", reservation.id))?;
        stored.first_name = reservation.first_name.clone();
        stored.last_name = reservation.last_name.clone();
        stored.email = reservation.email.clone();
        stored.phone = reservation.phone.clone();
        stored.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_reservation(&self, id: i32) -> DomainResult<()> {
        self.reservations
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("Reservation", id))?;
        self.restrictions
            .retain(|_, r| r.reservation_id != Some(id));
        Ok(())
    }

    async fn update_processed_for_reservation(
        &self,
        id: i32,
        processed: Processed,
    ) -> DomainResult<()> {
        let mut stored = self
            .reservations
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Reservation", id))?;
        stored.processed = processed;
        Ok(())
    }
}

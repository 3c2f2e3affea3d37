//! Persistence port for the domain layer
//!
//! `DatabaseRepo` is the single storage boundary the booking workflow and
//! the back-office talk to. Production wires the SeaORM engine behind it,
//! tests wire the deterministic fake.

use async_trait::async_trait;
use thiserror::Error;

use super::reservation::{Processed, Reservation, RoomRestriction, StayPeriod};
use super::room::Room;
use super::user::User;
pub use crate::shared::errors::{DomainError, DomainResult};

/// Failure of the combined reservation + restriction write.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Nothing was written
    #[error("insert reservation: {0}")]
    Reservation(#[source] DomainError),

    /// The reservation row may survive without its block; `orphaned` holds
    /// its id when the engine could not roll it back.
    #[error("insert room restriction: {source}")]
    Restriction {
        orphaned: Option<i32>,
        #[source]
        source: DomainError,
    },
}

#[async_trait]
pub trait DatabaseRepo: Send + Sync {
    /// Cheap connectivity probe used by the health endpoint.
    async fn ping(&self) -> DomainResult<()>;

    /// Persist a new reservation and return its id.
    async fn insert_reservation(&self, reservation: &Reservation) -> DomainResult<i32>;

    async fn insert_room_restriction(&self, restriction: &RoomRestriction) -> DomainResult<()>;

    /// Persist a reservation together with the restriction blocking its
    /// dates. The reservation is written first; the restriction is never
    /// attempted when that fails.
    ///
    /// Engines with transactions override this so both rows commit or
    /// neither does.
    async fn insert_reservation_with_restriction(
        &self,
        reservation: &Reservation,
    ) -> Result<i32, BookingError> {
        let id = self
            .insert_reservation(reservation)
            .await
            .map_err(BookingError::Reservation)?;

        let restriction = RoomRestriction::for_reservation(reservation, id);
        self.insert_room_restriction(&restriction)
            .await
            .map_err(|source| BookingError::Restriction {
                orphaned: Some(id),
                source,
            })?;

        Ok(id)
    }

    /// `true` when no restriction on `room_id` overlaps `period`.
    async fn search_availability_by_dates_by_room_id(
        &self,
        period: StayPeriod,
        room_id: i32,
    ) -> DomainResult<bool>;

    /// Every room without an overlapping restriction. An empty list is a
    /// valid answer, not an error.
    async fn search_availability_for_all_rooms(&self, period: StayPeriod)
        -> DomainResult<Vec<Room>>;

    async fn get_room_by_id(&self, id: i32) -> DomainResult<Room>;

    async fn get_user_by_id(&self, id: i32) -> DomainResult<User>;

    async fn update_user(&self, user: &User) -> DomainResult<()>;

    /// Check credentials; returns the user id and stored password hash.
    async fn authenticate(&self, email: &str, password: &str) -> DomainResult<(i32, String)>;

    async fn all_reservations(&self) -> DomainResult<Vec<Reservation>>;

    async fn all_new_reservations(&self) -> DomainResult<Vec<Reservation>>;

    async fn get_reservation_by_id(&self, id: i32) -> DomainResult<Reservation>;

    async fn update_reservation(&self, reservation: &Reservation) -> DomainResult<()>;

    async fn delete_reservation(&self, id: i32) -> DomainResult<()>;

    async fn update_processed_for_reservation(
        &self,
        id: i32,
        processed: Processed,
    ) -> DomainResult<()>;
}

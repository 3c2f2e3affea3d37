//! Reservation domain entities

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::period::StayPeriod;
use crate::domain::room::{RestrictionKind, Room};
use crate::shared::errors::DomainError;

/// Back-office processing state of a reservation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Processed {
    /// Submitted by a guest, not yet looked at
    #[default]
    New,
    /// Handled by staff
    Processed,
    /// Hidden from the back-office lists without deleting the row
    Archived,
}

impl Processed {
    pub fn as_i32(self) -> i32 {
        match self {
            Self::New => 0,
            Self::Processed => 1,
            Self::Archived => 2,
        }
    }

}

impl TryFrom<i32> for Processed {
    type Error = DomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::New),
            1 => Ok(Self::Processed),
            2 => Ok(Self::Archived),
            other => Err(DomainError::Validation(format!(
                "unknown processed state {}",
                other
            ))),
        }
    }
}

/// A guest booking.
///
/// The pending copy of this value travels through the session between the
/// room choice, the guest details form and the summary page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room_id: i32,
    pub room: Room,
    pub processed: Processed,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// A pending reservation covering `period`, no room chosen yet.
    pub fn pending(period: StayPeriod) -> Self {
        Self {
            start_date: period.start(),
            end_date: period.end(),
            ..Self::default()
        }
    }

    pub fn period(&self) -> Result<StayPeriod, DomainError> {
        StayPeriod::new(self.start_date, self.end_date)
    }

    pub fn with_room(mut self, room: Room) -> Self {
        self.room_id = room.id;
        self.room = room;
        self
    }
}

/// A date-range block on a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRestriction {
    pub id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room_id: i32,
    /// Set for blocks created by a booking, empty for owner blocks
    pub reservation_id: Option<i32>,
    pub restriction: RestrictionKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoomRestriction {
    /// The block that keeps a saved reservation's dates unavailable.
    pub fn for_reservation(reservation: &Reservation, reservation_id: i32) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            start_date: reservation.start_date,
            end_date: reservation.end_date,
            room_id: reservation.room_id,
            reservation_id: Some(reservation_id),
            restriction: RestrictionKind::Reservation,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn period(&self) -> Result<StayPeriod, DomainError> {
        StayPeriod::new(self.start_date, self.end_date)
    }
}

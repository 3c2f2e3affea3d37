//! Room domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bookable inventory unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: i32,
    pub room_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    pub fn new(id: i32, room_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            room_name: room_name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Kind of block a [`RoomRestriction`](crate::domain::RoomRestriction) represents.
///
/// Values mirror the seeded `restrictions` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestrictionKind {
    Reservation = 1,
    OwnerBlock = 2,
}

impl RestrictionKind {
    pub fn id(self) -> i32 {
        self as i32
    }

    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(Self::Reservation),
            2 => Some(Self::OwnerBlock),
            _ => None,
        }
    }
}

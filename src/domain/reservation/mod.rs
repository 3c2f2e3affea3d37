//! Reservation aggregate
//!
//! Contains the Reservation and RoomRestriction entities and the stay
//! period they share.

pub mod model;
pub mod period;

pub use model::{Processed, Reservation, RoomRestriction};
pub use period::{format_date, parse_date, StayPeriod, DATE_LAYOUT};

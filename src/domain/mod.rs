pub mod repositories;
pub mod reservation;
pub mod room;
pub mod user;

// Re-export commonly used types
pub use repositories::{BookingError, DatabaseRepo, DomainError, DomainResult};
pub use reservation::{
    format_date, parse_date, Processed, Reservation, RoomRestriction, StayPeriod, DATE_LAYOUT,
};
pub use room::{RestrictionKind, Room};
pub use user::{User, ACCESS_LEVEL_ADMIN};

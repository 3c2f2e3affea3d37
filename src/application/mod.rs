//! Application layer: workflows on top of the persistence port

pub mod booking;

pub use booking::BookingService;

//! Room aggregate

pub mod model;

pub use model::{RestrictionKind, Room};

//! User aggregate

pub mod model;

pub use model::{User, ACCESS_LEVEL_ADMIN};

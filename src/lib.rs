//! # Bookings
//!
//! Room booking site for a small bed and breakfast: availability search,
//! guest reservations and a staff back-office.
//!
//! ## Architecture
//!
//! - **domain**: entities, the stay period and the `DatabaseRepo` port
//! - **application**: the booking workflow service
//! - **infrastructure**: SeaORM storage, password hashing, session store
//! - **interfaces**: axum handlers, sessions and rendering
//! - **server**: process lifecycle

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};
pub use infrastructure::{init_database, DatabaseConfig};
pub use interfaces::http::create_router;

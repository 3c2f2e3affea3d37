//! Per-browser sessions
//!
//! `tower-sessions` carries the session id in a cookie, rotates it on login
//! and expires idle sessions. This module holds the keys handlers share and
//! builds the layer from configuration.

use std::time::Duration;

use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, SessionManagerLayer};

use crate::infrastructure::session::InMemorySessionStore;

pub use tower_sessions::Session;

/// Pending reservation between room choice and the guest form
pub const KEY_RESERVATION: &str = "reservation";
/// Saved reservation shown once on the summary page
pub const KEY_CONFIRMED: &str = "confirmed_reservation";
pub const KEY_USER_ID: &str = "user_id";
pub const KEY_FLASH: &str = "flash";
pub const KEY_WARNING: &str = "warning";
pub const KEY_ERROR: &str = "error";

/// Session store plus cookie settings
#[derive(Clone)]
pub struct SessionState {
    pub store: InMemorySessionStore,
    pub cookie_name: String,
    pub secure: bool,
    /// Idle lifetime
    pub lifetime: Duration,
}

impl SessionState {
    pub fn layer(&self) -> SessionManagerLayer<InMemorySessionStore> {
        let idle = time::Duration::try_from(self.lifetime).unwrap_or(time::Duration::DAY);
        SessionManagerLayer::new(self.store.clone())
            .with_name(self.cookie_name.clone())
            .with_secure(self.secure)
            .with_same_site(SameSite::Lax)
            .with_expiry(Expiry::OnInactivity(idle))
    }
}

//! Shared router state

use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRef;

use crate::application::booking::BookingService;
use crate::domain::DatabaseRepo;
use crate::interfaces::http::modules::health::HealthState;
use crate::interfaces::http::render::Renderer;
use crate::interfaces::http::session::SessionState;

/// State handed to every page handler. Sub-states are pulled out via
/// `FromRef` so each handler only names what it uses.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn DatabaseRepo>,
    pub booking: Arc<BookingService>,
    pub renderer: Arc<dyn Renderer>,
    pub sessions: SessionState,
    pub started_at: Arc<Instant>,
}

impl AppState {
    pub fn new(
        repo: Arc<dyn DatabaseRepo>,
        renderer: Arc<dyn Renderer>,
        sessions: SessionState,
    ) -> Self {
        Self {
            booking: Arc::new(BookingService::new(repo.clone())),
            repo,
            renderer,
            sessions,
            started_at: Arc::new(Instant::now()),
        }
    }
}

impl FromRef<AppState> for HealthState {
    fn from_ref(s: &AppState) -> Self {
        HealthState {
            repo: Arc::clone(&s.repo),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

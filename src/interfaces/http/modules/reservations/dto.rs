//! Reservation DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Form body of `POST /search-availability-json`
#[derive(Debug, Deserialize, ToSchema)]
pub struct AvailabilityRequest {
    /// Arrival, `YYYY-MM-DD`
    pub start: String,
    /// Departure, `YYYY-MM-DD`
    pub end: String,
    pub room_id: String,
}

/// Availability answer for a single room.
///
/// Always returned with 200; `ok = false` with a `message` describes bad
/// input or a failed lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityResponse {
    pub ok: bool,
    pub message: String,
    pub room_id: String,
    pub start_date: String,
    pub end_date: String,
}

impl AvailabilityResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            ..Self::default()
        }
    }
}

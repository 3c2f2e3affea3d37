//! Administrative account

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access level granted to back-office staff
pub const ACCESS_LEVEL_ADMIN: i32 = 3;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub access_level: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

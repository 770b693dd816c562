use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Profile row as seen by the rest of the system.
///
/// `interests` and `visibility` are stored as JSON-encoded strings, exactly
/// as they travel on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub nickname: String,
    pub bio: Option<String>,
    pub gender: Option<String>,
    pub interests: Option<String>,
    pub city: Option<String>,
    pub visibility: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile plus the owner attributes exposed when browsing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileCard {
    pub profile: Profile,
    pub birth_year: i32,
    pub premium_until: Option<DateTime<Utc>>,
}

/// Per-profile privacy toggles.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityPrefs {
    pub photos: Option<bool>,
    pub online_status: Option<bool>,
    pub last_seen: Option<bool>,
}

/// Profile creation input.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub nickname: String,
    pub bio: Option<String>,
    pub gender: Option<String>,
    pub interests: Option<Vec<String>>,
    pub city: Option<String>,
    pub visibility: Option<VisibilityPrefs>,
}

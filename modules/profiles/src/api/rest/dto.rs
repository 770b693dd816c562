use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::contract::{NewProfile, Profile, ProfileCard, VisibilityPrefs};
use api_core::PageMeta;

/// REST DTO for a profile. `interests` and `visibility` are the stored
/// JSON-encoded strings, as the original wire format has them.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
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

/// Owner attributes attached when browsing or fetching a profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOwnerDto {
    pub birth_year: i32,
    pub premium_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCardDto {
    #[serde(flatten)]
    pub profile: ProfileDto,
    pub user: ProfileOwnerDto,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileReq {
    pub nickname: String,
    pub bio: Option<String>,
    pub gender: Option<String>,
    pub interests: Option<Vec<String>>,
    pub city: Option<String>,
    pub visibility: Option<VisibilityPrefs>,
}

/// Query parameters for profile browsing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BrowseQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BrowseResponse {
    pub profiles: Vec<ProfileCardDto>,
    pub pagination: PageMeta,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub profile: ProfileCardDto,
}

impl From<Profile> for ProfileDto {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            nickname: p.nickname,
            bio: p.bio,
            gender: p.gender,
            interests: p.interests,
            city: p.city,
            visibility: p.visibility,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<ProfileCard> for ProfileCardDto {
    fn from(card: ProfileCard) -> Self {
        Self {
            profile: ProfileDto::from(card.profile),
            user: ProfileOwnerDto {
                birth_year: card.birth_year,
                premium_until: card.premium_until,
            },
        }
    }
}

impl From<CreateProfileReq> for NewProfile {
    fn from(req: CreateProfileReq) -> Self {
        Self {
            nickname: req.nickname,
            bio: req.bio,
            gender: req.gender,
            interests: req.interests,
            city: req.city,
            visibility: req.visibility,
        }
    }
}

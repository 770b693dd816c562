use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::{AccountStatus, KycStatus, LoginCredentials, NewUser, Role, User};

/// REST DTO for account representation. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub status: AccountStatus,
    pub kyc_status: KycStatus,
    pub birth_year: i32,
    pub city: Option<String>,
    pub premium_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterReq {
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub birth_year: i32,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserDto,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginReq {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserDto,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            phone: user.phone,
            role: user.role,
            status: user.status,
            kyc_status: user.kyc_status,
            birth_year: user.birth_year,
            city: user.city,
            premium_until: user.premium_until,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<RegisterReq> for NewUser {
    fn from(req: RegisterReq) -> Self {
        Self {
            email: req.email,
            password: req.password,
            phone: req.phone,
            birth_year: req.birth_year,
            city: req.city,
        }
    }
}

impl From<LoginReq> for LoginCredentials {
    fn from(req: LoginReq) -> Self {
        Self {
            email: req.email,
            phone: req.phone,
            password: req.password,
        }
    }
}

use axum::{http::Uri, response::Json, Extension};
use std::sync::Arc;
use tracing::{error, info};

use api_core::problem::Problem;
use api_core::{CurrentUser, ProblemResponse};

use crate::api::rest::dto::{LoginReq, LoginResponse, RegisterReq, RegisterResponse, UserDto};
use crate::api::rest::error::map_domain_error;
use crate::domain::service::Service;

/// Create a new account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "accounts",
    request_body = RegisterReq,
    responses(
        (status = 200, description = "User created", body = RegisterResponse),
        (status = 400, description = "Validation error or duplicate email/phone", body = Problem),
        (status = 500, description = "Internal error", body = Problem)
    )
)]
pub async fn register(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Json(req_body): Json<RegisterReq>,
) -> Result<Json<RegisterResponse>, ProblemResponse> {
    info!("Registering user with email {}", req_body.email);

    match svc.register(req_body.into()).await {
        Ok(user) => Ok(Json(RegisterResponse {
            message: "User created successfully".to_string(),
            user: UserDto::from(user),
        })),
        Err(e) => {
            error!("Failed to register user: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Exchange credentials for a session token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "accounts",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Session token issued", body = LoginResponse),
        (status = 400, description = "Validation error", body = Problem),
        (status = 401, description = "Invalid credentials", body = Problem)
    )
)]
pub async fn login(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Json(req_body): Json<LoginReq>,
) -> Result<Json<LoginResponse>, ProblemResponse> {
    match svc.login(req_body.into()).await {
        Ok((token, user)) => Ok(Json(LoginResponse {
            token,
            user: UserDto::from(user),
        })),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

/// Return the caller's own account.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "accounts",
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Missing or invalid token", body = Problem),
        (status = 404, description = "Account no longer exists", body = Problem)
    )
)]
pub async fn me(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    current: CurrentUser,
) -> Result<Json<UserDto>, ProblemResponse> {
    match svc.get_user(current.id).await {
        Ok(user) => Ok(Json(UserDto::from(user))),
        Err(e) => {
            error!("Failed to load current user {}: {}", current.id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

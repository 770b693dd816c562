use axum::{
    extract::{Path, Query},
    http::Uri,
    response::Json,
    Extension,
};
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

use api_core::problem::Problem;
use api_core::{CurrentUser, PageParams, ProblemResponse};

use crate::api::rest::dto::{
    BrowseQuery, BrowseResponse, CreateProfileReq, ProfileCardDto, ProfileDto, ProfileResponse,
};
use crate::api::rest::error::map_domain_error;
use crate::contract::BrowseCriteria;
use crate::domain::service::Service;

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

/// Create the caller's profile.
#[utoipa::path(
    post,
    path = "/api/profiles",
    tag = "profiles",
    request_body = CreateProfileReq,
    responses(
        (status = 200, description = "Profile created", body = ProfileDto),
        (status = 400, description = "Validation error, duplicate profile or taken nickname", body = Problem),
        (status = 401, description = "Missing or invalid token", body = Problem)
    )
)]
pub async fn create_profile(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    current: CurrentUser,
    Json(req_body): Json<CreateProfileReq>,
) -> Result<Json<ProfileDto>, ProblemResponse> {
    info!("Creating profile for user {}", current.id);

    match svc.create_profile(current.id, req_body.into()).await {
        Ok(profile) => Ok(Json(ProfileDto::from(profile))),
        Err(e) => {
            error!("Failed to create profile: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Browse profiles with filters and pagination.
#[utoipa::path(
    get,
    path = "/api/profiles",
    tag = "profiles",
    params(BrowseQuery),
    responses(
        (status = 200, description = "One page of browsable profiles", body = BrowseResponse),
        (status = 400, description = "Invalid filter", body = Problem),
        (status = 401, description = "Missing or invalid token", body = Problem)
    )
)]
pub async fn browse_profiles(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    _current: CurrentUser,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<BrowseResponse>, ProblemResponse> {
    debug!("Browsing profiles with query: {:?}", query);

    let mut builder = BrowseCriteria::builder();
    if let Some(gender) = query.gender {
        builder = builder.gender(gender);
    }
    if let Some(city) = query.city {
        builder = builder.city(city);
    }
    if let Some(min_age) = query.min_age {
        builder = builder.min_age(min_age);
    }
    if let Some(max_age) = query.max_age {
        builder = builder.max_age(max_age);
    }
    let criteria = builder
        .build()
        .map_err(|e| map_domain_error(&e, uri.path()))?;

    let page = PageParams {
        page: query.page,
        limit: query.limit,
    }
    .resolve(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);

    match svc.browse(criteria, page).await {
        Ok((cards, pagination)) => Ok(Json(BrowseResponse {
            profiles: cards.into_iter().map(ProfileCardDto::from).collect(),
            pagination,
        })),
        Err(e) => {
            error!("Failed to browse profiles: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get a specific profile by ID.
#[utoipa::path(
    get,
    path = "/api/profiles/{id}",
    tag = "profiles",
    params(("id" = Uuid, Path, description = "Profile UUID")),
    responses(
        (status = 200, description = "Profile found", body = ProfileResponse),
        (status = 401, description = "Missing or invalid token", body = Problem),
        (status = 404, description = "Profile not found", body = Problem)
    )
)]
pub async fn get_profile(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    _current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileResponse>, ProblemResponse> {
    match svc.get_profile(id).await {
        Ok(card) => Ok(Json(ProfileResponse {
            profile: ProfileCardDto::from(card),
        })),
        Err(e) => {
            error!("Failed to get profile {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

use axum::{extract::Query, http::Uri, response::Json, Extension};
use std::sync::Arc;
use tracing::{error, info};

use api_core::problem::Problem;
use api_core::{problem, CurrentUser, PageParams, ProblemResponse};

use crate::api::rest::dto::{
    CreateReportReq, CreateReportResponse, ReportDto, ReportWithReporterDto, ReportsQuery,
    ReportsResponse,
};
use crate::api::rest::error::map_domain_error;
use crate::contract::ReportStatus;
use crate::domain::service::Service;

/// The moderation queue pages with a fixed size.
const REPORTS_PAGE_SIZE: u64 = 20;

/// Submit a report against a user, photo or message.
#[utoipa::path(
    post,
    path = "/api/reports",
    tag = "moderation",
    request_body = CreateReportReq,
    responses(
        (status = 200, description = "Report submitted", body = CreateReportResponse),
        (status = 400, description = "Validation error, self-report or duplicate report", body = Problem),
        (status = 401, description = "Missing or invalid token", body = Problem)
    )
)]
pub async fn create_report(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    current: CurrentUser,
    Json(req_body): Json<CreateReportReq>,
) -> Result<Json<CreateReportResponse>, ProblemResponse> {
    info!("User {} submitting report", current.id);

    match svc.create_report(current.id, req_body.into()).await {
        Ok(report) => Ok(Json(CreateReportResponse {
            report: ReportDto::from(report),
            message: "Report submitted successfully".to_string(),
        })),
        Err(e) => {
            error!("Failed to create report: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Moderation queue; MOD/ADMIN only.
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "moderation",
    params(ReportsQuery),
    responses(
        (status = 200, description = "One page of the moderation queue", body = ReportsResponse),
        (status = 400, description = "Unknown report status", body = Problem),
        (status = 401, description = "Missing or invalid token", body = Problem),
        (status = 403, description = "Caller is not MOD/ADMIN", body = Problem)
    )
)]
pub async fn list_reports(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    current: CurrentUser,
    Query(query): Query<ReportsQuery>,
) -> Result<Json<ReportsResponse>, ProblemResponse> {
    current.require_role(&["MOD", "ADMIN"])?;

    let status: ReportStatus = query
        .status
        .as_deref()
        .unwrap_or("OPEN")
        .parse()
        .map_err(|_| problem::bad_request("Unknown report status"))?;

    let page = PageParams {
        page: query.page,
        limit: None,
    }
    .resolve(REPORTS_PAGE_SIZE, REPORTS_PAGE_SIZE);

    match svc.list_reports(status, page).await {
        Ok((reports, pagination)) => Ok(Json(ReportsResponse {
            reports: reports
                .into_iter()
                .map(ReportWithReporterDto::from)
                .collect(),
            pagination,
        })),
        Err(e) => {
            error!("Failed to list reports: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::contract::{NewReport, Report, ReportStatus, ReportWithReporter, TargetType};
use api_core::PageMeta;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportDto {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub target_type: TargetType,
    pub target_id: String,
    pub reason: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportReq {
    pub target_type: TargetType,
    pub target_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateReportResponse {
    pub report: ReportDto,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReporterDto {
    pub id: Uuid,
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportWithReporterDto {
    #[serde(flatten)]
    pub report: ReportDto,
    pub reporter: ReporterDto,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportsQuery {
    pub status: Option<String>,
    pub page: Option<u64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportsResponse {
    pub reports: Vec<ReportWithReporterDto>,
    pub pagination: PageMeta,
}

impl From<Report> for ReportDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            reporter_id: r.reporter_id,
            target_type: r.target_type,
            target_id: r.target_id,
            reason: r.reason,
            status: r.status,
            created_at: r.created_at,
        }
    }
}

impl From<ReportWithReporter> for ReportWithReporterDto {
    fn from(r: ReportWithReporter) -> Self {
        let reporter_id = r.report.reporter_id;
        Self {
            report: ReportDto::from(r.report),
            reporter: ReporterDto {
                id: reporter_id,
                nickname: r.reporter_nickname,
            },
        }
    }
}

impl From<CreateReportReq> for NewReport {
    fn from(req: CreateReportReq) -> Self {
        Self {
            target_type: req.target_type,
            target_id: req.target_id,
            reason: req.reason,
        }
    }
}

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::{AuditEntry, NewReport, Report, ReportStatus, ReportWithReporter, TargetType};
use crate::domain::error::DomainError;
use crate::domain::repo::ModerationRepository;
use api_core::{PageMeta, ResolvedPage};

const MIN_REASON_LEN: usize = 10;
const MAX_REASON_LEN: usize = 500;

const EVENT_REPORT_CREATED: &str = "REPORT_CREATED";

/// Domain service with business rules for content moderation.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn ModerationRepository>,
}

impl Service {
    pub fn new(repo: Arc<dyn ModerationRepository>) -> Self {
        Self { repo }
    }

    #[instrument(
        name = "moderation.service.create_report",
        skip(self, new_report),
        fields(reporter_id = %reporter_id, target_type = %new_report.target_type.as_str())
    )]
    pub async fn create_report(
        &self,
        reporter_id: Uuid,
        new_report: NewReport,
    ) -> Result<Report, DomainError> {
        info!("Creating report");

        let len = new_report.reason.chars().count();
        if !(MIN_REASON_LEN..=MAX_REASON_LEN).contains(&len) {
            return Err(DomainError::validation(
                "reason",
                format!("reason must be {MIN_REASON_LEN}-{MAX_REASON_LEN} characters"),
            ));
        }

        if new_report.target_type == TargetType::User
            && new_report.target_id == reporter_id.to_string()
        {
            return Err(DomainError::SelfReport);
        }

        if self
            .repo
            .open_report_exists(reporter_id, new_report.target_type, &new_report.target_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            return Err(DomainError::DuplicateReport);
        }

        let now = Utc::now();
        let report = Report {
            id: Uuid::new_v4(),
            reporter_id,
            target_type: new_report.target_type,
            target_id: new_report.target_id,
            reason: new_report.reason,
            status: ReportStatus::Open,
            created_at: now,
        };

        let audit = AuditEntry {
            id: Uuid::new_v4(),
            actor_id: reporter_id,
            event_type: EVENT_REPORT_CREATED.to_string(),
            metadata: json!({
                "reportId": report.id,
                "targetType": report.target_type.as_str(),
                "targetId": report.target_id,
                "reason": report.reason,
            }),
            created_at: now,
        };

        self.repo
            .insert_report(report.clone(), audit)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Successfully created report with id={}", report.id);
        Ok(report)
    }

    /// One page of the moderation queue. Role enforcement lives at the
    /// REST layer; this only knows statuses and pages.
    #[instrument(name = "moderation.service.list_reports", skip(self))]
    pub async fn list_reports(
        &self,
        status: ReportStatus,
        page: ResolvedPage,
    ) -> Result<(Vec<ReportWithReporter>, PageMeta), DomainError> {
        debug!("Listing reports with status {}", status.as_str());

        let (reports, total) = self
            .repo
            .list_page(status, page.limit, page.offset())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        Ok((reports, PageMeta::new(page, total)))
    }
}

use crate::contract::{AuditEntry, Report, ReportStatus, ReportWithReporter, TargetType};
use async_trait::async_trait;
use uuid::Uuid;

/// Port for the domain layer: persistence operations the domain needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModerationRepository: Send + Sync {
    /// Does this reporter already have an OPEN/IN_REVIEW report on the target?
    async fn open_report_exists(
        &self,
        reporter_id: Uuid,
        target_type: TargetType,
        target_id: &str,
    ) -> anyhow::Result<bool>;
    /// Insert the report and its audit-trail row atomically.
    async fn insert_report(&self, report: Report, audit: AuditEntry) -> anyhow::Result<()>;
    /// One page of reports with the given status, newest first, with
    /// reporter nicknames, plus the total match count.
    async fn list_page(
        &self,
        status: ReportStatus,
        limit: u64,
        offset: u64,
    ) -> anyhow::Result<(Vec<ReportWithReporter>, u64)>;
}

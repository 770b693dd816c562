//! SeaORM-backed repository implementation for the moderation domain port.

use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use profiles::infra::storage::entity as profile_rows;

use crate::contract::{AuditEntry, Report, ReportStatus, ReportWithReporter, TargetType};
use crate::domain::repo::ModerationRepository;
use crate::infra::storage::entity::{audit_log, reports};

pub struct SeaOrmModerationRepository {
    db: DatabaseConnection,
}

impl SeaOrmModerationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_report(m: reports::Model) -> anyhow::Result<Report> {
    Ok(Report {
        id: m.id,
        reporter_id: m.reporter_id,
        target_type: m
            .target_type
            .parse()
            .map_err(anyhow::Error::msg)
            .context("target_type")?,
        target_id: m.target_id,
        reason: m.reason,
        status: m
            .status
            .parse()
            .map_err(anyhow::Error::msg)
            .context("status")?,
        created_at: m.created_at,
    })
}

#[async_trait::async_trait]
impl ModerationRepository for SeaOrmModerationRepository {
    async fn open_report_exists(
        &self,
        reporter_id: Uuid,
        target_type: TargetType,
        target_id: &str,
    ) -> anyhow::Result<bool> {
        let count = reports::Entity::find()
            .filter(reports::Column::ReporterId.eq(reporter_id))
            .filter(reports::Column::TargetType.eq(target_type.as_str()))
            .filter(reports::Column::TargetId.eq(target_id))
            .filter(
                reports::Column::Status.is_in([
                    ReportStatus::Open.as_str(),
                    ReportStatus::InReview.as_str(),
                ]),
            )
            .count(&self.db)
            .await
            .context("open_report_exists failed")?;
        Ok(count > 0)
    }

    async fn insert_report(&self, report: Report, audit: AuditEntry) -> anyhow::Result<()> {
        let txn = self.db.begin().await.context("insert_report: begin failed")?;

        let report_row = reports::ActiveModel {
            id: Set(report.id),
            reporter_id: Set(report.reporter_id),
            target_type: Set(report.target_type.as_str().to_string()),
            target_id: Set(report.target_id),
            reason: Set(report.reason),
            status: Set(report.status.as_str().to_string()),
            created_at: Set(report.created_at),
        };
        let _ = report_row
            .insert(&txn)
            .await
            .context("insert_report: report insert failed")?;

        let audit_row = audit_log::ActiveModel {
            id: Set(audit.id),
            actor_id: Set(audit.actor_id),
            event_type: Set(audit.event_type),
            metadata: Set(audit.metadata.to_string()),
            created_at: Set(audit.created_at),
        };
        let _ = audit_row
            .insert(&txn)
            .await
            .context("insert_report: audit insert failed")?;

        txn.commit().await.context("insert_report: commit failed")?;
        Ok(())
    }

    async fn list_page(
        &self,
        status: ReportStatus,
        limit: u64,
        offset: u64,
    ) -> anyhow::Result<(Vec<ReportWithReporter>, u64)> {
        let base = reports::Entity::find().filter(reports::Column::Status.eq(status.as_str()));

        let total = base
            .clone()
            .count(&self.db)
            .await
            .context("report count failed")?;

        let rows = base
            .order_by_desc(reports::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .context("report page failed")?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let report = model_to_report(row)?;
            let reporter_nickname = profile_rows::Entity::find()
                .filter(profile_rows::Column::UserId.eq(report.reporter_id))
                .one(&self.db)
                .await
                .context("reporter nickname lookup failed")?
                .map(|p| p.nickname);
            out.push(ReportWithReporter {
                report,
                reporter_nickname,
            });
        }
        Ok((out, total))
    }
}

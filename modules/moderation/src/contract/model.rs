use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum TargetType {
    User,
    Photo,
    Message,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::User => "USER",
            TargetType::Photo => "PHOTO",
            TargetType::Message => "MESSAGE",
        }
    }
}

impl FromStr for TargetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(TargetType::User),
            "PHOTO" => Ok(TargetType::Photo),
            "MESSAGE" => Ok(TargetType::Message),
            other => Err(format!("unknown target type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Open,
    InReview,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Open => "OPEN",
            ReportStatus::InReview => "IN_REVIEW",
            ReportStatus::Resolved => "RESOLVED",
            ReportStatus::Dismissed => "DISMISSED",
        }
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(ReportStatus::Open),
            "IN_REVIEW" => Ok(ReportStatus::InReview),
            "RESOLVED" => Ok(ReportStatus::Resolved),
            "DISMISSED" => Ok(ReportStatus::Dismissed),
            other => Err(format!("unknown report status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub target_type: TargetType,
    /// Opaque id of the reported entity (user, photo or message).
    pub target_id: String,
    pub reason: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReport {
    pub target_type: TargetType,
    pub target_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportWithReporter {
    pub report: Report,
    pub reporter_nickname: Option<String>,
}

/// One moderation audit trail row.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub event_type: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_string_roundtrips() {
        for status in [
            ReportStatus::Open,
            ReportStatus::InReview,
            ReportStatus::Resolved,
            ReportStatus::Dismissed,
        ] {
            assert_eq!(status.as_str().parse::<ReportStatus>().unwrap(), status);
        }
        assert!("CLOSED".parse::<ReportStatus>().is_err());
    }

    #[test]
    fn in_review_serializes_snake_upper() {
        let json = serde_json::to_string(&ReportStatus::InReview).unwrap();
        assert_eq!(json, r#""IN_REVIEW""#);
    }
}

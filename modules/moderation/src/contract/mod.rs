pub mod model;

pub use model::{AuditEntry, NewReport, Report, ReportStatus, ReportWithReporter, TargetType};

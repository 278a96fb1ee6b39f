use poem_openapi::Object;

use crate::types::db::audit_log;
use crate::types::internal::audit::AnomalyReport;

/// One audit trail entry as exposed to compliance reviewers
#[derive(Object, Debug)]
pub struct AuditEntryResponse {
    pub id: i64,
    /// None for events without a resolvable actor
    pub user_id: Option<String>,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub description: String,
    /// JSON-encoded structured metadata
    pub metadata: Option<String>,
    pub timestamp: i64,
}

impl From<audit_log::Model> for AuditEntryResponse {
    fn from(model: audit_log::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            action: model.action,
            entity_type: model.entity_type,
            entity_id: model.entity_id,
            ip_address: model.ip_address,
            user_agent: model.user_agent,
            description: model.description,
            metadata: model.metadata,
            timestamp: model.timestamp,
        }
    }
}

/// Ordered audit trail, newest first
#[derive(Object, Debug)]
pub struct AuditTrailResponse {
    pub entries: Vec<AuditEntryResponse>,
}

/// Advisory anomaly report over a user's recent activity
#[derive(Object, Debug)]
pub struct AnomalyReportResponse {
    pub suspicious: bool,
    pub reasons: Vec<String>,
}

impl From<AnomalyReport> for AnomalyReportResponse {
    fn from(report: AnomalyReport) -> Self {
        Self {
            suspicious: report.suspicious,
            reasons: report.reasons,
        }
    }
}

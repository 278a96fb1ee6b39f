use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::types::db::audit_log;
use crate::types::internal::audit::{AnomalyReport, AuditAction, AuditEntry};

const EXCESSIVE_VIEWS_24H: u64 = 100;
const FAILED_LOGINS_1H: u64 = 5;

/// Repository for the append-only audit trail.
///
/// Rows are never updated or deleted here; the compliance requirement is
/// that accounting-of-disclosures stays reconstructable.
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append one audit entry.
    ///
    /// Callers that must not fail on audit errors go through
    /// `AuditLogger::record`, which swallows the result.
    pub async fn append(&self, entry: AuditEntry) -> Result<(), InternalError> {
        let metadata = entry
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let row = audit_log::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            user_id: Set(entry.user_id),
            action: Set(entry.action.as_str().to_string()),
            entity_type: Set(entry.entity_type),
            entity_id: Set(entry.entity_id),
            ip_address: Set(entry.ip_address),
            user_agent: Set(entry.user_agent),
            description: Set(entry.description),
            metadata: Set(metadata),
            timestamp: Set(Utc::now().timestamp()),
        };

        row.insert(&self.db)
            .await
            .map_err(|e| InternalError::database("append_audit_log", e))?;

        Ok(())
    }

    /// Audit trail for one entity, newest first.
    ///
    /// Supports accounting-of-disclosures requests for PHI records.
    pub async fn query_by_entity(
        &self,
        entity_type: &str,
        entity_id: &str,
        from: Option<i64>,
        to: Option<i64>,
    ) -> Result<Vec<audit_log::Model>, InternalError> {
        let mut query = audit_log::Entity::find()
            .filter(audit_log::Column::EntityType.eq(entity_type))
            .filter(audit_log::Column::EntityId.eq(entity_id));

        if let Some(from) = from {
            query = query.filter(audit_log::Column::Timestamp.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(audit_log::Column::Timestamp.lte(to));
        }

        query
            .order_by_desc(audit_log::Column::Timestamp)
            .order_by_desc(audit_log::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("query_audit_by_entity", e))
    }

    /// Audit trail for one acting user, newest first
    pub async fn query_by_user(
        &self,
        user_id: &str,
        from: Option<i64>,
        to: Option<i64>,
    ) -> Result<Vec<audit_log::Model>, InternalError> {
        let mut query = audit_log::Entity::find().filter(audit_log::Column::UserId.eq(user_id));

        if let Some(from) = from {
            query = query.filter(audit_log::Column::Timestamp.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(audit_log::Column::Timestamp.lte(to));
        }

        query
            .order_by_desc(audit_log::Column::Timestamp)
            .order_by_desc(audit_log::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("query_audit_by_user", e))
    }

    async fn count_by_action_since(
        &self,
        user_id: &str,
        action: AuditAction,
        since: i64,
    ) -> Result<u64, InternalError> {
        audit_log::Entity::find()
            .filter(audit_log::Column::UserId.eq(user_id))
            .filter(audit_log::Column::Action.eq(action.as_str()))
            .filter(audit_log::Column::Timestamp.gte(since))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_audit_by_action", e))
    }

    /// Heuristic check over a user's recent activity.
    ///
    /// Advisory only; takes no enforcement action.
    pub async fn detect_anomalies(&self, user_id: &str) -> Result<AnomalyReport, InternalError> {
        let now = Utc::now().timestamp();
        let mut reasons = Vec::new();

        let views = self
            .count_by_action_since(user_id, AuditAction::ViewPatient, now - 24 * 60 * 60)
            .await?;
        if views > EXCESSIVE_VIEWS_24H {
            reasons.push(format!(
                "Excessive patient record access: {views} views in 24 hours"
            ));
        }

        let failed_logins = self
            .count_by_action_since(user_id, AuditAction::FailedLogin, now - 60 * 60)
            .await?;
        if failed_logins > FAILED_LOGINS_1H {
            reasons.push(format!(
                "Multiple failed login attempts: {failed_logins} in the last hour"
            ));
        }

        Ok(AnomalyReport {
            suspicious: !reasons.is_empty(),
            reasons,
        })
    }
}

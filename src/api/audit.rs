use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::guard::{AccessGate, AUDIT_REVIEWERS};
use crate::errors::ApiError;
use crate::stores::AuditStore;
use crate::types::dto::audit::{AnomalyReportResponse, AuditEntryResponse, AuditTrailResponse};

/// Compliance review endpoints over the audit trail
pub struct AuditApi {
    audit_store: Arc<AuditStore>,
    gate: Arc<AccessGate>,
}

#[derive(Tags)]
enum AuditTags {
    /// Audit trail review
    Audit,
}

impl AuditApi {
    pub fn new(audit_store: Arc<AuditStore>, gate: Arc<AccessGate>) -> Self {
        Self { audit_store, gate }
    }
}

#[OpenApi(prefix_path = "/audit")]
impl AuditApi {
    /// Accounting of disclosures for one entity, newest first
    #[oai(
        path = "/entity/:entity_type/:entity_id",
        method = "get",
        tag = "AuditTags::Audit"
    )]
    async fn entity_trail(
        &self,
        req: &Request,
        entity_type: Path<String>,
        entity_id: Path<String>,
        from: Query<Option<i64>>,
        to: Query<Option<i64>>,
    ) -> Result<Json<AuditTrailResponse>, ApiError> {
        self.gate.require(req, AUDIT_REVIEWERS, "audit trail").await?;

        let entries = self
            .audit_store
            .query_by_entity(&entity_type.0, &entity_id.0, from.0, to.0)
            .await?;

        Ok(Json(AuditTrailResponse {
            entries: entries.into_iter().map(AuditEntryResponse::from).collect(),
        }))
    }

    /// Access review for one user, newest first
    #[oai(path = "/user/:user_id", method = "get", tag = "AuditTags::Audit")]
    async fn user_trail(
        &self,
        req: &Request,
        user_id: Path<String>,
        from: Query<Option<i64>>,
        to: Query<Option<i64>>,
    ) -> Result<Json<AuditTrailResponse>, ApiError> {
        self.gate.require(req, AUDIT_REVIEWERS, "audit trail").await?;

        let entries = self
            .audit_store
            .query_by_user(&user_id.0, from.0, to.0)
            .await?;

        Ok(Json(AuditTrailResponse {
            entries: entries.into_iter().map(AuditEntryResponse::from).collect(),
        }))
    }

    /// Advisory anomaly report over a user's recent activity
    #[oai(path = "/anomalies/:user_id", method = "get", tag = "AuditTags::Audit")]
    async fn anomalies(
        &self,
        req: &Request,
        user_id: Path<String>,
    ) -> Result<Json<AnomalyReportResponse>, ApiError> {
        self.gate.require(req, AUDIT_REVIEWERS, "anomaly report").await?;

        let report = self.audit_store.detect_anomalies(&user_id.0).await?;

        Ok(Json(AnomalyReportResponse::from(report)))
    }
}

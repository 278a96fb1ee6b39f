use serde_json::json;
use std::sync::Arc;

use crate::stores::AuditStore;
use crate::types::internal::audit::{AuditAction, AuditEntry};
use crate::types::internal::context::ClientMeta;

/// Fire-and-forget front end over the audit store.
///
/// Every emitter swallows storage errors after reporting them through
/// `tracing`; the calling operation's success never depends on the audit
/// write landing.
pub struct AuditLogger {
    store: Arc<AuditStore>,
}

impl AuditLogger {
    pub fn new(store: Arc<AuditStore>) -> Self {
        Self { store }
    }

    /// Append an entry, discarding any storage error
    pub async fn record(&self, entry: AuditEntry) {
        if let Err(err) = self.store.append(entry).await {
            tracing::error!(error = %err, "failed to write audit log entry");
        }
    }

    pub async fn login_success(&self, user_id: &str, meta: &ClientMeta) {
        self.record(
            AuditEntry::new(AuditAction::Login, "User logged in successfully")
                .actor(user_id)
                .client(meta),
        )
        .await;
    }

    /// Failed login, durably recorded even when the email does not resolve
    /// to a user (`user_id` is None in that case).
    pub async fn login_failure(
        &self,
        user_id: Option<&str>,
        attempted_email: &str,
        reason: &str,
        meta: &ClientMeta,
    ) {
        let mut entry = AuditEntry::new(
            AuditAction::FailedLogin,
            format!("Failed login attempt: {reason}"),
        )
        .client(meta)
        .metadata(json!({
            "attempted_email": attempted_email,
            "reason": reason,
        }));
        if let Some(user_id) = user_id {
            entry = entry.actor(user_id);
        }
        self.record(entry).await;
    }

    pub async fn logout(&self, user_id: &str, meta: &ClientMeta) {
        self.record(
            AuditEntry::new(AuditAction::Logout, "User logged out")
                .actor(user_id)
                .client(meta),
        )
        .await;
    }

    pub async fn token_refresh(&self, user_id: &str, meta: &ClientMeta) {
        self.record(
            AuditEntry::new(AuditAction::TokenRefresh, "Access token refreshed")
                .actor(user_id)
                .client(meta),
        )
        .await;
    }

    pub async fn user_registered(&self, new_user_id: &str, email: &str, meta: &ClientMeta) {
        self.record(
            AuditEntry::new(
                AuditAction::RegisterUser,
                format!("New user registered: {email}"),
            )
            .entity("User", new_user_id)
            .client(meta),
        )
        .await;
    }

    pub async fn unauthorized_access(&self, user_id: &str, resource: &str, meta: &ClientMeta) {
        self.record(
            AuditEntry::new(
                AuditAction::UnauthorizedAccess,
                format!("Unauthorized access attempt to {resource}"),
            )
            .actor(user_id)
            .client(meta)
            .metadata(json!({ "resource": resource })),
        )
        .await;
    }

    /// Patient record access: view, edit, create, deactivate
    pub async fn patient_access(
        &self,
        user_id: &str,
        action: AuditAction,
        patient_id: &str,
        description: impl Into<String>,
        meta: &ClientMeta,
    ) {
        self.entity_access(user_id, action, "Patient", patient_id, description, meta)
            .await;
    }

    /// Access to any PHI-bearing entity
    pub async fn entity_access(
        &self,
        user_id: &str,
        action: AuditAction,
        entity_type: &str,
        entity_id: &str,
        description: impl Into<String>,
        meta: &ClientMeta,
    ) {
        self.record(
            AuditEntry::new(action, description)
                .actor(user_id)
                .entity(entity_type, entity_id)
                .client(meta),
        )
        .await;
    }
}

use std::fmt;

use crate::types::internal::context::ClientMeta;

/// Actions recorded in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Login,
    Logout,
    FailedLogin,
    TokenRefresh,
    RegisterUser,
    CreatePatient,
    ViewPatient,
    EditPatient,
    DeletePatient,
    CreateAppointment,
    ViewAppointment,
    CreatePrescription,
    ViewPrescription,
    RecordVitals,
    ViewVitals,
    CreateProvider,
    ViewProvider,
    CreateAllergy,
    CreateMedication,
    UnauthorizedAccess,
}

impl AuditAction {
    /// String form used for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::Logout => "LOGOUT",
            Self::FailedLogin => "FAILED_LOGIN",
            Self::TokenRefresh => "TOKEN_REFRESH",
            Self::RegisterUser => "REGISTER_USER",
            Self::CreatePatient => "CREATE_PATIENT",
            Self::ViewPatient => "VIEW_PATIENT",
            Self::EditPatient => "EDIT_PATIENT",
            Self::DeletePatient => "DELETE_PATIENT",
            Self::CreateAppointment => "CREATE_APPOINTMENT",
            Self::ViewAppointment => "VIEW_APPOINTMENT",
            Self::CreatePrescription => "CREATE_PRESCRIPTION",
            Self::ViewPrescription => "VIEW_PRESCRIPTION",
            Self::RecordVitals => "RECORD_VITALS",
            Self::ViewVitals => "VIEW_VITALS",
            Self::CreateProvider => "CREATE_PROVIDER",
            Self::ViewProvider => "VIEW_PROVIDER",
            Self::CreateAllergy => "CREATE_ALLERGY",
            Self::CreateMedication => "CREATE_MEDICATION",
            Self::UnauthorizedAccess => "UNAUTHORIZED_ACCESS",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single audit trail entry, built by the emitters in
/// `services::audit_logger` and appended by `stores::AuditStore`.
///
/// `user_id` is optional so that events without a resolvable actor
/// (failed logins for unknown emails) are still durably recorded.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub user_id: Option<String>,
    pub action: AuditAction,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub description: String,
    pub metadata: Option<serde_json::Value>,
}

impl AuditEntry {
    pub fn new(action: AuditAction, description: impl Into<String>) -> Self {
        Self {
            user_id: None,
            action,
            entity_type: None,
            entity_id: None,
            ip_address: None,
            user_agent: None,
            description: description.into(),
            metadata: None,
        }
    }

    pub fn actor(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn entity(mut self, entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn client(mut self, meta: &ClientMeta) -> Self {
        self.ip_address = meta.ip_address.clone();
        self.user_agent = meta.user_agent.clone();
        self
    }

    pub fn metadata(mut self, value: serde_json::Value) -> Self {
        self.metadata = Some(value);
        self
    }
}

/// Result of the advisory anomaly heuristics over a user's recent activity
#[derive(Debug, Clone)]
pub struct AnomalyReport {
    pub suspicious: bool,
    pub reasons: Vec<String>,
}

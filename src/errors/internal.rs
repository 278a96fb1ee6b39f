use sea_orm::DbErr;

/// Errors raised below the API boundary (stores and services).
///
/// The API layer maps these onto `ApiError`; nothing here is rendered to a
/// client verbatim.
#[derive(Debug, thiserror::Error)]
pub enum InternalError {
    #[error("database error during {operation}: {source}")]
    Database {
        operation: &'static str,
        source: DbErr,
    },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("unique constraint violated on {field}")]
    UniqueViolation { field: &'static str },

    #[error("crypto error: {0}")]
    Crypto(String),

    #[error("token error: {0}")]
    Token(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl InternalError {
    pub fn database(operation: &'static str, source: DbErr) -> Self {
        Self::Database { operation, source }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// Outcomes of a login attempt that are not plain success
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account locked, retry in {minutes_remaining} minutes")]
    Locked { minutes_remaining: i64 },

    #[error("mfa token required")]
    MfaRequired,

    #[error("account deactivated")]
    Deactivated,

    #[error(transparent)]
    Internal(#[from] InternalError),
}

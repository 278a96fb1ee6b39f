use poem_openapi::{payload::Json, ApiResponse, Object};

use crate::errors::internal::{InternalError, LoginError};

/// Standardized error response body
#[derive(Object, Debug)]
pub struct ErrorBody {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Itemized details, populated for validation failures
    pub details: Option<Vec<String>>,

    /// Set to true when the account requires an MFA token to log in
    pub requires_mfa: Option<bool>,
}

impl ErrorBody {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            details: None,
            requires_mfa: None,
        }
    }
}

/// Error taxonomy shared by all API endpoints
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Malformed input against the request schema
    #[oai(status = 400)]
    Validation(Json<ErrorBody>),

    /// Missing, invalid, or expired credentials
    #[oai(status = 401)]
    Unauthenticated(Json<ErrorBody>),

    /// Valid credentials, disallowed role or deactivated account
    #[oai(status = 403)]
    Forbidden(Json<ErrorBody>),

    /// Entity does not exist
    #[oai(status = 404)]
    NotFound(Json<ErrorBody>),

    /// State conflict, e.g. double-booked slot or duplicate email
    #[oai(status = 409)]
    Conflict(Json<ErrorBody>),

    /// Account locked out after repeated failures
    #[oai(status = 429)]
    Locked(Json<ErrorBody>),

    /// Unhandled failure; detail stays server-side
    #[oai(status = 500)]
    Internal(Json<ErrorBody>),
}

impl ApiError {
    pub fn validation(violations: Vec<String>) -> Self {
        let mut body = ErrorBody::new("validation_failed", "Validation failed");
        body.details = Some(violations);
        ApiError::Validation(Json(body))
    }

    pub fn unauthenticated() -> Self {
        ApiError::Unauthenticated(Json(ErrorBody::new("unauthenticated", "Invalid credentials")))
    }

    pub fn mfa_required() -> Self {
        let mut body = ErrorBody::new("mfa_required", "MFA token required");
        body.requires_mfa = Some(true);
        ApiError::Unauthenticated(Json(body))
    }

    pub fn forbidden() -> Self {
        ApiError::Forbidden(Json(ErrorBody::new("forbidden", "Insufficient permissions")))
    }

    pub fn deactivated() -> Self {
        ApiError::Forbidden(Json(ErrorBody::new(
            "account_deactivated",
            "Account is deactivated",
        )))
    }

    pub fn not_found(entity: &str) -> Self {
        ApiError::NotFound(Json(ErrorBody::new("not_found", format!("{entity} not found"))))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(Json(ErrorBody::new("conflict", message)))
    }

    pub fn locked(minutes_remaining: i64) -> Self {
        ApiError::Locked(Json(ErrorBody::new(
            "account_locked",
            format!("Account locked. Try again in {minutes_remaining} minutes"),
        )))
    }

    pub fn internal() -> Self {
        ApiError::Internal(Json(ErrorBody::new("internal", "Internal server error")))
    }
}

impl From<InternalError> for ApiError {
    fn from(err: InternalError) -> Self {
        match err {
            InternalError::NotFound { entity, .. } => ApiError::not_found(entity),
            InternalError::UniqueViolation { field } => {
                ApiError::conflict(format!("{field} already exists"))
            }
            other => {
                tracing::error!(error = %other, "internal error");
                ApiError::internal()
            }
        }
    }
}

impl From<LoginError> for ApiError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::InvalidCredentials => ApiError::unauthenticated(),
            LoginError::Locked { minutes_remaining } => ApiError::locked(minutes_remaining),
            LoginError::MfaRequired => ApiError::mfa_required(),
            LoginError::Deactivated => ApiError::deactivated(),
            LoginError::Internal(inner) => inner.into(),
        }
    }
}

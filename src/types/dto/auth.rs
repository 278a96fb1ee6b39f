use poem_openapi::Object;

use crate::types::internal::auth::Role;

/// Request model for staff registration
#[derive(Object, Debug)]
pub struct RegisterRequest {
    /// Email used as the login identifier
    #[oai(validator(max_length = 255, pattern = r"^[^\s@]+@[^\s@]+\.[^\s@]+$"))]
    pub email: String,

    /// Plaintext password, checked against the strength policy
    #[oai(validator(max_length = 128))]
    pub password: String,

    /// Staff role for the new account
    pub role: Role,
}

/// Request model for login
#[derive(Object, Debug)]
pub struct LoginRequest {
    #[oai(validator(max_length = 255))]
    pub email: String,

    #[oai(validator(max_length = 128))]
    pub password: String,

    /// One-time code, required when the account has MFA enabled
    pub mfa_token: Option<String>,
}

/// Caller-visible summary of an authenticated user
#[derive(Object, Debug)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub role: Role,
    /// From the linked provider profile; empty when none exists
    pub first_name: String,
    pub last_name: String,
}

/// Response model for successful login
#[derive(Object, Debug)]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserSummary,
}

/// Response model for successful registration
#[derive(Object, Debug)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserSummary,
}

/// Request model for token refresh; falls back to the refresh cookie
#[derive(Object, Debug)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Response model for token refresh
#[derive(Object, Debug)]
pub struct RefreshResponse {
    pub success: bool,
}

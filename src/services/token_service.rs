use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;
use uuid::Uuid;

use crate::config::SecuritySettings;
use crate::errors::InternalError;
use crate::services::crypto;
use crate::types::db::user;
use crate::types::internal::auth::{Claims, Role};

/// Why a presented token failed validation
#[derive(Debug, thiserror::Error)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token is invalid")]
    Invalid,
}

/// Issues and validates the signed tokens that carry identity and role
/// claims.
///
/// Secrets are injected at construction from `SecuritySettings`; nothing
/// here reads the environment at call time.
pub struct TokenService {
    jwt_secret: String,
    session_token_secret: String,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenService {
    pub fn new(settings: &SecuritySettings) -> Self {
        Self {
            jwt_secret: settings.jwt_secret.clone(),
            session_token_secret: settings.session_token_secret.clone(),
            access_ttl_secs: settings.access_token_ttl_secs(),
            refresh_ttl_secs: settings.refresh_token_ttl_secs(),
        }
    }

    /// Issue an access token for the user.
    ///
    /// # Returns
    /// * `(token, jti)` - The encoded JWT and its token identifier
    pub fn issue_access_token(&self, user: &user::Model) -> Result<(String, String), InternalError> {
        self.issue(user, self.access_ttl_secs)
    }

    /// Issue a refresh token for the user
    pub fn issue_refresh_token(&self, user: &user::Model) -> Result<(String, String), InternalError> {
        self.issue(user, self.refresh_ttl_secs)
    }

    fn issue(&self, user: &user::Model, ttl_secs: i64) -> Result<(String, String), InternalError> {
        let role = Role::parse(&user.role)
            .ok_or_else(|| InternalError::Token(format!("unknown role: {}", user.role)))?;

        let now = Utc::now().timestamp();
        let jti = Uuid::new_v4().to_string();
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role,
            jti: jti.clone(),
            iat: now,
            exp: now + ttl_secs,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| InternalError::Token(format!("failed to sign token: {e}")))?;

        Ok((token, jti))
    }

    /// Validate a token and return its claims.
    ///
    /// Expired, malformed, and wrongly-signed tokens all fail; the gate
    /// treats every failure as unauthenticated.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenValidationError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenValidationError::Expired,
            _ => TokenValidationError::Invalid,
        })?;

        Ok(token_data.claims)
    }

    /// Keyed digest of a token for session storage and lookup
    pub fn digest(&self, token: &str) -> String {
        crypto::token_digest(&self.session_token_secret, token)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("session_token_secret", &"<redacted>")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_settings() -> SecuritySettings {
        SecuritySettings {
            jwt_secret: "test-jwt-secret-minimum-32-characters-long".to_string(),
            session_token_secret: "test-session-secret-minimum-32-chars".to_string(),
            field_encryption_key: "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=".to_string(),
            access_token_ttl_hours: 8,
            refresh_token_ttl_days: 7,
            max_login_attempts: 5,
            lockout_minutes: 30,
            secure_cookies: false,
        }
    }

    fn test_user() -> user::Model {
        user::Model {
            id: Uuid::new_v4().to_string(),
            email: "doctor@clinic.test".to_string(),
            password_hash: "unused".to_string(),
            role: "DOCTOR".to_string(),
            is_active: true,
            mfa_enabled: false,
            failed_login_attempts: 0,
            locked_until: None,
            last_login: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn issued_access_token_validates_and_carries_claims() {
        let service = TokenService::new(&test_settings());
        let user = test_user();

        let (token, jti) = service.issue_access_token(&user).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, Role::Doctor);
        assert_eq!(claims.jti, jti);
    }

    #[test]
    fn access_token_expires_in_eight_hours() {
        let service = TokenService::new(&test_settings());
        let (token, _) = service.issue_access_token(&test_user()).unwrap();
        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 8 * 60 * 60);
    }

    #[test]
    fn refresh_token_expires_in_seven_days() {
        let service = TokenService::new(&test_settings());
        let (token, _) = service.issue_refresh_token(&test_user()).unwrap();
        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn validation_fails_with_wrong_secret() {
        let service = TokenService::new(&test_settings());
        let mut other_settings = test_settings();
        other_settings.jwt_secret = "different-jwt-secret-at-least-32-chars!".to_string();
        let other = TokenService::new(&other_settings);

        let (token, _) = service.issue_access_token(&test_user()).unwrap();

        assert!(matches!(
            other.validate(&token),
            Err(TokenValidationError::Invalid)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let settings = test_settings();
        let service = TokenService::new(&settings);

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "user-1".to_string(),
            email: "doctor@clinic.test".to_string(),
            role: Role::Doctor,
            jti: "jti-1".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.validate(&token),
            Err(TokenValidationError::Expired)
        ));
    }

    #[test]
    fn malformed_token_is_rejected() {
        let service = TokenService::new(&test_settings());
        assert!(matches!(
            service.validate("not.a.jwt"),
            Err(TokenValidationError::Invalid)
        ));
    }

    #[test]
    fn unknown_role_cannot_be_issued_a_token() {
        let service = TokenService::new(&test_settings());
        let mut user = test_user();
        user.role = "JANITOR".to_string();
        assert!(service.issue_access_token(&user).is_err());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let service = TokenService::new(&test_settings());
        let debug = format!("{:?}", service);
        assert!(!debug.contains("test-jwt-secret"));
        assert!(!debug.contains("test-session-secret"));
        assert_eq!(debug.matches("<redacted>").count(), 2);
    }
}

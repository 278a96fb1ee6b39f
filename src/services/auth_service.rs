use chrono::Utc;
use std::sync::Arc;

use crate::config::SecuritySettings;
use crate::errors::{InternalError, LoginError};
use crate::services::{credential, AuditLogger, TokenService};
use crate::stores::session_store::NewSession;
use crate::stores::{ProviderStore, SessionStore, UserStore};
use crate::types::db::{provider, user};
use crate::types::internal::context::ClientMeta;

/// Outcome of a successful login
#[derive(Debug)]
pub struct LoginSuccess {
    pub user: user::Model,
    /// Linked provider profile, used for display names
    pub provider: Option<provider::Model>,
    pub access_token: String,
    pub refresh_token: String,
}

/// Outcome of a successful token refresh
#[derive(Debug)]
pub struct RefreshSuccess {
    pub user_id: String,
    pub access_token: String,
}

/// Orchestrates login, logout, and refresh flows across the credential
/// check, lockout policy, token service, session store, and audit logger.
pub struct AuthService {
    user_store: Arc<UserStore>,
    session_store: Arc<SessionStore>,
    provider_store: Arc<ProviderStore>,
    token_service: Arc<TokenService>,
    audit_logger: Arc<AuditLogger>,
    max_login_attempts: i32,
    lockout_secs: i64,
    access_token_ttl_secs: i64,
}

impl AuthService {
    pub fn new(
        user_store: Arc<UserStore>,
        session_store: Arc<SessionStore>,
        provider_store: Arc<ProviderStore>,
        token_service: Arc<TokenService>,
        audit_logger: Arc<AuditLogger>,
        settings: &SecuritySettings,
    ) -> Self {
        Self {
            user_store,
            session_store,
            provider_store,
            token_service,
            audit_logger,
            max_login_attempts: settings.max_login_attempts,
            lockout_secs: settings.lockout_minutes * 60,
            access_token_ttl_secs: settings.access_token_ttl_secs(),
        }
    }

    /// Complete login flow: lockout policy, credential verification, MFA
    /// and active-flag checks, token issuance, session creation, and audit
    /// logging.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        mfa_token: Option<&str>,
        meta: &ClientMeta,
    ) -> Result<LoginSuccess, LoginError> {
        let user = match self.user_store.find_by_email(email).await? {
            Some(user) => user,
            None => {
                tracing::warn!(email, "login attempt for unknown email");
                self.audit_logger
                    .login_failure(None, email, "User not found", meta)
                    .await;
                return Err(LoginError::InvalidCredentials);
            }
        };

        // Locked accounts are rejected before the password is checked and
        // without incrementing the counter further.
        let now = Utc::now().timestamp();
        if let Some(locked_until) = user.locked_until {
            if locked_until > now {
                let minutes_remaining = (locked_until - now + 59) / 60;
                self.audit_logger
                    .login_failure(Some(&user.id), email, "Account locked", meta)
                    .await;
                return Err(LoginError::Locked { minutes_remaining });
            }
        }

        if !credential::verify_password(password, &user.password_hash) {
            let attempts = self
                .user_store
                .record_failed_attempt(&user.id, self.max_login_attempts, self.lockout_secs)
                .await?;
            tracing::warn!(email, attempts, "login attempt with invalid password");
            self.audit_logger
                .login_failure(Some(&user.id), email, "Invalid password", meta)
                .await;
            return Err(LoginError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(LoginError::Deactivated);
        }

        if user.mfa_enabled && mfa_token.is_none() {
            return Err(LoginError::MfaRequired);
        }
        // TODO: verify mfa_token against the account's TOTP secret once
        // enrollment is implemented; until then a present token is accepted.

        self.user_store.record_successful_login(&user.id).await?;

        let (access_token, _jti) = self.token_service.issue_access_token(&user)?;
        let (refresh_token, _) = self.token_service.issue_refresh_token(&user)?;

        self.session_store
            .create(NewSession {
                token_hash: self.token_service.digest(&access_token),
                refresh_token_hash: self.token_service.digest(&refresh_token),
                user_id: user.id.clone(),
                ip_address: meta.ip_address.clone(),
                user_agent: meta.user_agent.clone(),
                expires_at: now + self.access_token_ttl_secs,
            })
            .await?;

        self.audit_logger.login_success(&user.id, meta).await;

        let provider = self.provider_store.find_by_user_id(&user.id).await?;

        Ok(LoginSuccess {
            user,
            provider,
            access_token,
            refresh_token,
        })
    }

    /// Delete the session matching the presented token digest.
    ///
    /// The signed token itself stays cryptographically valid until expiry;
    /// removing the session row is what makes the gate reject it.
    pub async fn logout(
        &self,
        user_id: &str,
        token_digest: &str,
        meta: &ClientMeta,
    ) -> Result<(), InternalError> {
        self.session_store.delete_by_token_hash(token_digest).await?;
        self.audit_logger.logout(user_id, meta).await;
        Ok(())
    }

    /// Exchange a refresh token for a fresh access token.
    ///
    /// Requires both a valid refresh JWT and a live session row; the
    /// session's access digest is rotated to the new token.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        meta: &ClientMeta,
    ) -> Result<RefreshSuccess, LoginError> {
        let claims = self
            .token_service
            .validate(refresh_token)
            .map_err(|_| LoginError::InvalidCredentials)?;

        let refresh_digest = self.token_service.digest(refresh_token);
        let session = self
            .session_store
            .find_by_refresh_hash(&refresh_digest)
            .await?
            .ok_or(LoginError::InvalidCredentials)?;

        let user = self
            .user_store
            .find_by_id(&session.user_id)
            .await?
            .ok_or(LoginError::InvalidCredentials)?;

        if !user.is_active {
            return Err(LoginError::Deactivated);
        }
        if user.id != claims.sub {
            return Err(LoginError::InvalidCredentials);
        }

        let (access_token, _jti) = self.token_service.issue_access_token(&user)?;
        let new_expiry = Utc::now().timestamp() + self.access_token_ttl_secs;
        self.session_store
            .rotate_access_token(
                &refresh_digest,
                &self.token_service.digest(&access_token),
                new_expiry,
            )
            .await?;

        self.audit_logger.token_refresh(&user.id, meta).await;

        Ok(RefreshSuccess {
            user_id: user.id,
            access_token,
        })
    }
}

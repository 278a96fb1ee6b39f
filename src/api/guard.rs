use chrono::Utc;
use poem::http::header;
use poem::Request;
use std::sync::Arc;

use crate::errors::ApiError;
use crate::services::{AuditLogger, TokenService};
use crate::stores::SessionStore;
use crate::types::internal::auth::{Claims, Role};
use crate::types::internal::context::ClientMeta;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Patient and appointment read/write
pub const CLINICAL_STAFF: &[Role] = &[
    Role::SuperAdmin,
    Role::Admin,
    Role::Doctor,
    Role::Nurse,
    Role::Receptionist,
];

/// Prescription creation
pub const PRESCRIBERS: &[Role] = &[Role::SuperAdmin, Role::Doctor];

/// Vitals and chart-data recording
pub const VITALS_RECORDERS: &[Role] = &[Role::SuperAdmin, Role::Admin, Role::Doctor, Role::Nurse];

/// Audit trail review and anomaly reports
pub const AUDIT_REVIEWERS: &[Role] = &[Role::SuperAdmin, Role::Admin];

/// Provider profile administration
pub const USER_ADMINS: &[Role] = &[Role::SuperAdmin, Role::Admin];

/// The authenticated caller of a protected request
pub struct AuthedCaller {
    pub claims: Claims,
    /// Digest of the presented token; logout deletes the matching session
    pub token_digest: String,
}

/// Per-request identity resolution and role checks.
///
/// `identify` verifies the signed token and then requires a live session
/// row for its digest, so a logged-out token is rejected even before its
/// cryptographic expiry.
pub struct AccessGate {
    token_service: Arc<TokenService>,
    session_store: Arc<SessionStore>,
    audit_logger: Arc<AuditLogger>,
}

impl AccessGate {
    pub fn new(
        token_service: Arc<TokenService>,
        session_store: Arc<SessionStore>,
        audit_logger: Arc<AuditLogger>,
    ) -> Self {
        Self {
            token_service,
            session_store,
            audit_logger,
        }
    }

    /// Resolve the caller from the request.
    ///
    /// Any failure (no token, bad signature, expired, no session) is a
    /// uniform 401.
    pub async fn identify(&self, req: &Request) -> Result<AuthedCaller, ApiError> {
        let token = token_from_request(req).ok_or_else(ApiError::unauthenticated)?;

        let claims = self
            .token_service
            .validate(&token)
            .map_err(|_| ApiError::unauthenticated())?;

        let token_digest = self.token_service.digest(&token);
        let session = self
            .session_store
            .find_by_token_hash(&token_digest)
            .await?
            .ok_or_else(ApiError::unauthenticated)?;

        if session.expires_at <= Utc::now().timestamp() {
            return Err(ApiError::unauthenticated());
        }

        Ok(AuthedCaller {
            claims,
            token_digest,
        })
    }

    /// Exact-match role membership test.
    ///
    /// Denials are recorded in the audit trail before the 403 is returned.
    pub async fn authorize(
        &self,
        req: &Request,
        caller: &AuthedCaller,
        allowed_roles: &[Role],
        resource: &str,
    ) -> Result<(), ApiError> {
        if allowed_roles.contains(&caller.claims.role) {
            return Ok(());
        }

        let meta = ClientMeta::from_request(req);
        self.audit_logger
            .unauthorized_access(&caller.claims.sub, resource, &meta)
            .await;

        Err(ApiError::forbidden())
    }

    /// identify + authorize in one step, for handlers with a single
    /// allow-list
    pub async fn require(
        &self,
        req: &Request,
        allowed_roles: &[Role],
        resource: &str,
    ) -> Result<AuthedCaller, ApiError> {
        let caller = self.identify(req).await?;
        self.authorize(req, &caller, allowed_roles, resource).await?;
        Ok(caller)
    }
}

/// Extract the token from a request: same-site cookie first, then the
/// Authorization header.
pub fn token_from_request(req: &Request) -> Option<String> {
    cookie_token(req, ACCESS_TOKEN_COOKIE).or_else(|| bearer_token(req))
}

/// Read a named cookie without requiring the cookie middleware
pub fn cookie_token(req: &Request, name: &str) -> Option<String> {
    let raw = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?;

    for pair in raw.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        if parts.next() == Some(name) {
            let value = parts.next()?.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

fn bearer_token(req: &Request) -> Option<String> {
    let raw = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?;

    raw.strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

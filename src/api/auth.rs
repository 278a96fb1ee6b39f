use poem::web::cookie::{Cookie, CookieJar, SameSite};
use poem::Request;
use poem_openapi::{payload::Json, ApiResponse, OpenApi, Tags};
use std::sync::Arc;
use std::time::Duration;

use crate::api::guard::{self, AccessGate, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::config::SecuritySettings;
use crate::errors::{ApiError, InternalError};
use crate::services::{credential, AuditLogger, AuthService};
use crate::stores::{ProviderStore, UserStore};
use crate::types::db::{provider, user};
use crate::types::dto::auth::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest,
    RegisterResponse, UserSummary,
};
use crate::types::dto::common::MessageResponse;
use crate::types::internal::auth::Role;
use crate::types::internal::context::ClientMeta;

/// Authentication endpoints: registration, login, logout, identity, refresh
pub struct AuthApi {
    auth_service: Arc<AuthService>,
    user_store: Arc<UserStore>,
    provider_store: Arc<ProviderStore>,
    audit_logger: Arc<AuditLogger>,
    gate: Arc<AccessGate>,
    settings: SecuritySettings,
}

#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[derive(ApiResponse)]
pub enum RegisterCreated {
    /// User account created
    #[oai(status = 201)]
    Created(Json<RegisterResponse>),
}

impl AuthApi {
    pub fn new(
        auth_service: Arc<AuthService>,
        user_store: Arc<UserStore>,
        provider_store: Arc<ProviderStore>,
        audit_logger: Arc<AuditLogger>,
        gate: Arc<AccessGate>,
        settings: SecuritySettings,
    ) -> Self {
        Self {
            auth_service,
            user_store,
            provider_store,
            audit_logger,
            gate,
            settings,
        }
    }

    fn auth_cookie(&self, name: &str, value: &str, max_age_secs: i64) -> Cookie {
        let mut cookie = Cookie::new_with_str(name, value);
        cookie.set_http_only(true);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_path("/");
        cookie.set_secure(self.settings.secure_cookies);
        cookie.set_max_age(Duration::from_secs(max_age_secs.max(0) as u64));
        cookie
    }
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Register a staff account
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    async fn register(
        &self,
        req: &Request,
        body: Json<RegisterRequest>,
    ) -> Result<RegisterCreated, ApiError> {
        if matches!(body.role, Role::SuperAdmin | Role::Admin) {
            return Err(ApiError::validation(vec![
                "Administrative roles cannot be self-registered".to_string(),
            ]));
        }

        let strength = credential::check_password_strength(&body.password);
        if !strength.valid {
            return Err(ApiError::validation(strength.violations));
        }

        let password_hash = credential::hash_password(&body.password)?;
        let user = match self
            .user_store
            .create(&body.email, &password_hash, body.role)
            .await
        {
            Ok(user) => user,
            Err(InternalError::UniqueViolation { .. }) => {
                return Err(ApiError::conflict("User with this email already exists"));
            }
            Err(other) => return Err(other.into()),
        };

        let meta = ClientMeta::from_request(req);
        self.audit_logger
            .user_registered(&user.id, &user.email, &meta)
            .await;

        Ok(RegisterCreated::Created(Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user: user_summary(&user, None)?,
        })))
    }

    /// Login with email and password; sets the auth cookies on success
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(
        &self,
        req: &Request,
        cookie_jar: &CookieJar,
        body: Json<LoginRequest>,
    ) -> Result<Json<LoginResponse>, ApiError> {
        let meta = ClientMeta::from_request(req);
        let outcome = self
            .auth_service
            .login(
                &body.email,
                &body.password,
                body.mfa_token.as_deref(),
                &meta,
            )
            .await?;

        cookie_jar.add(self.auth_cookie(
            ACCESS_TOKEN_COOKIE,
            &outcome.access_token,
            self.settings.access_token_ttl_secs(),
        ));
        cookie_jar.add(self.auth_cookie(
            REFRESH_TOKEN_COOKIE,
            &outcome.refresh_token,
            self.settings.refresh_token_ttl_secs(),
        ));

        Ok(Json(LoginResponse {
            success: true,
            user: user_summary(&outcome.user, outcome.provider.as_ref())?,
        }))
    }

    /// Logout: deletes the session for the presented token
    #[oai(path = "/logout", method = "post", tag = "AuthTags::Authentication")]
    async fn logout(
        &self,
        req: &Request,
        cookie_jar: &CookieJar,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let caller = self.gate.identify(req).await?;
        let meta = ClientMeta::from_request(req);

        self.auth_service
            .logout(&caller.claims.sub, &caller.token_digest, &meta)
            .await?;

        cookie_jar.remove(ACCESS_TOKEN_COOKIE);
        cookie_jar.remove(REFRESH_TOKEN_COOKIE);

        Ok(Json(MessageResponse {
            message: "Logout successful".to_string(),
        }))
    }

    /// Identity of the authenticated caller
    #[oai(path = "/me", method = "get", tag = "AuthTags::Authentication")]
    async fn me(&self, req: &Request) -> Result<Json<UserSummary>, ApiError> {
        let caller = self.gate.identify(req).await?;

        let user = self
            .user_store
            .find_by_id(&caller.claims.sub)
            .await?
            .ok_or_else(|| ApiError::not_found("User"))?;
        let provider = self.provider_store.find_by_user_id(&user.id).await?;

        Ok(Json(user_summary(&user, provider.as_ref())?))
    }

    /// Exchange a refresh token for a new access token
    #[oai(path = "/refresh", method = "post", tag = "AuthTags::Authentication")]
    async fn refresh(
        &self,
        req: &Request,
        cookie_jar: &CookieJar,
        body: Json<RefreshRequest>,
    ) -> Result<Json<RefreshResponse>, ApiError> {
        let refresh_token = body
            .refresh_token
            .clone()
            .or_else(|| guard::cookie_token(req, REFRESH_TOKEN_COOKIE))
            .ok_or_else(ApiError::unauthenticated)?;

        let meta = ClientMeta::from_request(req);
        let outcome = self.auth_service.refresh(&refresh_token, &meta).await?;

        cookie_jar.add(self.auth_cookie(
            ACCESS_TOKEN_COOKIE,
            &outcome.access_token,
            self.settings.access_token_ttl_secs(),
        ));

        Ok(Json(RefreshResponse { success: true }))
    }
}

fn user_summary(
    user: &user::Model,
    provider: Option<&provider::Model>,
) -> Result<UserSummary, ApiError> {
    let role = Role::parse(&user.role).ok_or_else(|| {
        tracing::error!(user_id = %user.id, role = %user.role, "user row carries unknown role");
        ApiError::internal()
    })?;

    Ok(UserSummary {
        id: user.id.clone(),
        email: user.email.clone(),
        role,
        first_name: provider.map(|p| p.first_name.clone()).unwrap_or_default(),
        last_name: provider.map(|p| p.last_name.clone()).unwrap_or_default(),
    })
}

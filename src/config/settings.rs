use std::env;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Security configuration, loaded once at startup and passed into the
/// token service, field crypto, and auth service at construction.
///
/// Nothing reads the ambient environment at call time; tests construct
/// their own instances with distinct secrets.
#[derive(Debug, Clone)]
pub struct SecuritySettings {
    /// HMAC secret for JWT signing
    pub jwt_secret: String,
    /// HMAC secret for session token digests
    pub session_token_secret: String,
    /// Base64-encoded 32-byte AES key for PHI field encryption
    pub field_encryption_key: String,
    pub access_token_ttl_hours: i64,
    pub refresh_token_ttl_days: i64,
    pub max_login_attempts: i32,
    pub lockout_minutes: i64,
    /// Set the Secure flag on auth cookies (TLS deployments)
    pub secure_cookies: bool,
}

impl SecuritySettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?;
        let session_token_secret = env::var("SESSION_TOKEN_SECRET")
            .map_err(|_| ConfigError::MissingVar("SESSION_TOKEN_SECRET"))?;
        let field_encryption_key = env::var("FIELD_ENCRYPTION_KEY")
            .map_err(|_| ConfigError::MissingVar("FIELD_ENCRYPTION_KEY"))?;

        if jwt_secret.len() < 32 {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                reason: "must be at least 32 characters".to_string(),
            });
        }

        let secure_cookies = env::var("SECURE_COOKIES")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            jwt_secret,
            session_token_secret,
            field_encryption_key,
            access_token_ttl_hours: 8,
            refresh_token_ttl_days: 7,
            max_login_attempts: 5,
            lockout_minutes: 30,
            secure_cookies,
        })
    }

    pub fn access_token_ttl_secs(&self) -> i64 {
        self.access_token_ttl_hours * 60 * 60
    }

    pub fn refresh_token_ttl_secs(&self) -> i64 {
        self.refresh_token_ttl_days * 24 * 60 * 60
    }
}

/// Process-level settings: bind address and database location
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub database_url: String,
    pub bind_addr: String,
}

impl ServerSettings {
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://mediflow.db?mode=rwc".to_string());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Self {
            database_url,
            bind_addr,
        }
    }
}

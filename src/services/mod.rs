// Services layer - Business logic and orchestration
pub mod audit_logger;
pub mod auth_service;
pub mod credential;
pub mod crypto;
pub mod field_crypto;
pub mod identifiers;
pub mod token_service;

pub use audit_logger::AuditLogger;
pub use auth_service::AuthService;
pub use field_crypto::FieldCrypto;
pub use token_service::TokenService;

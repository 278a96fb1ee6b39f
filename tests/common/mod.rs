// Common test utilities for integration tests

#![allow(dead_code)]

use migration::{Migrator, MigratorTrait};
use poem::test::TestClient;
use poem::Endpoint;
use sea_orm::Database;

use mediflow_backend::app::{build_app, AppContext};
use mediflow_backend::config::SecuritySettings;
use mediflow_backend::services::credential;
use mediflow_backend::stores::patient_store::NewPatient;
use mediflow_backend::stores::provider_store::NewProvider;
use mediflow_backend::types::db::{patient, provider};
use mediflow_backend::types::internal::auth::Role;
use mediflow_backend::types::internal::context::ClientMeta;

pub fn test_settings() -> SecuritySettings {
    SecuritySettings {
        jwt_secret: "integration-test-jwt-secret-32-chars!!".to_string(),
        session_token_secret: "integration-test-session-secret-32ch".to_string(),
        field_encryption_key: "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=".to_string(),
        access_token_ttl_hours: 8,
        refresh_token_ttl_days: 7,
        max_login_attempts: 5,
        lockout_minutes: 30,
        secure_cookies: false,
    }
}

/// In-memory database, migrations applied, full app wired
pub async fn spawn_app() -> (AppContext, TestClient<impl Endpoint>) {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let ctx = AppContext::new(db, test_settings()).expect("Failed to build app context");
    let client = TestClient::new(build_app(&ctx));
    (ctx, client)
}

/// Create a user directly through the store; returns the user id
pub async fn seed_user(ctx: &AppContext, email: &str, password: &str, role: Role) -> String {
    let hash = credential::hash_password(password).expect("Failed to hash password");
    let user = ctx
        .user_store
        .create(email, &hash, role)
        .await
        .expect("Failed to seed user");
    user.id
}

/// Login through the auth service; returns a bearer-usable access token
pub async fn login_token(ctx: &AppContext, email: &str, password: &str) -> String {
    ctx.auth_service
        .login(email, password, None, &ClientMeta::default())
        .await
        .expect("Login should succeed")
        .access_token
}

/// Seed a user with the given role and return an access token for it
pub async fn seed_and_login(ctx: &AppContext, email: &str, role: Role) -> String {
    seed_user(ctx, email, "Sup3r$ecurePassword", role).await;
    login_token(ctx, email, "Sup3r$ecurePassword").await
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Seed a patient directly through the store
pub async fn seed_patient(ctx: &AppContext, first_name: &str, last_name: &str) -> patient::Model {
    ctx.patient_store
        .create(NewPatient {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            middle_name: None,
            date_of_birth: "1985-03-15".to_string(),
            gender: "FEMALE".to_string(),
            blood_group: Some("O_POSITIVE".to_string()),
            email: Some(format!("{}@example.test", first_name.to_lowercase())),
            phone_number: "5559876543".to_string(),
            address: "123 Main Street".to_string(),
            city: "Los Angeles".to_string(),
            state: "CA".to_string(),
            zip_code: "90001".to_string(),
            country: "USA".to_string(),
            emergency_contact_name: "John Doe".to_string(),
            emergency_contact_phone: "5559876544".to_string(),
            emergency_contact_relation: "Spouse".to_string(),
            insurance_provider: None,
            insurance_policy_number: None,
            preferred_language: Some("English".to_string()),
            ssn_encrypted: None,
        })
        .await
        .expect("Failed to seed patient")
}

/// Seed a doctor user with a linked provider profile
pub async fn seed_provider(ctx: &AppContext, email: &str) -> provider::Model {
    let user_id = seed_user(ctx, email, "Sup3r$ecurePassword", Role::Doctor).await;
    ctx.provider_store
        .create(NewProvider {
            user_id,
            first_name: "John".to_string(),
            last_name: "Smith".to_string(),
            npi_number: "1234567890".to_string(),
            specialty: "INTERNAL_MEDICINE".to_string(),
            license_number: Some("MD123456".to_string()),
            phone_number: Some("5551234567".to_string()),
            accepting_new_patients: true,
        })
        .await
        .expect("Failed to seed provider")
}

/// Assert an identifier has the shape PREFIX-YYYYMMDD-NNNN
pub fn assert_identifier_shape(value: &str, prefix: &str) {
    let parts: Vec<&str> = value.split('-').collect();
    assert_eq!(parts.len(), 3, "expected three segments in {value}");
    assert_eq!(parts[0], prefix);
    assert_eq!(parts[1].len(), 8, "date segment in {value}");
    assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
    assert_eq!(parts[2].len(), 4, "suffix segment in {value}");
    assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
}

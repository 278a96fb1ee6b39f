mod common;

use poem::http::StatusCode;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;

use common::{bearer, login_token, seed_and_login, seed_user, spawn_app};
use mediflow_backend::types::db::audit_log;
use mediflow_backend::types::internal::auth::Role;
use mediflow_backend::types::internal::context::ClientMeta;

#[tokio::test]
async fn register_then_login_succeeds() {
    let (_ctx, cli) = spawn_app().await;

    let resp = cli
        .post("/api/auth/register")
        .body_json(&json!({
            "email": "doctor@clinic.test",
            "password": "Sup3r$ecurePassword",
            "role": "DOCTOR",
        }))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);

    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({
            "email": "doctor@clinic.test",
            "password": "Sup3r$ecurePassword",
        }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let body = resp.json().await;
    let body = body.value().object();
    assert!(body.get("success").bool());
    let user = body.get("user").object();
    assert_eq!(user.get("email").string(), "doctor@clinic.test");
    assert_eq!(user.get("role").string(), "DOCTOR");
}

#[tokio::test]
async fn register_rejects_weak_password_with_itemized_violations() {
    let (_ctx, cli) = spawn_app().await;

    let resp = cli
        .post("/api/auth/register")
        .body_json(&json!({
            "email": "nurse@clinic.test",
            "password": "short",
            "role": "NURSE",
        }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    let body = resp.json().await;
    let body = body.value().object();
    // Too short, no uppercase, no digit, no symbol
    assert_eq!(body.get("details").array().len(), 4);
}

#[tokio::test]
async fn register_rejects_administrative_roles() {
    let (_ctx, cli) = spawn_app().await;

    let resp = cli
        .post("/api/auth/register")
        .body_json(&json!({
            "email": "admin@clinic.test",
            "password": "Sup3r$ecurePassword",
            "role": "SUPER_ADMIN",
        }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let (ctx, cli) = spawn_app().await;
    seed_user(&ctx, "doctor@clinic.test", "Sup3r$ecurePassword", Role::Doctor).await;

    let resp = cli
        .post("/api/auth/register")
        .body_json(&json!({
            "email": "doctor@clinic.test",
            "password": "An0ther$ecurePass",
            "role": "DOCTOR",
        }))
        .send()
        .await;
    resp.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn wrong_password_is_unauthenticated() {
    let (ctx, cli) = spawn_app().await;
    seed_user(&ctx, "doctor@clinic.test", "Sup3r$ecurePassword", Role::Doctor).await;

    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({
            "email": "doctor@clinic.test",
            "password": "Wr0ng$ecurePassword",
        }))
        .send()
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_email_fails_and_is_durably_audited_without_actor() {
    let (ctx, cli) = spawn_app().await;

    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({
            "email": "ghost@clinic.test",
            "password": "Irrelevant$Pass1",
        }))
        .send()
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);

    let rows = audit_log::Entity::find()
        .filter(audit_log::Column::Action.eq("FAILED_LOGIN"))
        .all(&ctx.db)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].user_id.is_none());
    assert!(rows[0]
        .metadata
        .as_deref()
        .unwrap()
        .contains("ghost@clinic.test"));
}

#[tokio::test]
async fn deactivated_account_is_forbidden() {
    let (ctx, cli) = spawn_app().await;
    let user_id = seed_user(&ctx, "doctor@clinic.test", "Sup3r$ecurePassword", Role::Doctor).await;
    ctx.user_store.deactivate(&user_id).await.unwrap();

    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({
            "email": "doctor@clinic.test",
            "password": "Sup3r$ecurePassword",
        }))
        .send()
        .await;
    resp.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn mfa_enabled_account_requires_a_token() {
    let (ctx, cli) = spawn_app().await;
    let user_id = seed_user(&ctx, "doctor@clinic.test", "Sup3r$ecurePassword", Role::Doctor).await;
    ctx.user_store.set_mfa_enabled(&user_id, true).await.unwrap();

    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({
            "email": "doctor@clinic.test",
            "password": "Sup3r$ecurePassword",
        }))
        .send()
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
    let body = resp.json().await;
    assert!(body.value().object().get("requires_mfa").bool());

    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({
            "email": "doctor@clinic.test",
            "password": "Sup3r$ecurePassword",
            "mfa_token": "000000",
        }))
        .send()
        .await;
    resp.assert_status_is_ok();
}

#[tokio::test]
async fn me_works_with_bearer_and_cookie_transport() {
    let (ctx, cli) = spawn_app().await;
    let token = seed_and_login(&ctx, "doctor@clinic.test", Role::Doctor).await;

    let resp = cli
        .get("/api/auth/me")
        .header("authorization", bearer(&token))
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    assert_eq!(
        body.value().object().get("email").string(),
        "doctor@clinic.test"
    );

    let resp = cli
        .get("/api/auth/me")
        .header("cookie", format!("access_token={token}"))
        .send()
        .await;
    resp.assert_status_is_ok();

    let resp = cli.get("/api/auth/me").send().await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let (ctx, cli) = spawn_app().await;
    let token = seed_and_login(&ctx, "doctor@clinic.test", Role::Doctor).await;

    let resp = cli
        .get("/api/auth/me")
        .header("authorization", bearer(&token))
        .send()
        .await;
    resp.assert_status_is_ok();

    let resp = cli
        .post("/api/auth/logout")
        .header("authorization", bearer(&token))
        .send()
        .await;
    resp.assert_status_is_ok();

    // The token is still cryptographically valid, but its session is gone
    let resp = cli
        .get("/api/auth/me")
        .header("authorization", bearer(&token))
        .send()
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_rotates_the_access_token() {
    let (ctx, cli) = spawn_app().await;
    seed_user(&ctx, "doctor@clinic.test", "Sup3r$ecurePassword", Role::Doctor).await;

    let outcome = ctx
        .auth_service
        .login(
            "doctor@clinic.test",
            "Sup3r$ecurePassword",
            None,
            &ClientMeta::default(),
        )
        .await
        .unwrap();

    let resp = cli
        .post("/api/auth/refresh")
        .body_json(&json!({ "refresh_token": outcome.refresh_token }))
        .send()
        .await;
    resp.assert_status_is_ok();

    // The old access token's session digest was rotated away
    let resp = cli
        .get("/api/auth/me")
        .header("authorization", bearer(&outcome.access_token))
        .send()
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);

    // A service-level refresh yields a usable token
    let refreshed = ctx
        .auth_service
        .refresh(&outcome.refresh_token, &ClientMeta::default())
        .await
        .unwrap();
    let resp = cli
        .get("/api/auth/me")
        .header("authorization", bearer(&refreshed.access_token))
        .send()
        .await;
    resp.assert_status_is_ok();
}

#[tokio::test]
async fn bogus_refresh_token_is_rejected() {
    let (_ctx, cli) = spawn_app().await;

    let resp = cli
        .post("/api/auth/refresh")
        .body_json(&json!({ "refresh_token": "not-a-real-token" }))
        .send()
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn security_headers_are_set_on_every_response() {
    let (_ctx, cli) = spawn_app().await;

    let resp = cli.get("/api/health").send().await;
    resp.assert_status_is_ok();
    resp.assert_header("X-Content-Type-Options", "nosniff");
    resp.assert_header("X-Frame-Options", "DENY");
    resp.assert_header("Referrer-Policy", "strict-origin-when-cross-origin");
    resp.assert_header(
        "Permissions-Policy",
        "camera=(), microphone=(), geolocation=()",
    );
}

#[tokio::test]
async fn login_resolves_display_names_from_the_provider_profile() {
    let (ctx, cli) = spawn_app().await;
    common::seed_provider(&ctx, "drsmith@clinic.test").await;

    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({
            "email": "drsmith@clinic.test",
            "password": "Sup3r$ecurePassword",
        }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let body = resp.json().await;
    let body = body.value().object();
    let user = body.get("user").object();
    assert_eq!(user.get("first_name").string(), "John");
    assert_eq!(user.get("last_name").string(), "Smith");
}

#[tokio::test]
async fn last_login_is_stamped_on_success() {
    let (ctx, _cli) = spawn_app().await;
    let user_id = seed_user(&ctx, "doctor@clinic.test", "Sup3r$ecurePassword", Role::Doctor).await;

    assert!(ctx
        .user_store
        .find_by_id(&user_id)
        .await
        .unwrap()
        .unwrap()
        .last_login
        .is_none());

    login_token(&ctx, "doctor@clinic.test", "Sup3r$ecurePassword").await;

    assert!(ctx
        .user_store
        .find_by_id(&user_id)
        .await
        .unwrap()
        .unwrap()
        .last_login
        .is_some());
}

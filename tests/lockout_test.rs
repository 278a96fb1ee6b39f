mod common;

use chrono::Utc;
use poem::http::StatusCode;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;

use common::{seed_user, spawn_app};
use mediflow_backend::types::db::user;
use mediflow_backend::types::internal::auth::Role;

async fn fail_login(cli: &poem::test::TestClient<impl poem::Endpoint>, email: &str) {
    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({
            "email": email,
            "password": "Wr0ng$ecurePassword",
        }))
        .send()
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn five_failures_lock_out_even_the_correct_password() {
    let (ctx, cli) = spawn_app().await;
    seed_user(&ctx, "doctor@clinic.test", "Sup3r$ecurePassword", Role::Doctor).await;

    for _ in 0..5 {
        fail_login(&cli, "doctor@clinic.test").await;
    }

    // Sixth attempt with the correct password is still rejected as locked
    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({
            "email": "doctor@clinic.test",
            "password": "Sup3r$ecurePassword",
        }))
        .send()
        .await;
    resp.assert_status(StatusCode::TOO_MANY_REQUESTS);

    let body = resp.json().await;
    let body = body.value().object();
    assert!(body.get("message").string().contains("minutes"));
}

#[tokio::test]
async fn locked_account_does_not_accumulate_further_failures() {
    let (ctx, cli) = spawn_app().await;
    let user_id = seed_user(&ctx, "doctor@clinic.test", "Sup3r$ecurePassword", Role::Doctor).await;

    for _ in 0..5 {
        fail_login(&cli, "doctor@clinic.test").await;
    }

    // Further attempts while locked are rejected up front
    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({
            "email": "doctor@clinic.test",
            "password": "Wr0ng$ecurePassword",
        }))
        .send()
        .await;
    resp.assert_status(StatusCode::TOO_MANY_REQUESTS);

    let row = ctx.user_store.find_by_id(&user_id).await.unwrap().unwrap();
    assert_eq!(row.failed_login_attempts, 5);
}

#[tokio::test]
async fn lockout_expires_and_success_resets_the_counter() {
    let (ctx, cli) = spawn_app().await;
    let user_id = seed_user(&ctx, "doctor@clinic.test", "Sup3r$ecurePassword", Role::Doctor).await;

    for _ in 0..5 {
        fail_login(&cli, "doctor@clinic.test").await;
    }

    // Rewind the lockout window
    user::Entity::update_many()
        .col_expr(
            user::Column::LockedUntil,
            Expr::value(Some(Utc::now().timestamp() - 60)),
        )
        .filter(user::Column::Id.eq(user_id.as_str()))
        .exec(&ctx.db)
        .await
        .unwrap();

    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({
            "email": "doctor@clinic.test",
            "password": "Sup3r$ecurePassword",
        }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let row = ctx.user_store.find_by_id(&user_id).await.unwrap().unwrap();
    assert_eq!(row.failed_login_attempts, 0);
    assert!(row.locked_until.is_none());
}

#[tokio::test]
async fn failed_attempts_are_durably_audited_with_the_actor() {
    let (ctx, cli) = spawn_app().await;
    let user_id = seed_user(&ctx, "doctor@clinic.test", "Sup3r$ecurePassword", Role::Doctor).await;

    fail_login(&cli, "doctor@clinic.test").await;
    fail_login(&cli, "doctor@clinic.test").await;

    let trail = ctx.audit_store.query_by_user(&user_id, None, None).await.unwrap();
    let failed: Vec<_> = trail
        .iter()
        .filter(|e| e.action == "FAILED_LOGIN")
        .collect();
    assert_eq!(failed.len(), 2);
}

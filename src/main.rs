use poem::{listener::TcpListener, Server};
use sea_orm::Database;

use migration::{Migrator, MigratorTrait};

use mediflow_backend::app::{build_app, AppContext};
use mediflow_backend::config::{logging, SecuritySettings, ServerSettings};
use mediflow_backend::services::credential;
use mediflow_backend::types::internal::auth::Role;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv::dotenv().ok();

    logging::init_logging().expect("Failed to initialize logging");

    let server_settings = ServerSettings::from_env();
    let security_settings = SecuritySettings::from_env().expect("Invalid security configuration");

    let db = Database::connect(&server_settings.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!(database_url = %server_settings.database_url, "connected to database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    tracing::info!("database migrations completed");

    let ctx = AppContext::new(db, security_settings).expect("Failed to build application context");

    bootstrap_admin(&ctx).await;

    let app = build_app(&ctx);

    tracing::info!(addr = %server_settings.bind_addr, "starting server");
    Server::new(TcpListener::bind(server_settings.bind_addr))
        .run(app)
        .await
}

/// Seed an initial SUPER_ADMIN account when the user table is empty and
/// bootstrap credentials are configured.
async fn bootstrap_admin(ctx: &AppContext) {
    let (Ok(email), Ok(password)) = (
        std::env::var("ADMIN_EMAIL"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        return;
    };

    match ctx.user_store.count().await {
        Ok(0) => {}
        Ok(_) => return,
        Err(err) => {
            tracing::error!(error = %err, "failed to check for existing users");
            return;
        }
    }

    let strength = credential::check_password_strength(&password);
    if !strength.valid {
        tracing::error!(
            violations = ?strength.violations,
            "ADMIN_PASSWORD does not meet the strength policy, skipping bootstrap"
        );
        return;
    }

    let password_hash = match credential::hash_password(&password) {
        Ok(hash) => hash,
        Err(err) => {
            tracing::error!(error = %err, "failed to hash bootstrap password");
            return;
        }
    };

    match ctx
        .user_store
        .create(&email, &password_hash, Role::SuperAdmin)
        .await
    {
        Ok(user) => tracing::info!(user_id = %user.id, %email, "bootstrap admin created"),
        Err(err) => tracing::error!(error = %err, "failed to create bootstrap admin"),
    }
}

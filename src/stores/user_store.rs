use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, SqlErr,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::types::db::user;
use crate::types::internal::auth::Role;

/// Repository for user identity rows.
///
/// Users are never hard-deleted; deactivation flips `is_active`.
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a user with an already-hashed password.
    ///
    /// # Errors
    /// `UniqueViolation` when the email is already registered
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<user::Model, InternalError> {
        let now = Utc::now().timestamp();
        let row = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            role: Set(role.as_str().to_string()),
            is_active: Set(true),
            mfa_enabled: Set(false),
            failed_login_attempts: Set(0),
            locked_until: Set(None),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        row.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                InternalError::UniqueViolation { field: "email" }
            } else {
                InternalError::database("insert_user", e)
            }
        })
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    /// Record a failed login attempt.
    ///
    /// The counter increment is a single SQL update rather than a
    /// read-modify-write, so concurrent failures cannot lose updates. Once
    /// the counter reaches `max_attempts` the account is locked for
    /// `lockout_secs`.
    ///
    /// # Returns
    /// The failure count after the increment
    pub async fn record_failed_attempt(
        &self,
        user_id: &str,
        max_attempts: i32,
        lockout_secs: i64,
    ) -> Result<i32, InternalError> {
        let now = Utc::now().timestamp();

        user::Entity::update_many()
            .col_expr(
                user::Column::FailedLoginAttempts,
                Expr::col(user::Column::FailedLoginAttempts).add(1),
            )
            .col_expr(user::Column::UpdatedAt, Expr::value(now))
            .filter(user::Column::Id.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("increment_failed_attempts", e))?;

        let user = self
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| InternalError::not_found("User", user_id))?;

        if user.failed_login_attempts >= max_attempts {
            user::Entity::update_many()
                .col_expr(user::Column::LockedUntil, Expr::value(Some(now + lockout_secs)))
                .filter(user::Column::Id.eq(user_id))
                .exec(&self.db)
                .await
                .map_err(|e| InternalError::database("set_lockout", e))?;
        }

        Ok(user.failed_login_attempts)
    }

    /// Reset lockout state and stamp the last login
    pub async fn record_successful_login(&self, user_id: &str) -> Result<(), InternalError> {
        let now = Utc::now().timestamp();

        user::Entity::update_many()
            .col_expr(user::Column::FailedLoginAttempts, Expr::value(0))
            .col_expr(user::Column::LockedUntil, Expr::value(Option::<i64>::None))
            .col_expr(user::Column::LastLogin, Expr::value(Some(now)))
            .col_expr(user::Column::UpdatedAt, Expr::value(now))
            .filter(user::Column::Id.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("record_successful_login", e))?;

        Ok(())
    }

    /// Flip the MFA flag for an account
    pub async fn set_mfa_enabled(&self, user_id: &str, enabled: bool) -> Result<(), InternalError> {
        user::Entity::update_many()
            .col_expr(user::Column::MfaEnabled, Expr::value(enabled))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now().timestamp()))
            .filter(user::Column::Id.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("set_mfa_enabled", e))?;

        Ok(())
    }

    /// Deactivate an account without deleting the row
    pub async fn deactivate(&self, user_id: &str) -> Result<(), InternalError> {
        user::Entity::update_many()
            .col_expr(user::Column::IsActive, Expr::value(false))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now().timestamp()))
            .filter(user::Column::Id.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("deactivate_user", e))?;

        Ok(())
    }

    pub async fn count(&self) -> Result<u64, InternalError> {
        user::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_users", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup_store() -> UserStore {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        UserStore::new(db)
    }

    #[tokio::test]
    async fn create_and_find_by_email() {
        let store = setup_store().await;

        let created = store
            .create("nurse@clinic.test", "hash", Role::Nurse)
            .await
            .unwrap();
        let found = store.find_by_email("nurse@clinic.test").await.unwrap().unwrap();

        assert_eq!(found.id, created.id);
        assert_eq!(found.role, "NURSE");
        assert!(found.is_active);
        assert_eq!(found.failed_login_attempts, 0);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() {
        let store = setup_store().await;

        store
            .create("nurse@clinic.test", "hash", Role::Nurse)
            .await
            .unwrap();
        let err = store
            .create("nurse@clinic.test", "hash2", Role::Doctor)
            .await
            .unwrap_err();

        assert!(matches!(err, InternalError::UniqueViolation { field: "email" }));
    }

    #[tokio::test]
    async fn failed_attempts_accumulate_and_lock_at_threshold() {
        let store = setup_store().await;
        let user = store
            .create("doctor@clinic.test", "hash", Role::Doctor)
            .await
            .unwrap();

        for expected in 1..=4 {
            let count = store.record_failed_attempt(&user.id, 5, 1800).await.unwrap();
            assert_eq!(count, expected);
            let row = store.find_by_id(&user.id).await.unwrap().unwrap();
            assert!(row.locked_until.is_none(), "locked too early at {count}");
        }

        let count = store.record_failed_attempt(&user.id, 5, 1800).await.unwrap();
        assert_eq!(count, 5);

        let row = store.find_by_id(&user.id).await.unwrap().unwrap();
        let locked_until = row.locked_until.expect("account should be locked");
        assert!(locked_until > Utc::now().timestamp());
        // Counter is kept, not reset, on lock
        assert_eq!(row.failed_login_attempts, 5);
    }

    #[tokio::test]
    async fn successful_login_resets_lockout_state() {
        let store = setup_store().await;
        let user = store
            .create("doctor@clinic.test", "hash", Role::Doctor)
            .await
            .unwrap();

        for _ in 0..5 {
            store.record_failed_attempt(&user.id, 5, 1800).await.unwrap();
        }
        store.record_successful_login(&user.id).await.unwrap();

        let row = store.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(row.failed_login_attempts, 0);
        assert!(row.locked_until.is_none());
        assert!(row.last_login.is_some());
    }

    #[tokio::test]
    async fn deactivate_keeps_the_row() {
        let store = setup_store().await;
        let user = store
            .create("reception@clinic.test", "hash", Role::Receptionist)
            .await
            .unwrap();

        store.deactivate(&user.id).await.unwrap();

        let row = store.find_by_id(&user.id).await.unwrap().unwrap();
        assert!(!row.is_active);
    }
}

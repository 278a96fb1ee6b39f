use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::errors::InternalError;
use crate::types::db::session;

/// Fields for a new session row; token material arrives pre-digested
#[derive(Debug, Clone)]
pub struct NewSession {
    pub token_hash: String,
    pub refresh_token_hash: String,
    pub user_id: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub expires_at: i64,
}

/// Repository for session rows.
///
/// Revocation is delete-based: removing a row is what makes a
/// still-unexpired token unusable at the gate.
pub struct SessionStore {
    db: DatabaseConnection,
}

impl SessionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new_session: NewSession) -> Result<(), InternalError> {
        let row = session::ActiveModel {
            token_hash: Set(new_session.token_hash),
            refresh_token_hash: Set(new_session.refresh_token_hash),
            user_id: Set(new_session.user_id),
            ip_address: Set(new_session.ip_address),
            user_agent: Set(new_session.user_agent),
            expires_at: Set(new_session.expires_at),
            created_at: Set(Utc::now().timestamp()),
        };

        row.insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_session", e))?;

        Ok(())
    }

    pub async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<session::Model>, InternalError> {
        session::Entity::find_by_id(token_hash)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_session_by_token", e))
    }

    pub async fn find_by_refresh_hash(
        &self,
        refresh_token_hash: &str,
    ) -> Result<Option<session::Model>, InternalError> {
        session::Entity::find()
            .filter(session::Column::RefreshTokenHash.eq(refresh_token_hash))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_session_by_refresh", e))
    }

    /// Delete the session matching a presented token digest.
    ///
    /// # Returns
    /// Whether a row was actually deleted
    pub async fn delete_by_token_hash(&self, token_hash: &str) -> Result<bool, InternalError> {
        let result = session::Entity::delete_by_id(token_hash)
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_session", e))?;

        Ok(result.rows_affected > 0)
    }

    /// Swap in a freshly issued access token after a refresh, keeping the
    /// refresh digest stable.
    pub async fn rotate_access_token(
        &self,
        refresh_token_hash: &str,
        new_token_hash: &str,
        new_expires_at: i64,
    ) -> Result<(), InternalError> {
        session::Entity::update_many()
            .col_expr(session::Column::TokenHash, Expr::value(new_token_hash))
            .col_expr(session::Column::ExpiresAt, Expr::value(new_expires_at))
            .filter(session::Column::RefreshTokenHash.eq(refresh_token_hash))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("rotate_access_token", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::UserStore;
    use crate::types::internal::auth::Role;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup() -> (SessionStore, String) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let users = UserStore::new(db.clone());
        let user = users
            .create("doctor@clinic.test", "hash", Role::Doctor)
            .await
            .unwrap();

        (SessionStore::new(db), user.id)
    }

    fn new_session(user_id: &str, token_hash: &str, refresh_hash: &str) -> NewSession {
        NewSession {
            token_hash: token_hash.to_string(),
            refresh_token_hash: refresh_hash.to_string(),
            user_id: user_id.to_string(),
            ip_address: Some("10.0.0.1".to_string()),
            user_agent: Some("test-agent".to_string()),
            expires_at: Utc::now().timestamp() + 3600,
        }
    }

    #[tokio::test]
    async fn created_session_is_found_by_token_hash() {
        let (store, user_id) = setup().await;
        store
            .create(new_session(&user_id, "digest-a", "refresh-a"))
            .await
            .unwrap();

        let session = store.find_by_token_hash("digest-a").await.unwrap().unwrap();
        assert_eq!(session.user_id, user_id);
        assert_eq!(session.ip_address.as_deref(), Some("10.0.0.1"));
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let (store, user_id) = setup().await;
        store
            .create(new_session(&user_id, "digest-a", "refresh-a"))
            .await
            .unwrap();

        assert!(store.delete_by_token_hash("digest-a").await.unwrap());
        assert!(store.find_by_token_hash("digest-a").await.unwrap().is_none());
        // Second delete is a no-op
        assert!(!store.delete_by_token_hash("digest-a").await.unwrap());
    }

    #[tokio::test]
    async fn rotate_replaces_the_access_digest() {
        let (store, user_id) = setup().await;
        store
            .create(new_session(&user_id, "digest-a", "refresh-a"))
            .await
            .unwrap();

        let new_expiry = Utc::now().timestamp() + 7200;
        store
            .rotate_access_token("refresh-a", "digest-b", new_expiry)
            .await
            .unwrap();

        assert!(store.find_by_token_hash("digest-a").await.unwrap().is_none());
        let rotated = store.find_by_token_hash("digest-b").await.unwrap().unwrap();
        assert_eq!(rotated.expires_at, new_expiry);
        assert_eq!(rotated.refresh_token_hash, "refresh-a");
    }
}

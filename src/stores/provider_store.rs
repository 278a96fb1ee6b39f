use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::types::db::provider;

#[derive(Debug, Clone)]
pub struct NewProvider {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub npi_number: String,
    pub specialty: String,
    pub license_number: Option<String>,
    pub phone_number: Option<String>,
    pub accepting_new_patients: bool,
}

pub struct ProviderStore {
    db: DatabaseConnection,
}

impl ProviderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, data: NewProvider) -> Result<provider::Model, InternalError> {
        let row = provider::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(data.user_id),
            first_name: Set(data.first_name),
            last_name: Set(data.last_name),
            npi_number: Set(data.npi_number),
            specialty: Set(data.specialty),
            license_number: Set(data.license_number),
            phone_number: Set(data.phone_number),
            accepting_new_patients: Set(data.accepting_new_patients),
            created_at: Set(Utc::now().timestamp()),
        };

        row.insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_provider", e))
    }

    /// Provider profile linked to a staff user, if one exists
    pub async fn find_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Option<provider::Model>, InternalError> {
        provider::Entity::find()
            .filter(provider::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_provider_by_user", e))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<provider::Model>, InternalError> {
        provider::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_provider_by_id", e))
    }

    pub async fn list(&self) -> Result<Vec<provider::Model>, InternalError> {
        provider::Entity::find()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_providers", e))
    }
}

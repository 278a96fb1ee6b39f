use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::services::identifiers;
use crate::types::db::patient;

const MAX_MRN_ATTEMPTS: usize = 3;

/// Fields for patient registration; the SSN arrives already encrypted
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub date_of_birth: String,
    pub gender: String,
    pub blood_group: Option<String>,
    pub email: Option<String>,
    pub phone_number: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub emergency_contact_relation: String,
    pub insurance_provider: Option<String>,
    pub insurance_policy_number: Option<String>,
    pub preferred_language: Option<String>,
    pub ssn_encrypted: Option<String>,
}

/// Partial update of contact and insurance details
#[derive(Debug, Clone, Default)]
pub struct PatientChanges {
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub insurance_provider: Option<String>,
    pub insurance_policy_number: Option<String>,
    pub preferred_language: Option<String>,
}

pub struct PatientStore {
    db: DatabaseConnection,
}

impl PatientStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a patient, generating an MRN.
    ///
    /// The MRN is date-prefixed with a random suffix; the unique constraint
    /// catches collisions and the insert retries with a fresh suffix.
    pub async fn create(&self, data: NewPatient) -> Result<patient::Model, InternalError> {
        for _ in 0..MAX_MRN_ATTEMPTS {
            let mrn = identifiers::generate_mrn();
            match self.insert_with_mrn(data.clone(), mrn).await {
                Ok(model) => return Ok(model),
                Err(InternalError::UniqueViolation { .. }) => {
                    tracing::warn!("mrn collision, retrying with a fresh suffix");
                    continue;
                }
                Err(other) => return Err(other),
            }
        }

        Err(InternalError::UniqueViolation { field: "mrn" })
    }

    async fn insert_with_mrn(
        &self,
        data: NewPatient,
        mrn: String,
    ) -> Result<patient::Model, InternalError> {
        let now = Utc::now().timestamp();
        let row = patient::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            mrn: Set(mrn),
            first_name: Set(data.first_name),
            last_name: Set(data.last_name),
            middle_name: Set(data.middle_name),
            date_of_birth: Set(data.date_of_birth),
            gender: Set(data.gender),
            blood_group: Set(data.blood_group),
            email: Set(data.email),
            phone_number: Set(data.phone_number),
            address: Set(data.address),
            city: Set(data.city),
            state: Set(data.state),
            zip_code: Set(data.zip_code),
            country: Set(data.country),
            emergency_contact_name: Set(data.emergency_contact_name),
            emergency_contact_phone: Set(data.emergency_contact_phone),
            emergency_contact_relation: Set(data.emergency_contact_relation),
            insurance_provider: Set(data.insurance_provider),
            insurance_policy_number: Set(data.insurance_policy_number),
            preferred_language: Set(data.preferred_language),
            ssn_encrypted: Set(data.ssn_encrypted),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        row.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                InternalError::UniqueViolation { field: "mrn" }
            } else {
                InternalError::database("insert_patient", e)
            }
        })
    }

    /// List active patients, newest first, with optional search across
    /// name, MRN, email, and phone.
    ///
    /// # Returns
    /// * `(patients, total)` - One page of rows plus the total match count
    pub async fn list(
        &self,
        search: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<patient::Model>, u64), InternalError> {
        let mut query = patient::Entity::find().filter(patient::Column::IsActive.eq(true));

        if let Some(term) = search.filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(patient::Column::FirstName.contains(term))
                    .add(patient::Column::LastName.contains(term))
                    .add(patient::Column::Mrn.contains(term))
                    .add(patient::Column::Email.contains(term))
                    .add(patient::Column::PhoneNumber.contains(term)),
            );
        }

        let paginator = query
            .order_by_desc(patient::Column::CreatedAt)
            .paginate(&self.db, per_page.max(1));

        let total = paginator
            .num_items()
            .await
            .map_err(|e| InternalError::database("count_patients", e))?;
        let patients = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| InternalError::database("list_patients", e))?;

        Ok((patients, total))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<patient::Model>, InternalError> {
        patient::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_patient_by_id", e))
    }

    /// Apply a partial update and return the new row
    pub async fn update(
        &self,
        id: &str,
        changes: PatientChanges,
    ) -> Result<patient::Model, InternalError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| InternalError::not_found("Patient", id))?;

        let mut row: patient::ActiveModel = existing.into();
        if let Some(v) = changes.phone_number {
            row.phone_number = Set(v);
        }
        if let Some(v) = changes.email {
            row.email = Set(Some(v));
        }
        if let Some(v) = changes.address {
            row.address = Set(v);
        }
        if let Some(v) = changes.city {
            row.city = Set(v);
        }
        if let Some(v) = changes.state {
            row.state = Set(v);
        }
        if let Some(v) = changes.zip_code {
            row.zip_code = Set(v);
        }
        if let Some(v) = changes.insurance_provider {
            row.insurance_provider = Set(Some(v));
        }
        if let Some(v) = changes.insurance_policy_number {
            row.insurance_policy_number = Set(Some(v));
        }
        if let Some(v) = changes.preferred_language {
            row.preferred_language = Set(Some(v));
        }
        row.updated_at = Set(Utc::now().timestamp());

        row.update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_patient", e))
    }

    /// Soft delete; the row and its audit trail remain
    pub async fn deactivate(&self, id: &str) -> Result<patient::Model, InternalError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| InternalError::not_found("Patient", id))?;

        let mut row: patient::ActiveModel = existing.into();
        row.is_active = Set(false);
        row.updated_at = Set(Utc::now().timestamp());

        row.update(&self.db)
            .await
            .map_err(|e| InternalError::database("deactivate_patient", e))
    }
}

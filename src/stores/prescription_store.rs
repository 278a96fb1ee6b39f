use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::services::identifiers;
use crate::types::db::prescription;

const MAX_RX_ATTEMPTS: usize = 3;

#[derive(Debug, Clone)]
pub struct NewPrescription {
    pub patient_id: String,
    pub provider_id: String,
    pub medication_name: String,
    pub strength: String,
    pub dosage_form: String,
    pub quantity: i32,
    pub refills: i32,
    pub sig: String,
    pub route: String,
    pub frequency: String,
    pub is_controlled: bool,
}

pub struct PrescriptionStore {
    db: DatabaseConnection,
}

impl PrescriptionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Write a prescription, generating an RX number.
    ///
    /// Same collision handling as patient MRNs: unique constraint plus a
    /// bounded retry with a fresh suffix.
    pub async fn create(
        &self,
        data: NewPrescription,
    ) -> Result<prescription::Model, InternalError> {
        for _ in 0..MAX_RX_ATTEMPTS {
            let rx_number = identifiers::generate_rx_number();
            match self.insert_with_rx(data.clone(), rx_number).await {
                Ok(model) => return Ok(model),
                Err(InternalError::UniqueViolation { .. }) => {
                    tracing::warn!("rx number collision, retrying with a fresh suffix");
                    continue;
                }
                Err(other) => return Err(other),
            }
        }

        Err(InternalError::UniqueViolation { field: "rx_number" })
    }

    async fn insert_with_rx(
        &self,
        data: NewPrescription,
        rx_number: String,
    ) -> Result<prescription::Model, InternalError> {
        let row = prescription::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            rx_number: Set(rx_number),
            patient_id: Set(data.patient_id),
            provider_id: Set(data.provider_id),
            medication_name: Set(data.medication_name),
            strength: Set(data.strength),
            dosage_form: Set(data.dosage_form),
            quantity: Set(data.quantity),
            refills: Set(data.refills),
            sig: Set(data.sig),
            route: Set(data.route),
            frequency: Set(data.frequency),
            is_controlled: Set(data.is_controlled),
            created_at: Set(Utc::now().timestamp()),
        };

        row.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                InternalError::UniqueViolation { field: "rx_number" }
            } else {
                InternalError::database("insert_prescription", e)
            }
        })
    }

    /// Newest first, optionally narrowed to a patient
    pub async fn list(
        &self,
        patient_id: Option<&str>,
    ) -> Result<Vec<prescription::Model>, InternalError> {
        let mut query = prescription::Entity::find();

        if let Some(patient_id) = patient_id {
            query = query.filter(prescription::Column::PatientId.eq(patient_id));
        }

        query
            .order_by_desc(prescription::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_prescriptions", e))
    }
}

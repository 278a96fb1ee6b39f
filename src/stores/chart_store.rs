use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::types::db::{allergy, medication, vital_sign};

#[derive(Debug, Clone)]
pub struct NewVitals {
    pub patient_id: String,
    pub blood_pressure_systolic: Option<i32>,
    pub blood_pressure_diastolic: Option<i32>,
    pub heart_rate: Option<i32>,
    pub temperature: Option<f64>,
    pub respiratory_rate: Option<i32>,
    pub oxygen_saturation: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub pain_level: Option<i32>,
    pub recorded_by: String,
}

#[derive(Debug, Clone)]
pub struct NewAllergy {
    pub patient_id: String,
    pub allergen: String,
    pub allergy_type: String,
    pub reaction: String,
    pub severity: String,
}

#[derive(Debug, Clone)]
pub struct NewMedication {
    pub patient_id: String,
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub route: String,
    pub prescribed_by: Option<String>,
}

/// Repository for patient chart data: vitals, allergies, medications
pub struct ChartStore {
    db: DatabaseConnection,
}

impl ChartStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn record_vitals(&self, data: NewVitals) -> Result<vital_sign::Model, InternalError> {
        let row = vital_sign::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            patient_id: Set(data.patient_id),
            blood_pressure_systolic: Set(data.blood_pressure_systolic),
            blood_pressure_diastolic: Set(data.blood_pressure_diastolic),
            heart_rate: Set(data.heart_rate),
            temperature: Set(data.temperature),
            respiratory_rate: Set(data.respiratory_rate),
            oxygen_saturation: Set(data.oxygen_saturation),
            weight: Set(data.weight),
            height: Set(data.height),
            pain_level: Set(data.pain_level),
            recorded_by: Set(data.recorded_by),
            recorded_at: Set(Utc::now().timestamp()),
        };

        row.insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_vitals", e))
    }

    pub async fn vitals_for_patient(
        &self,
        patient_id: &str,
    ) -> Result<Vec<vital_sign::Model>, InternalError> {
        vital_sign::Entity::find()
            .filter(vital_sign::Column::PatientId.eq(patient_id))
            .order_by_desc(vital_sign::Column::RecordedAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_vitals", e))
    }

    pub async fn add_allergy(&self, data: NewAllergy) -> Result<allergy::Model, InternalError> {
        let row = allergy::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            patient_id: Set(data.patient_id),
            allergen: Set(data.allergen),
            allergy_type: Set(data.allergy_type),
            reaction: Set(data.reaction),
            severity: Set(data.severity),
            created_at: Set(Utc::now().timestamp()),
        };

        row.insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_allergy", e))
    }

    pub async fn allergies_for_patient(
        &self,
        patient_id: &str,
    ) -> Result<Vec<allergy::Model>, InternalError> {
        allergy::Entity::find()
            .filter(allergy::Column::PatientId.eq(patient_id))
            .order_by_desc(allergy::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_allergies", e))
    }

    pub async fn add_medication(
        &self,
        data: NewMedication,
    ) -> Result<medication::Model, InternalError> {
        let row = medication::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            patient_id: Set(data.patient_id),
            medication_name: Set(data.medication_name),
            dosage: Set(data.dosage),
            frequency: Set(data.frequency),
            route: Set(data.route),
            prescribed_by: Set(data.prescribed_by),
            is_active: Set(true),
            created_at: Set(Utc::now().timestamp()),
        };

        row.insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_medication", e))
    }

    pub async fn medications_for_patient(
        &self,
        patient_id: &str,
    ) -> Result<Vec<medication::Model>, InternalError> {
        medication::Entity::find()
            .filter(medication::Column::PatientId.eq(patient_id))
            .order_by_desc(medication::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_medications", e))
    }
}

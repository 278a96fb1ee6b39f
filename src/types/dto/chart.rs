use poem_openapi::Object;

use crate::types::db::{allergy, medication};

/// Request model for documenting an allergy
#[derive(Object, Debug)]
pub struct CreateAllergyRequest {
    #[oai(validator(min_length = 1))]
    pub allergen: String,
    #[oai(validator(min_length = 1))]
    pub allergy_type: String,
    #[oai(validator(min_length = 1))]
    pub reaction: String,
    #[oai(validator(min_length = 1))]
    pub severity: String,
}

#[derive(Object, Debug)]
pub struct AllergyResponse {
    pub id: String,
    pub patient_id: String,
    pub allergen: String,
    pub allergy_type: String,
    pub reaction: String,
    pub severity: String,
    pub created_at: i64,
}

impl From<allergy::Model> for AllergyResponse {
    fn from(model: allergy::Model) -> Self {
        Self {
            id: model.id,
            patient_id: model.patient_id,
            allergen: model.allergen,
            allergy_type: model.allergy_type,
            reaction: model.reaction,
            severity: model.severity,
            created_at: model.created_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct AllergyListResponse {
    pub allergies: Vec<AllergyResponse>,
}

/// Request model for recording an active medication
#[derive(Object, Debug)]
pub struct CreateMedicationRequest {
    #[oai(validator(min_length = 1))]
    pub medication_name: String,
    #[oai(validator(min_length = 1))]
    pub dosage: String,
    #[oai(validator(min_length = 1))]
    pub frequency: String,
    #[oai(validator(min_length = 1))]
    pub route: String,
    pub prescribed_by: Option<String>,
}

#[derive(Object, Debug)]
pub struct MedicationResponse {
    pub id: String,
    pub patient_id: String,
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub route: String,
    pub prescribed_by: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
}

impl From<medication::Model> for MedicationResponse {
    fn from(model: medication::Model) -> Self {
        Self {
            id: model.id,
            patient_id: model.patient_id,
            medication_name: model.medication_name,
            dosage: model.dosage,
            frequency: model.frequency,
            route: model.route,
            prescribed_by: model.prescribed_by,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct MedicationListResponse {
    pub medications: Vec<MedicationResponse>,
}

use poem_openapi::Object;

use crate::types::db::prescription;

/// Request model for e-prescribing
#[derive(Object, Debug)]
pub struct CreatePrescriptionRequest {
    #[oai(validator(min_length = 1))]
    pub patient_id: String,
    #[oai(validator(min_length = 1))]
    pub provider_id: String,
    #[oai(validator(min_length = 1))]
    pub medication_name: String,
    #[oai(validator(min_length = 1))]
    pub strength: String,
    #[oai(validator(min_length = 1))]
    pub dosage_form: String,
    pub quantity: i32,
    pub refills: i32,
    /// Patient-facing instructions
    #[oai(validator(min_length = 1))]
    pub sig: String,
    #[oai(validator(min_length = 1))]
    pub route: String,
    #[oai(validator(min_length = 1))]
    pub frequency: String,
    pub is_controlled: Option<bool>,
}

#[derive(Object, Debug)]
pub struct PrescriptionResponse {
    pub id: String,
    pub rx_number: String,
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
    pub created_at: i64,
}

impl From<prescription::Model> for PrescriptionResponse {
    fn from(model: prescription::Model) -> Self {
        Self {
            id: model.id,
            rx_number: model.rx_number,
            patient_id: model.patient_id,
            provider_id: model.provider_id,
            medication_name: model.medication_name,
            strength: model.strength,
            dosage_form: model.dosage_form,
            quantity: model.quantity,
            refills: model.refills,
            sig: model.sig,
            route: model.route,
            frequency: model.frequency,
            is_controlled: model.is_controlled,
            created_at: model.created_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct PrescriptionListResponse {
    pub prescriptions: Vec<PrescriptionResponse>,
}

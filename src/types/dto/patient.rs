use poem_openapi::Object;

use crate::types::db::patient;
use crate::types::dto::common::Pagination;

/// Request model for patient registration
#[derive(Object, Debug)]
pub struct CreatePatientRequest {
    #[oai(validator(min_length = 1, max_length = 100))]
    pub first_name: String,
    #[oai(validator(min_length = 1, max_length = 100))]
    pub last_name: String,
    pub middle_name: Option<String>,
    /// ISO date, YYYY-MM-DD
    #[oai(validator(pattern = r"^\d{4}-\d{2}-\d{2}$"))]
    pub date_of_birth: String,
    #[oai(validator(min_length = 1))]
    pub gender: String,
    pub blood_group: Option<String>,
    pub email: Option<String>,
    #[oai(validator(min_length = 10, max_length = 20))]
    pub phone_number: String,
    #[oai(validator(min_length = 1))]
    pub address: String,
    #[oai(validator(min_length = 1))]
    pub city: String,
    #[oai(validator(min_length = 1))]
    pub state: String,
    #[oai(validator(min_length = 5))]
    pub zip_code: String,
    pub country: Option<String>,
    #[oai(validator(min_length = 1))]
    pub emergency_contact_name: String,
    #[oai(validator(min_length = 10))]
    pub emergency_contact_phone: String,
    #[oai(validator(min_length = 1))]
    pub emergency_contact_relation: String,
    pub insurance_provider: Option<String>,
    pub insurance_policy_number: Option<String>,
    pub preferred_language: Option<String>,
    /// Social security number; encrypted before persistence
    pub ssn: Option<String>,
}

/// Partial update of patient contact and insurance details
#[derive(Object, Debug)]
pub struct UpdatePatientRequest {
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

/// Full patient record as returned by the detail endpoint
#[derive(Object, Debug)]
pub struct PatientResponse {
    pub id: String,
    pub mrn: String,
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
    /// Decrypted for display; the redacted placeholder when decryption fails
    pub ssn: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
}

impl PatientResponse {
    /// Build a response from a row, with the SSN already decrypted (or
    /// redacted) by the caller.
    pub fn from_model(model: patient::Model, ssn: Option<String>) -> Self {
        Self {
            id: model.id,
            mrn: model.mrn,
            first_name: model.first_name,
            last_name: model.last_name,
            middle_name: model.middle_name,
            date_of_birth: model.date_of_birth,
            gender: model.gender,
            blood_group: model.blood_group,
            email: model.email,
            phone_number: model.phone_number,
            address: model.address,
            city: model.city,
            state: model.state,
            zip_code: model.zip_code,
            country: model.country,
            emergency_contact_name: model.emergency_contact_name,
            emergency_contact_phone: model.emergency_contact_phone,
            emergency_contact_relation: model.emergency_contact_relation,
            insurance_provider: model.insurance_provider,
            insurance_policy_number: model.insurance_policy_number,
            preferred_language: model.preferred_language,
            ssn,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

/// Abbreviated row for list views; excludes encrypted fields
#[derive(Object, Debug)]
pub struct PatientSummary {
    pub id: String,
    pub mrn: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub blood_group: Option<String>,
    pub created_at: i64,
}

impl From<patient::Model> for PatientSummary {
    fn from(model: patient::Model) -> Self {
        Self {
            id: model.id,
            mrn: model.mrn,
            first_name: model.first_name,
            last_name: model.last_name,
            date_of_birth: model.date_of_birth,
            gender: model.gender,
            phone_number: model.phone_number,
            email: model.email,
            blood_group: model.blood_group,
            created_at: model.created_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct PatientListResponse {
    pub patients: Vec<PatientSummary>,
    pub pagination: Pagination,
}

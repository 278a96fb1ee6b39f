use poem_openapi::Object;

use crate::types::db::provider;

/// Request model for creating a provider profile for a staff user
#[derive(Object, Debug)]
pub struct CreateProviderRequest {
    #[oai(validator(min_length = 1))]
    pub user_id: String,
    #[oai(validator(min_length = 1))]
    pub first_name: String,
    #[oai(validator(min_length = 1))]
    pub last_name: String,
    #[oai(validator(min_length = 10, max_length = 10))]
    pub npi_number: String,
    #[oai(validator(min_length = 1))]
    pub specialty: String,
    pub license_number: Option<String>,
    pub phone_number: Option<String>,
    pub accepting_new_patients: Option<bool>,
}

#[derive(Object, Debug)]
pub struct ProviderResponse {
    pub id: String,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub npi_number: String,
    pub specialty: String,
    pub license_number: Option<String>,
    pub phone_number: Option<String>,
    pub accepting_new_patients: bool,
    pub created_at: i64,
}

impl From<provider::Model> for ProviderResponse {
    fn from(model: provider::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            first_name: model.first_name,
            last_name: model.last_name,
            npi_number: model.npi_number,
            specialty: model.specialty,
            license_number: model.license_number,
            phone_number: model.phone_number,
            accepting_new_patients: model.accepting_new_patients,
            created_at: model.created_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct ProviderListResponse {
    pub providers: Vec<ProviderResponse>,
}

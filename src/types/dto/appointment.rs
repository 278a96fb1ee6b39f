use poem_openapi::Object;

use crate::types::db::appointment;

/// Request model for scheduling an appointment
#[derive(Object, Debug)]
pub struct CreateAppointmentRequest {
    #[oai(validator(min_length = 1))]
    pub patient_id: String,
    #[oai(validator(min_length = 1))]
    pub provider_id: String,
    /// Start of the slot, Unix timestamp
    pub scheduled_at: i64,
    pub duration_minutes: i32,
    #[oai(validator(min_length = 1))]
    pub appointment_type: String,
    #[oai(validator(min_length = 1))]
    pub reason: String,
    pub notes: Option<String>,
}

#[derive(Object, Debug)]
pub struct AppointmentResponse {
    pub id: String,
    pub patient_id: String,
    pub provider_id: String,
    pub scheduled_at: i64,
    pub duration_minutes: i32,
    pub appointment_type: String,
    pub status: String,
    pub reason: String,
    pub notes: Option<String>,
    pub created_at: i64,
}

impl From<appointment::Model> for AppointmentResponse {
    fn from(model: appointment::Model) -> Self {
        Self {
            id: model.id,
            patient_id: model.patient_id,
            provider_id: model.provider_id,
            scheduled_at: model.scheduled_at,
            duration_minutes: model.duration_minutes,
            appointment_type: model.appointment_type,
            status: model.status,
            reason: model.reason,
            notes: model.notes,
            created_at: model.created_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct AppointmentListResponse {
    pub appointments: Vec<AppointmentResponse>,
}

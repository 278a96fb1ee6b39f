use poem_openapi::Object;

use crate::types::db::vital_sign;

/// Request model for recording a set of vital signs.
///
/// Ranges are checked in the handler so that all violations are reported
/// together.
#[derive(Object, Debug)]
pub struct RecordVitalsRequest {
    #[oai(validator(min_length = 1))]
    pub patient_id: String,
    pub blood_pressure_systolic: Option<i32>,
    pub blood_pressure_diastolic: Option<i32>,
    pub heart_rate: Option<i32>,
    /// Fahrenheit
    pub temperature: Option<f64>,
    pub respiratory_rate: Option<i32>,
    pub oxygen_saturation: Option<i32>,
    /// Pounds
    pub weight: Option<f64>,
    /// Inches
    pub height: Option<f64>,
    pub pain_level: Option<i32>,
}

#[derive(Object, Debug)]
pub struct VitalSignResponse {
    pub id: String,
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
    pub recorded_at: i64,
}

impl From<vital_sign::Model> for VitalSignResponse {
    fn from(model: vital_sign::Model) -> Self {
        Self {
            id: model.id,
            patient_id: model.patient_id,
            blood_pressure_systolic: model.blood_pressure_systolic,
            blood_pressure_diastolic: model.blood_pressure_diastolic,
            heart_rate: model.heart_rate,
            temperature: model.temperature,
            respiratory_rate: model.respiratory_rate,
            oxygen_saturation: model.oxygen_saturation,
            weight: model.weight,
            height: model.height,
            pain_level: model.pain_level,
            recorded_by: model.recorded_by,
            recorded_at: model.recorded_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct VitalSignListResponse {
    pub vitals: Vec<VitalSignResponse>,
}

use poem::Request;
use poem_openapi::param::Query;
use poem_openapi::{payload::Json, ApiResponse, OpenApi, Tags};
use std::sync::Arc;

use crate::api::guard::{AccessGate, CLINICAL_STAFF, VITALS_RECORDERS};
use crate::errors::ApiError;
use crate::services::AuditLogger;
use crate::stores::chart_store::NewVitals;
use crate::stores::{ChartStore, PatientStore};
use crate::types::dto::vitals::{RecordVitalsRequest, VitalSignListResponse, VitalSignResponse};
use crate::types::internal::audit::AuditAction;
use crate::types::internal::context::ClientMeta;

/// Vitals recording endpoints
pub struct VitalsApi {
    chart_store: Arc<ChartStore>,
    patient_store: Arc<PatientStore>,
    audit_logger: Arc<AuditLogger>,
    gate: Arc<AccessGate>,
}

#[derive(Tags)]
enum VitalsTags {
    /// Vital signs
    Vitals,
}

#[derive(ApiResponse)]
pub enum VitalsRecorded {
    /// Vitals recorded
    #[oai(status = 201)]
    Created(Json<VitalSignResponse>),
}

impl VitalsApi {
    pub fn new(
        chart_store: Arc<ChartStore>,
        patient_store: Arc<PatientStore>,
        audit_logger: Arc<AuditLogger>,
        gate: Arc<AccessGate>,
    ) -> Self {
        Self {
            chart_store,
            patient_store,
            audit_logger,
            gate,
        }
    }
}

#[OpenApi]
impl VitalsApi {
    /// Vitals history for a patient, newest first
    #[oai(path = "/vitals", method = "get", tag = "VitalsTags::Vitals")]
    async fn list(
        &self,
        req: &Request,
        patient_id: Query<String>,
    ) -> Result<Json<VitalSignListResponse>, ApiError> {
        self.gate.require(req, CLINICAL_STAFF, "vitals").await?;

        let vitals = self.chart_store.vitals_for_patient(&patient_id.0).await?;

        Ok(Json(VitalSignListResponse {
            vitals: vitals.into_iter().map(VitalSignResponse::from).collect(),
        }))
    }

    /// Record a set of vital signs
    #[oai(path = "/vitals", method = "post", tag = "VitalsTags::Vitals")]
    async fn record(
        &self,
        req: &Request,
        body: Json<RecordVitalsRequest>,
    ) -> Result<VitalsRecorded, ApiError> {
        let caller = self.gate.require(req, VITALS_RECORDERS, "vitals").await?;
        let body = body.0;

        let violations = validate_ranges(&body);
        if !violations.is_empty() {
            return Err(ApiError::validation(violations));
        }

        let patient = self
            .patient_store
            .find_by_id(&body.patient_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Patient"))?;

        let vitals = self
            .chart_store
            .record_vitals(NewVitals {
                patient_id: patient.id.clone(),
                blood_pressure_systolic: body.blood_pressure_systolic,
                blood_pressure_diastolic: body.blood_pressure_diastolic,
                heart_rate: body.heart_rate,
                temperature: body.temperature,
                respiratory_rate: body.respiratory_rate,
                oxygen_saturation: body.oxygen_saturation,
                weight: body.weight,
                height: body.height,
                pain_level: body.pain_level,
                recorded_by: caller.claims.email.clone(),
            })
            .await?;

        let meta = ClientMeta::from_request(req);
        self.audit_logger
            .entity_access(
                &caller.claims.sub,
                AuditAction::RecordVitals,
                "VitalSign",
                &vitals.id,
                format!("Recorded vital signs for {}", patient.mrn),
                &meta,
            )
            .await;

        Ok(VitalsRecorded::Created(Json(VitalSignResponse::from(vitals))))
    }
}

/// Clinical plausibility ranges; every violation is reported
fn validate_ranges(body: &RecordVitalsRequest) -> Vec<String> {
    let mut violations = Vec::new();

    let mut check_i32 = |value: Option<i32>, min: i32, max: i32, field: &str| {
        if let Some(v) = value {
            if v < min || v > max {
                violations.push(format!("{field} must be between {min} and {max}"));
            }
        }
    };

    check_i32(body.blood_pressure_systolic, 50, 300, "blood_pressure_systolic");
    check_i32(
        body.blood_pressure_diastolic,
        30,
        200,
        "blood_pressure_diastolic",
    );
    check_i32(body.heart_rate, 30, 250, "heart_rate");
    check_i32(body.respiratory_rate, 8, 60, "respiratory_rate");
    check_i32(body.oxygen_saturation, 70, 100, "oxygen_saturation");
    check_i32(body.pain_level, 0, 10, "pain_level");

    if let Some(t) = body.temperature {
        if !(90.0..=115.0).contains(&t) {
            violations.push("temperature must be between 90 and 115".to_string());
        }
    }
    if let Some(w) = body.weight {
        if !(1.0..=1000.0).contains(&w) {
            violations.push("weight must be between 1 and 1000".to_string());
        }
    }
    if let Some(h) = body.height {
        if !(12.0..=96.0).contains(&h) {
            violations.push("height must be between 12 and 96".to_string());
        }
    }

    violations
}

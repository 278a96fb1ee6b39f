use poem::Request;
use poem_openapi::param::Query;
use poem_openapi::{payload::Json, ApiResponse, OpenApi, Tags};
use std::sync::Arc;

use crate::api::guard::{AccessGate, PRESCRIBERS};
use crate::errors::ApiError;
use crate::services::AuditLogger;
use crate::stores::prescription_store::NewPrescription;
use crate::stores::{PatientStore, PrescriptionStore};
use crate::types::dto::prescription::{
    CreatePrescriptionRequest, PrescriptionListResponse, PrescriptionResponse,
};
use crate::types::internal::audit::AuditAction;
use crate::types::internal::auth::Role;
use crate::types::internal::context::ClientMeta;

/// Roles that may review prescriptions (dispensing included)
const PRESCRIPTION_VIEWERS: &[Role] = &[
    Role::SuperAdmin,
    Role::Admin,
    Role::Doctor,
    Role::Nurse,
    Role::Pharmacist,
];

const MAX_REFILLS: i32 = 11;

/// E-prescribing endpoints
pub struct PrescriptionsApi {
    prescription_store: Arc<PrescriptionStore>,
    patient_store: Arc<PatientStore>,
    audit_logger: Arc<AuditLogger>,
    gate: Arc<AccessGate>,
}

#[derive(Tags)]
enum PrescriptionTags {
    /// E-prescribing
    Prescriptions,
}

#[derive(ApiResponse)]
pub enum PrescriptionCreated {
    /// Prescription written
    #[oai(status = 201)]
    Created(Json<PrescriptionResponse>),
}

impl PrescriptionsApi {
    pub fn new(
        prescription_store: Arc<PrescriptionStore>,
        patient_store: Arc<PatientStore>,
        audit_logger: Arc<AuditLogger>,
        gate: Arc<AccessGate>,
    ) -> Self {
        Self {
            prescription_store,
            patient_store,
            audit_logger,
            gate,
        }
    }
}

#[OpenApi]
impl PrescriptionsApi {
    /// List prescriptions, optionally narrowed to a patient
    #[oai(
        path = "/prescriptions",
        method = "get",
        tag = "PrescriptionTags::Prescriptions"
    )]
    async fn list(
        &self,
        req: &Request,
        patient_id: Query<Option<String>>,
    ) -> Result<Json<PrescriptionListResponse>, ApiError> {
        self.gate
            .require(req, PRESCRIPTION_VIEWERS, "prescriptions")
            .await?;

        let prescriptions = self
            .prescription_store
            .list(patient_id.0.as_deref())
            .await?;

        Ok(Json(PrescriptionListResponse {
            prescriptions: prescriptions
                .into_iter()
                .map(PrescriptionResponse::from)
                .collect(),
        }))
    }

    /// Write a prescription; restricted to prescribing roles
    #[oai(
        path = "/prescriptions",
        method = "post",
        tag = "PrescriptionTags::Prescriptions"
    )]
    async fn create(
        &self,
        req: &Request,
        body: Json<CreatePrescriptionRequest>,
    ) -> Result<PrescriptionCreated, ApiError> {
        let caller = self.gate.require(req, PRESCRIBERS, "prescriptions").await?;
        let body = body.0;

        let mut violations = Vec::new();
        if body.quantity < 1 {
            violations.push("quantity must be at least 1".to_string());
        }
        if body.refills < 0 || body.refills > MAX_REFILLS {
            violations.push(format!("refills must be between 0 and {MAX_REFILLS}"));
        }
        if !violations.is_empty() {
            return Err(ApiError::validation(violations));
        }

        let patient = self
            .patient_store
            .find_by_id(&body.patient_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Patient"))?;

        let prescription = self
            .prescription_store
            .create(NewPrescription {
                patient_id: patient.id.clone(),
                provider_id: body.provider_id,
                medication_name: body.medication_name,
                strength: body.strength,
                dosage_form: body.dosage_form,
                quantity: body.quantity,
                refills: body.refills,
                sig: body.sig,
                route: body.route,
                frequency: body.frequency,
                is_controlled: body.is_controlled.unwrap_or(false),
            })
            .await?;

        let meta = ClientMeta::from_request(req);
        self.audit_logger
            .entity_access(
                &caller.claims.sub,
                AuditAction::CreatePrescription,
                "Prescription",
                &prescription.id,
                format!(
                    "Prescription {} written for {}: {} {}",
                    prescription.rx_number,
                    patient.mrn,
                    prescription.medication_name,
                    prescription.strength
                ),
                &meta,
            )
            .await;

        Ok(PrescriptionCreated::Created(Json(
            PrescriptionResponse::from(prescription),
        )))
    }
}

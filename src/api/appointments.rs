use poem::Request;
use poem_openapi::param::Query;
use poem_openapi::{payload::Json, ApiResponse, OpenApi, Tags};
use std::sync::Arc;

use crate::api::guard::{AccessGate, CLINICAL_STAFF};
use crate::errors::ApiError;
use crate::services::AuditLogger;
use crate::stores::appointment_store::NewAppointment;
use crate::stores::{AppointmentStore, PatientStore, ProviderStore};
use crate::types::dto::appointment::{
    AppointmentListResponse, AppointmentResponse, CreateAppointmentRequest,
};
use crate::types::internal::audit::AuditAction;
use crate::types::internal::context::ClientMeta;

const MIN_DURATION_MINUTES: i32 = 15;
const MAX_DURATION_MINUTES: i32 = 240;

/// Scheduling endpoints
pub struct AppointmentsApi {
    appointment_store: Arc<AppointmentStore>,
    patient_store: Arc<PatientStore>,
    provider_store: Arc<ProviderStore>,
    audit_logger: Arc<AuditLogger>,
    gate: Arc<AccessGate>,
}

#[derive(Tags)]
enum AppointmentTags {
    /// Appointment scheduling
    Appointments,
}

#[derive(ApiResponse)]
pub enum AppointmentCreated {
    /// Appointment scheduled
    #[oai(status = 201)]
    Created(Json<AppointmentResponse>),
}

impl AppointmentsApi {
    pub fn new(
        appointment_store: Arc<AppointmentStore>,
        patient_store: Arc<PatientStore>,
        provider_store: Arc<ProviderStore>,
        audit_logger: Arc<AuditLogger>,
        gate: Arc<AccessGate>,
    ) -> Self {
        Self {
            appointment_store,
            patient_store,
            provider_store,
            audit_logger,
            gate,
        }
    }
}

#[OpenApi]
impl AppointmentsApi {
    /// List appointments, optionally narrowed to a patient or provider
    #[oai(path = "/appointments", method = "get", tag = "AppointmentTags::Appointments")]
    async fn list(
        &self,
        req: &Request,
        patient_id: Query<Option<String>>,
        provider_id: Query<Option<String>>,
    ) -> Result<Json<AppointmentListResponse>, ApiError> {
        self.gate.require(req, CLINICAL_STAFF, "appointments").await?;

        let appointments = self
            .appointment_store
            .list(patient_id.0.as_deref(), provider_id.0.as_deref())
            .await?;

        Ok(Json(AppointmentListResponse {
            appointments: appointments
                .into_iter()
                .map(AppointmentResponse::from)
                .collect(),
        }))
    }

    /// Schedule an appointment; double-booking a provider is a conflict
    #[oai(path = "/appointments", method = "post", tag = "AppointmentTags::Appointments")]
    async fn create(
        &self,
        req: &Request,
        body: Json<CreateAppointmentRequest>,
    ) -> Result<AppointmentCreated, ApiError> {
        let caller = self.gate.require(req, CLINICAL_STAFF, "appointments").await?;
        let body = body.0;

        if body.duration_minutes < MIN_DURATION_MINUTES
            || body.duration_minutes > MAX_DURATION_MINUTES
        {
            return Err(ApiError::validation(vec![format!(
                "duration_minutes must be between {MIN_DURATION_MINUTES} and {MAX_DURATION_MINUTES}"
            )]));
        }

        let patient = self
            .patient_store
            .find_by_id(&body.patient_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Patient"))?;
        let provider = self
            .provider_store
            .find_by_id(&body.provider_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Provider"))?;

        if self
            .appointment_store
            .has_conflict(&provider.id, body.scheduled_at)
            .await?
        {
            return Err(ApiError::conflict("Time slot is already booked"));
        }

        let appointment = self
            .appointment_store
            .create(NewAppointment {
                patient_id: patient.id.clone(),
                provider_id: provider.id.clone(),
                scheduled_at: body.scheduled_at,
                duration_minutes: body.duration_minutes,
                appointment_type: body.appointment_type,
                reason: body.reason,
                notes: body.notes,
            })
            .await?;

        let meta = ClientMeta::from_request(req);
        self.audit_logger
            .entity_access(
                &caller.claims.sub,
                AuditAction::CreateAppointment,
                "Appointment",
                &appointment.id,
                format!(
                    "Appointment scheduled for {} with Dr. {}",
                    patient.mrn, provider.last_name
                ),
                &meta,
            )
            .await;

        Ok(AppointmentCreated::Created(Json(AppointmentResponse::from(
            appointment,
        ))))
    }
}

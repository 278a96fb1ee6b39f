use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{payload::Json, ApiResponse, OpenApi, Tags};
use std::sync::Arc;

use crate::api::guard::{AccessGate, CLINICAL_STAFF, VITALS_RECORDERS};
use crate::errors::ApiError;
use crate::services::{AuditLogger, FieldCrypto};
use crate::stores::chart_store::{NewAllergy, NewMedication};
use crate::stores::patient_store::{NewPatient, PatientChanges};
use crate::stores::{ChartStore, PatientStore};
use crate::types::dto::chart::{
    AllergyListResponse, AllergyResponse, CreateAllergyRequest, CreateMedicationRequest,
    MedicationListResponse, MedicationResponse,
};
use crate::types::dto::common::{MessageResponse, Pagination};
use crate::types::dto::patient::{
    CreatePatientRequest, PatientListResponse, PatientResponse, PatientSummary,
    UpdatePatientRequest,
};
use crate::types::internal::audit::AuditAction;
use crate::types::internal::context::ClientMeta;

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

/// Patient registry endpoints, including chart subresources
pub struct PatientsApi {
    patient_store: Arc<PatientStore>,
    chart_store: Arc<ChartStore>,
    field_crypto: Arc<FieldCrypto>,
    audit_logger: Arc<AuditLogger>,
    gate: Arc<AccessGate>,
}

#[derive(Tags)]
enum PatientTags {
    /// Patient registry
    Patients,
}

#[derive(ApiResponse)]
pub enum PatientCreated {
    /// Patient registered
    #[oai(status = 201)]
    Created(Json<PatientResponse>),
}

#[derive(ApiResponse)]
pub enum AllergyCreated {
    #[oai(status = 201)]
    Created(Json<AllergyResponse>),
}

#[derive(ApiResponse)]
pub enum MedicationCreated {
    #[oai(status = 201)]
    Created(Json<MedicationResponse>),
}

impl PatientsApi {
    pub fn new(
        patient_store: Arc<PatientStore>,
        chart_store: Arc<ChartStore>,
        field_crypto: Arc<FieldCrypto>,
        audit_logger: Arc<AuditLogger>,
        gate: Arc<AccessGate>,
    ) -> Self {
        Self {
            patient_store,
            chart_store,
            field_crypto,
            audit_logger,
            gate,
        }
    }
}

#[OpenApi]
impl PatientsApi {
    /// List active patients with optional search and paging
    #[oai(path = "/patients", method = "get", tag = "PatientTags::Patients")]
    async fn list(
        &self,
        req: &Request,
        search: Query<Option<String>>,
        page: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<PatientListResponse>, ApiError> {
        self.gate.require(req, CLINICAL_STAFF, "patients").await?;

        let page = page.0.unwrap_or(1).max(1);
        let limit = limit.0.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        let (patients, total) = self
            .patient_store
            .list(search.0.as_deref(), page, limit)
            .await?;

        Ok(Json(PatientListResponse {
            patients: patients.into_iter().map(PatientSummary::from).collect(),
            pagination: Pagination {
                page,
                limit,
                total,
                total_pages: total.div_ceil(limit),
            },
        }))
    }

    /// Register a new patient; generates the MRN and encrypts the SSN
    #[oai(path = "/patients", method = "post", tag = "PatientTags::Patients")]
    async fn create(
        &self,
        req: &Request,
        body: Json<CreatePatientRequest>,
    ) -> Result<PatientCreated, ApiError> {
        let caller = self.gate.require(req, CLINICAL_STAFF, "patients").await?;
        let body = body.0;

        let ssn_encrypted = match body.ssn.as_deref() {
            Some(ssn) => Some(self.field_crypto.encrypt_field(ssn)?),
            None => None,
        };

        let patient = self
            .patient_store
            .create(NewPatient {
                first_name: body.first_name,
                last_name: body.last_name,
                middle_name: body.middle_name,
                date_of_birth: body.date_of_birth,
                gender: body.gender,
                blood_group: body.blood_group,
                email: body.email,
                phone_number: body.phone_number,
                address: body.address,
                city: body.city,
                state: body.state,
                zip_code: body.zip_code,
                country: body.country.unwrap_or_else(|| "USA".to_string()),
                emergency_contact_name: body.emergency_contact_name,
                emergency_contact_phone: body.emergency_contact_phone,
                emergency_contact_relation: body.emergency_contact_relation,
                insurance_provider: body.insurance_provider,
                insurance_policy_number: body.insurance_policy_number,
                preferred_language: body.preferred_language,
                ssn_encrypted,
            })
            .await?;

        let meta = ClientMeta::from_request(req);
        self.audit_logger
            .patient_access(
                &caller.claims.sub,
                AuditAction::CreatePatient,
                &patient.id,
                format!(
                    "Patient created: {} {} ({})",
                    patient.first_name, patient.last_name, patient.mrn
                ),
                &meta,
            )
            .await;

        Ok(PatientCreated::Created(Json(PatientResponse::from_model(
            patient, body.ssn,
        ))))
    }

    /// Full patient record; SSN decrypted for display
    #[oai(path = "/patients/:id", method = "get", tag = "PatientTags::Patients")]
    async fn get(&self, req: &Request, id: Path<String>) -> Result<Json<PatientResponse>, ApiError> {
        let caller = self.gate.require(req, CLINICAL_STAFF, "patients").await?;

        let patient = self
            .patient_store
            .find_by_id(&id.0)
            .await?
            .ok_or_else(|| ApiError::not_found("Patient"))?;

        let ssn = patient
            .ssn_encrypted
            .as_deref()
            .map(|stored| self.field_crypto.decrypt_field(stored));

        let meta = ClientMeta::from_request(req);
        self.audit_logger
            .patient_access(
                &caller.claims.sub,
                AuditAction::ViewPatient,
                &patient.id,
                format!("Viewed patient record {}", patient.mrn),
                &meta,
            )
            .await;

        Ok(Json(PatientResponse::from_model(patient, ssn)))
    }

    /// Update contact and insurance details
    #[oai(path = "/patients/:id", method = "put", tag = "PatientTags::Patients")]
    async fn update(
        &self,
        req: &Request,
        id: Path<String>,
        body: Json<UpdatePatientRequest>,
    ) -> Result<Json<PatientResponse>, ApiError> {
        let caller = self.gate.require(req, CLINICAL_STAFF, "patients").await?;
        let body = body.0;

        let patient = self
            .patient_store
            .update(
                &id.0,
                PatientChanges {
                    phone_number: body.phone_number,
                    email: body.email,
                    address: body.address,
                    city: body.city,
                    state: body.state,
                    zip_code: body.zip_code,
                    insurance_provider: body.insurance_provider,
                    insurance_policy_number: body.insurance_policy_number,
                    preferred_language: body.preferred_language,
                },
            )
            .await?;

        let meta = ClientMeta::from_request(req);
        self.audit_logger
            .patient_access(
                &caller.claims.sub,
                AuditAction::EditPatient,
                &patient.id,
                format!("Updated patient demographics ({})", patient.mrn),
                &meta,
            )
            .await;

        let ssn = patient
            .ssn_encrypted
            .as_deref()
            .map(|stored| self.field_crypto.decrypt_field(stored));

        Ok(Json(PatientResponse::from_model(patient, ssn)))
    }

    /// Deactivate a patient; the row and its audit trail remain
    #[oai(path = "/patients/:id", method = "delete", tag = "PatientTags::Patients")]
    async fn deactivate(
        &self,
        req: &Request,
        id: Path<String>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let caller = self.gate.require(req, CLINICAL_STAFF, "patients").await?;

        let patient = self.patient_store.deactivate(&id.0).await?;

        let meta = ClientMeta::from_request(req);
        self.audit_logger
            .patient_access(
                &caller.claims.sub,
                AuditAction::DeletePatient,
                &patient.id,
                format!("Deactivated patient {}", patient.mrn),
                &meta,
            )
            .await;

        Ok(Json(MessageResponse {
            message: "Patient deactivated".to_string(),
        }))
    }

    /// Documented allergies for a patient
    #[oai(
        path = "/patients/:id/allergies",
        method = "get",
        tag = "PatientTags::Patients"
    )]
    async fn list_allergies(
        &self,
        req: &Request,
        id: Path<String>,
    ) -> Result<Json<AllergyListResponse>, ApiError> {
        self.gate.require(req, CLINICAL_STAFF, "allergies").await?;

        let allergies = self.chart_store.allergies_for_patient(&id.0).await?;

        Ok(Json(AllergyListResponse {
            allergies: allergies.into_iter().map(AllergyResponse::from).collect(),
        }))
    }

    /// Document an allergy
    #[oai(
        path = "/patients/:id/allergies",
        method = "post",
        tag = "PatientTags::Patients"
    )]
    async fn add_allergy(
        &self,
        req: &Request,
        id: Path<String>,
        body: Json<CreateAllergyRequest>,
    ) -> Result<AllergyCreated, ApiError> {
        let caller = self.gate.require(req, VITALS_RECORDERS, "allergies").await?;

        let patient = self
            .patient_store
            .find_by_id(&id.0)
            .await?
            .ok_or_else(|| ApiError::not_found("Patient"))?;

        let body = body.0;
        let allergy = self
            .chart_store
            .add_allergy(NewAllergy {
                patient_id: patient.id.clone(),
                allergen: body.allergen,
                allergy_type: body.allergy_type,
                reaction: body.reaction,
                severity: body.severity,
            })
            .await?;

        let meta = ClientMeta::from_request(req);
        self.audit_logger
            .entity_access(
                &caller.claims.sub,
                AuditAction::CreateAllergy,
                "Allergy",
                &allergy.id,
                format!("Documented allergy {} for {}", allergy.allergen, patient.mrn),
                &meta,
            )
            .await;

        Ok(AllergyCreated::Created(Json(AllergyResponse::from(allergy))))
    }

    /// Active medications for a patient
    #[oai(
        path = "/patients/:id/medications",
        method = "get",
        tag = "PatientTags::Patients"
    )]
    async fn list_medications(
        &self,
        req: &Request,
        id: Path<String>,
    ) -> Result<Json<MedicationListResponse>, ApiError> {
        self.gate.require(req, CLINICAL_STAFF, "medications").await?;

        let medications = self.chart_store.medications_for_patient(&id.0).await?;

        Ok(Json(MedicationListResponse {
            medications: medications
                .into_iter()
                .map(MedicationResponse::from)
                .collect(),
        }))
    }

    /// Record a medication on the patient chart
    #[oai(
        path = "/patients/:id/medications",
        method = "post",
        tag = "PatientTags::Patients"
    )]
    async fn add_medication(
        &self,
        req: &Request,
        id: Path<String>,
        body: Json<CreateMedicationRequest>,
    ) -> Result<MedicationCreated, ApiError> {
        let caller = self.gate.require(req, VITALS_RECORDERS, "medications").await?;

        let patient = self
            .patient_store
            .find_by_id(&id.0)
            .await?
            .ok_or_else(|| ApiError::not_found("Patient"))?;

        let body = body.0;
        let medication = self
            .chart_store
            .add_medication(NewMedication {
                patient_id: patient.id.clone(),
                medication_name: body.medication_name,
                dosage: body.dosage,
                frequency: body.frequency,
                route: body.route,
                prescribed_by: body.prescribed_by,
            })
            .await?;

        let meta = ClientMeta::from_request(req);
        self.audit_logger
            .entity_access(
                &caller.claims.sub,
                AuditAction::CreateMedication,
                "Medication",
                &medication.id,
                format!(
                    "Recorded medication {} for {}",
                    medication.medication_name, patient.mrn
                ),
                &meta,
            )
            .await;

        Ok(MedicationCreated::Created(Json(MedicationResponse::from(
            medication,
        ))))
    }
}

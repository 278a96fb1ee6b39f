use poem::Request;
use poem_openapi::{payload::Json, ApiResponse, OpenApi, Tags};
use std::sync::Arc;

use crate::api::guard::{AccessGate, CLINICAL_STAFF, USER_ADMINS};
use crate::errors::ApiError;
use crate::services::AuditLogger;
use crate::stores::provider_store::NewProvider;
use crate::stores::{ProviderStore, UserStore};
use crate::types::dto::provider::{CreateProviderRequest, ProviderListResponse, ProviderResponse};
use crate::types::internal::audit::AuditAction;
use crate::types::internal::context::ClientMeta;

/// Provider directory endpoints
pub struct ProvidersApi {
    provider_store: Arc<ProviderStore>,
    user_store: Arc<UserStore>,
    audit_logger: Arc<AuditLogger>,
    gate: Arc<AccessGate>,
}

#[derive(Tags)]
enum ProviderTags {
    /// Provider directory
    Providers,
}

#[derive(ApiResponse)]
pub enum ProviderCreated {
    /// Provider profile created
    #[oai(status = 201)]
    Created(Json<ProviderResponse>),
}

impl ProvidersApi {
    pub fn new(
        provider_store: Arc<ProviderStore>,
        user_store: Arc<UserStore>,
        audit_logger: Arc<AuditLogger>,
        gate: Arc<AccessGate>,
    ) -> Self {
        Self {
            provider_store,
            user_store,
            audit_logger,
            gate,
        }
    }
}

#[OpenApi]
impl ProvidersApi {
    /// Provider directory
    #[oai(path = "/providers", method = "get", tag = "ProviderTags::Providers")]
    async fn list(&self, req: &Request) -> Result<Json<ProviderListResponse>, ApiError> {
        self.gate.require(req, CLINICAL_STAFF, "providers").await?;

        let providers = self.provider_store.list().await?;

        Ok(Json(ProviderListResponse {
            providers: providers.into_iter().map(ProviderResponse::from).collect(),
        }))
    }

    /// Create a provider profile for an existing staff user
    #[oai(path = "/providers", method = "post", tag = "ProviderTags::Providers")]
    async fn create(
        &self,
        req: &Request,
        body: Json<CreateProviderRequest>,
    ) -> Result<ProviderCreated, ApiError> {
        let caller = self.gate.require(req, USER_ADMINS, "providers").await?;
        let body = body.0;

        let user = self
            .user_store
            .find_by_id(&body.user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User"))?;

        let provider = self
            .provider_store
            .create(NewProvider {
                user_id: user.id,
                first_name: body.first_name,
                last_name: body.last_name,
                npi_number: body.npi_number,
                specialty: body.specialty,
                license_number: body.license_number,
                phone_number: body.phone_number,
                accepting_new_patients: body.accepting_new_patients.unwrap_or(true),
            })
            .await?;

        let meta = ClientMeta::from_request(req);
        self.audit_logger
            .entity_access(
                &caller.claims.sub,
                AuditAction::CreateProvider,
                "Provider",
                &provider.id,
                format!(
                    "Provider profile created: {} {} ({})",
                    provider.first_name, provider.last_name, provider.specialty
                ),
                &meta,
            )
            .await;

        Ok(ProviderCreated::Created(Json(ProviderResponse::from(provider))))
    }
}

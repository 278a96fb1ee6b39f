use poem::middleware::CookieJarManager;
use poem::{Endpoint, EndpointExt, Route};
use poem_openapi::OpenApiService;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::api::security::security_headers;
use crate::api::{
    AccessGate, AppointmentsApi, AuditApi, AuthApi, HealthApi, PatientsApi, PrescriptionsApi,
    ProvidersApi, VitalsApi,
};
use crate::config::SecuritySettings;
use crate::errors::InternalError;
use crate::services::{AuditLogger, AuthService, FieldCrypto, TokenService};
use crate::stores::{
    AppointmentStore, AuditStore, ChartStore, PatientStore, PrescriptionStore, ProviderStore,
    SessionStore, UserStore,
};

/// Shared stores and services, wired once at startup
pub struct AppContext {
    pub db: DatabaseConnection,
    pub settings: SecuritySettings,
    pub user_store: Arc<UserStore>,
    pub session_store: Arc<SessionStore>,
    pub audit_store: Arc<AuditStore>,
    pub patient_store: Arc<PatientStore>,
    pub provider_store: Arc<ProviderStore>,
    pub appointment_store: Arc<AppointmentStore>,
    pub prescription_store: Arc<PrescriptionStore>,
    pub chart_store: Arc<ChartStore>,
    pub token_service: Arc<TokenService>,
    pub field_crypto: Arc<FieldCrypto>,
    pub audit_logger: Arc<AuditLogger>,
    pub auth_service: Arc<AuthService>,
    pub gate: Arc<AccessGate>,
}

impl AppContext {
    pub fn new(
        db: DatabaseConnection,
        settings: SecuritySettings,
    ) -> Result<Self, InternalError> {
        let user_store = Arc::new(UserStore::new(db.clone()));
        let session_store = Arc::new(SessionStore::new(db.clone()));
        let audit_store = Arc::new(AuditStore::new(db.clone()));
        let patient_store = Arc::new(PatientStore::new(db.clone()));
        let provider_store = Arc::new(ProviderStore::new(db.clone()));
        let appointment_store = Arc::new(AppointmentStore::new(db.clone()));
        let prescription_store = Arc::new(PrescriptionStore::new(db.clone()));
        let chart_store = Arc::new(ChartStore::new(db.clone()));

        let token_service = Arc::new(TokenService::new(&settings));
        let field_crypto = Arc::new(FieldCrypto::new(&settings.field_encryption_key)?);
        let audit_logger = Arc::new(AuditLogger::new(audit_store.clone()));

        let auth_service = Arc::new(AuthService::new(
            user_store.clone(),
            session_store.clone(),
            provider_store.clone(),
            token_service.clone(),
            audit_logger.clone(),
            &settings,
        ));

        let gate = Arc::new(AccessGate::new(
            token_service.clone(),
            session_store.clone(),
            audit_logger.clone(),
        ));

        Ok(Self {
            db,
            settings,
            user_store,
            session_store,
            audit_store,
            patient_store,
            provider_store,
            appointment_store,
            prescription_store,
            chart_store,
            token_service,
            field_crypto,
            audit_logger,
            auth_service,
            gate,
        })
    }
}

/// Compose the routed application with cookie handling and security
/// headers applied to every response.
pub fn build_app(ctx: &AppContext) -> impl Endpoint {
    let api_service = OpenApiService::new(
        (
            HealthApi,
            AuthApi::new(
                ctx.auth_service.clone(),
                ctx.user_store.clone(),
                ctx.provider_store.clone(),
                ctx.audit_logger.clone(),
                ctx.gate.clone(),
                ctx.settings.clone(),
            ),
            PatientsApi::new(
                ctx.patient_store.clone(),
                ctx.chart_store.clone(),
                ctx.field_crypto.clone(),
                ctx.audit_logger.clone(),
                ctx.gate.clone(),
            ),
            AppointmentsApi::new(
                ctx.appointment_store.clone(),
                ctx.patient_store.clone(),
                ctx.provider_store.clone(),
                ctx.audit_logger.clone(),
                ctx.gate.clone(),
            ),
            PrescriptionsApi::new(
                ctx.prescription_store.clone(),
                ctx.patient_store.clone(),
                ctx.audit_logger.clone(),
                ctx.gate.clone(),
            ),
            VitalsApi::new(
                ctx.chart_store.clone(),
                ctx.patient_store.clone(),
                ctx.audit_logger.clone(),
                ctx.gate.clone(),
            ),
            ProvidersApi::new(
                ctx.provider_store.clone(),
                ctx.user_store.clone(),
                ctx.audit_logger.clone(),
                ctx.gate.clone(),
            ),
            AuditApi::new(ctx.audit_store.clone(), ctx.gate.clone()),
        ),
        "MediFlow API",
        env!("CARGO_PKG_VERSION"),
    )
    .server("http://localhost:3000/api");

    let ui = api_service.swagger_ui();

    Route::new()
        .nest("/api", api_service)
        .nest("/swagger", ui)
        .with(CookieJarManager::new())
        .with(security_headers())
}

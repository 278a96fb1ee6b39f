// API layer - HTTP endpoints and request-level access control
pub mod appointments;
pub mod audit;
pub mod auth;
pub mod guard;
pub mod health;
pub mod patients;
pub mod prescriptions;
pub mod providers;
pub mod security;
pub mod vitals;

pub use appointments::AppointmentsApi;
pub use audit::AuditApi;
pub use auth::AuthApi;
pub use guard::AccessGate;
pub use health::HealthApi;
pub use patients::PatientsApi;
pub use prescriptions::PrescriptionsApi;
pub use providers::ProvidersApi;
pub use vitals::VitalsApi;

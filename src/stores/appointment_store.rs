use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::types::db::appointment;

pub const STATUS_SCHEDULED: &str = "SCHEDULED";
pub const STATUS_CANCELLED: &str = "CANCELLED";

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub patient_id: String,
    pub provider_id: String,
    pub scheduled_at: i64,
    pub duration_minutes: i32,
    pub appointment_type: String,
    pub reason: String,
    pub notes: Option<String>,
}

pub struct AppointmentStore {
    db: DatabaseConnection,
}

impl AppointmentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Whether the provider already has a non-cancelled appointment at the
    /// same instant
    pub async fn has_conflict(
        &self,
        provider_id: &str,
        scheduled_at: i64,
    ) -> Result<bool, InternalError> {
        let count = appointment::Entity::find()
            .filter(appointment::Column::ProviderId.eq(provider_id))
            .filter(appointment::Column::ScheduledAt.eq(scheduled_at))
            .filter(appointment::Column::Status.ne(STATUS_CANCELLED))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("check_appointment_conflict", e))?;

        Ok(count > 0)
    }

    pub async fn create(&self, data: NewAppointment) -> Result<appointment::Model, InternalError> {
        let row = appointment::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            patient_id: Set(data.patient_id),
            provider_id: Set(data.provider_id),
            scheduled_at: Set(data.scheduled_at),
            duration_minutes: Set(data.duration_minutes),
            appointment_type: Set(data.appointment_type),
            status: Set(STATUS_SCHEDULED.to_string()),
            reason: Set(data.reason),
            notes: Set(data.notes),
            created_at: Set(Utc::now().timestamp()),
        };

        row.insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_appointment", e))
    }

    /// Upcoming-first listing, optionally narrowed to a patient or provider
    pub async fn list(
        &self,
        patient_id: Option<&str>,
        provider_id: Option<&str>,
    ) -> Result<Vec<appointment::Model>, InternalError> {
        let mut query = appointment::Entity::find();

        if let Some(patient_id) = patient_id {
            query = query.filter(appointment::Column::PatientId.eq(patient_id));
        }
        if let Some(provider_id) = provider_id {
            query = query.filter(appointment::Column::ProviderId.eq(provider_id));
        }

        query
            .order_by_asc(appointment::Column::ScheduledAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_appointments", e))
    }
}

use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::types::dto::common::MessageResponse;

pub struct HealthApi;

#[derive(Tags)]
enum HealthTags {
    /// Service health
    Health,
}

#[OpenApi]
impl HealthApi {
    /// Liveness probe, unauthenticated
    #[oai(path = "/health", method = "get", tag = "HealthTags::Health")]
    async fn health(&self) -> Json<MessageResponse> {
        Json(MessageResponse {
            message: "ok".to_string(),
        })
    }
}

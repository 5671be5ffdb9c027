use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// The service is up. This does not check the database.
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

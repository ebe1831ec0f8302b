use axum::Json;
use axum::response::IntoResponse;
use serde::Serialize;

#[derive(Serialize)]
pub struct PingResponse {
    pub status: String,
    /// Server time, unix seconds.
    pub timestamp: i64,
}

pub async fn ping() -> impl IntoResponse {
    Json(PingResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

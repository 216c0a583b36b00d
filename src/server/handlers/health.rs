//! Health check endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::api::models::HealthReport;
use crate::server::state::SharedState;

pub async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let st = state.lock().await;
    let connected = st.store.is_some();
    let body = HealthReport {
        status: "ok".to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
        mode: if connected { "remote" } else { "degraded" }.to_string(),
        server_time: chrono::Utc::now().to_rfc3339(),
    };
    (StatusCode::OK, axum::Json(body))
}

use axum::{http::StatusCode, response::IntoResponse};

/// Liveness probe. Touches neither the store nor any upstream.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

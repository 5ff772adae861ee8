use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Greeting stub kept from the original service, handy as a liveness probe.
pub async fn root() -> impl IntoResponse {
    Json(json!({ "Hello": "World" }))
}

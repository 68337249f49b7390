use axum::{http::StatusCode, response::Response};
use serde_json::json;

pub const GREETING: &str = "Hello from localhost:3000";

pub async fn health() -> Response {
    super::json_response(StatusCode::OK, &json!({ "data": GREETING }))
}

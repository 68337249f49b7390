use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub mod dispatch;
pub mod http;

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("Could not read request body: {0}")]
    BodyRead(String),
    #[error("Malformed payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),
    #[error("Payload does not match {event} schema: {source}")]
    SchemaMismatch {
        event: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Could not encode response: {0}")]
    ResponseEncode(#[source] serde_json::Error),
}

impl WebhookError {
    pub fn kind(&self) -> &'static str {
        match self {
            WebhookError::BodyRead(_) => "body_read",
            WebhookError::MalformedPayload(_) => "malformed_payload",
            WebhookError::SchemaMismatch { .. } => "schema_mismatch",
            WebhookError::ResponseEncode(_) => "response_encode",
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        match self {
            WebhookError::ResponseEncode(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            e => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": e.kind(),
                    "details": e.to_string()
                })),
            )
                .into_response(),
        }
    }
}

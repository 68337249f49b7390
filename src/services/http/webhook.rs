use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::{json_response, AppState};
use crate::services::{
    dispatch::{dispatch, Dispatched},
    WebhookError,
};

pub async fn dynamic_hook(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    log::info!("This API is connected (user: {})", state.user);

    let outcome = body
        .map_err(|e| WebhookError::BodyRead(e.body_text()))
        .and_then(|body| dispatch(&body));

    match outcome {
        Ok(Dispatched::Recognized(event)) => {
            let response = json_response(StatusCode::OK, &event.summary());
            log::info!(
                "{} response sent (id: {}, amount: {})",
                event.event(),
                event.id(),
                event.amount()
            );
            response
        }
        Ok(Dispatched::Unrecognized(_)) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        Err(e) => {
            log::error!("Error handling hook event: {}", e);
            e.into_response()
        }
    }
}

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, post},
    Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use super::WebhookError;

pub mod health;
pub mod webhook;

#[derive(Clone)]
pub struct AppState {
    /// Value of `USER` at startup, only used to annotate logs.
    pub user: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", any(health::health))
        .route("/dynamic-hook", post(webhook::dynamic_hook))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Encodes `body` as a JSON response. Encoding failures are logged and
/// answered with a bare 500.
pub(crate) fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (status, [(header::CONTENT_TYPE, "application/json")], bytes).into_response(),
        Err(e) => {
            let error = WebhookError::ResponseEncode(e);
            log::error!("Error encoding data to send as response: {}", error);
            error.into_response()
        }
    }
}

pub async fn start_http_server(listen: &str, state: AppState) -> Result<(), anyhow::Error> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(listen).await?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("HTTP server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("Shutdown signal received."),
        Err(e) => log::error!("Could not listen for shutdown signal: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::models::events::fixtures::{pending_payload, success_payload};

    fn app() -> Router {
        router(AppState {
            user: "tester".to_string(),
        })
    }

    async fn send(method: Method, uri: &str, body: Body) -> Response {
        app()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn post_hook(body: impl Into<Body>) -> Response {
        send(Method::POST, "/dynamic-hook", body.into()).await
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_static() {
        for method in [Method::GET, Method::POST] {
            let first = send(method.clone(), "/health", Body::empty()).await;
            let second = send(method, "/health", Body::empty()).await;

            assert_eq!(first.status(), StatusCode::OK);
            assert_eq!(second.status(), StatusCode::OK);
            assert_eq!(first.headers()[header::CONTENT_TYPE], "application/json");

            let first = body_json(first).await;
            assert_eq!(first, json!({"data": "Hello from localhost:3000"}));
            assert_eq!(first, body_json(second).await);
        }
    }

    #[tokio::test]
    async fn test_pending_hook() {
        let response = post_hook(pending_payload().to_string()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(
            body_json(response).await,
            json!({"event type": "paymentrequest.pending", "amount": 5000})
        );
    }

    #[tokio::test]
    async fn test_success_hook() {
        let response = post_hook(success_payload().to_string()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"event type": "paymentrequest.success", "description": "Invoice #2"})
        );
    }

    #[tokio::test]
    async fn test_unrecognized_hook_is_empty_500() {
        let response = post_hook(r#"{"event":"unknown.kind"}"#).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
        assert!(body_bytes(response).await.is_empty());
    }

    // Malformed and mismatched payloads are rejected with 400 rather than an
    // empty 200.
    #[tokio::test]
    async fn test_malformed_hook_is_bad_request() {
        let response = post_hook("not json at all").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "malformed_payload");
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_bad_request() {
        let mut payload = pending_payload();
        payload["data"]["amount"] = json!("five thousand");

        let response = post_hook(payload.to_string()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "schema_mismatch");
    }

    #[tokio::test]
    async fn test_oversized_body_is_bad_request() {
        let response = post_hook(vec![b'{'; 2 * 1024 * 1024 + 1]).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "body_read");
    }

    #[tokio::test]
    async fn test_sparse_pending_hook() {
        let response =
            post_hook(r#"{"event":"paymentrequest.pending","data":{"id":1,"amount":5000}}"#).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"event type": "paymentrequest.pending", "amount": 5000})
        );
    }

    #[tokio::test]
    async fn test_hook_rejects_get() {
        let response = send(Method::GET, "/dynamic-hook", Body::empty()).await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = send(Method::GET, "/missing", Body::empty()).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

use serde_json::Value;

use super::WebhookError;
use crate::models::events::{EventKind, WebhookEvent};

/// Outcome of routing one webhook body.
#[derive(Debug)]
pub enum Dispatched {
    Recognized(WebhookEvent),
    /// Carries the `event` value that matched no known kind (may be empty).
    Unrecognized(String),
}

/// Reads the top-level `event` discriminator without decoding the rest.
pub fn event_identifier(payload: &Value) -> &str {
    payload.get("event").and_then(Value::as_str).unwrap_or_default()
}

/// Reads the first JSON value in `raw`; anything after it is ignored.
fn first_value(raw: &[u8]) -> Result<Value, serde_json::Error> {
    match serde_json::Deserializer::from_slice(raw).into_iter::<Value>().next() {
        Some(value) => value,
        None => Err(serde::de::Error::custom("EOF while parsing a value")),
    }
}

pub fn dispatch(raw: &[u8]) -> Result<Dispatched, WebhookError> {
    let payload = first_value(raw).map_err(WebhookError::MalformedPayload)?;
    let event = event_identifier(&payload).to_string();

    let kind = match EventKind::parse(&event) {
        Some(kind) => kind,
        None => {
            log::info!("Unrecognized hook event: {:?}", event);
            return Ok(Dispatched::Unrecognized(event));
        }
    };

    log::info!("Payment hook event received: {}", kind.key());

    let decoded = WebhookEvent::decode(kind, payload).map_err(|e| WebhookError::SchemaMismatch {
        event: event.clone(),
        source: e,
    })?;

    log::info!(
        "Decoded {} event (id: {}, amount: {})",
        decoded.kind().key(),
        decoded.id(),
        decoded.amount()
    );

    Ok(Dispatched::Recognized(decoded))
}

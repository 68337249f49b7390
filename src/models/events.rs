use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

/// Event kinds this receiver knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PaymentPending,
    PaymentSuccess,
}

impl EventKind {
    pub const ALL: [EventKind; 2] = [EventKind::PaymentPending, EventKind::PaymentSuccess];

    pub fn key(&self) -> &'static str {
        match self {
            EventKind::PaymentPending => "paymentrequest.pending",
            EventKind::PaymentSuccess => "paymentrequest.success",
        }
    }

    /// Looks up the kind registered under `key`. Unknown keys yield `None`.
    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

/// Payment request object as the provider sends it under `data`.
///
/// The pending and success events share every field except `paid_at` and the
/// shape of `notifications`, so both are instances of this struct. Absent or
/// null scalar fields decode to their zero value.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(bound(deserialize = "PaidAt: Deserialize<'de>, N: Deserialize<'de>"))]
pub struct PaymentRequest<PaidAt, N> {
    #[serde(default, deserialize_with = "zero_if_null")]
    pub id: i64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub domain: String,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub amount: i64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub currency: String,
    pub due_date: Option<Value>,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub has_invoice: bool,
    pub invoice_number: Option<Value>,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub description: String,
    pub pdf_url: Option<Value>,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub line_items: Vec<Value>,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub tax: Vec<Value>,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub request_code: String,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub status: String,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub paid: bool,
    pub paid_at: PaidAt,
    pub metadata: Option<Value>,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub notifications: Vec<N>,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub offline_reference: String,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub customer: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Notification {
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub channel: String,
}

fn zero_if_null<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub type PendingPaymentData = PaymentRequest<Option<Value>, Value>;
pub type SuccessfulPaymentData = PaymentRequest<DateTime<Utc>, Notification>;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentEvent<D> {
    #[serde(default, deserialize_with = "zero_if_null")]
    pub event: String,
    pub data: D,
}

pub type PendingPaymentEvent = PaymentEvent<PendingPaymentData>;
pub type SuccessfulPaymentEvent = PaymentEvent<SuccessfulPaymentData>;

/// A fully decoded webhook, one variant per [`EventKind`].
#[derive(Debug, Clone)]
pub enum WebhookEvent {
    Pending(PendingPaymentEvent),
    Success(SuccessfulPaymentEvent),
}

impl WebhookEvent {
    /// Decodes `payload` with the schema registered for `kind`.
    ///
    /// A missing or null `data` object is treated as empty, so only the
    /// fields a kind strictly requires (the success `paid_at`) can fail.
    pub fn decode(kind: EventKind, mut payload: Value) -> Result<Self, serde_json::Error> {
        if let Some(object) = payload.as_object_mut() {
            let data = object.entry("data").or_insert(Value::Null);
            if data.is_null() {
                *data = json!({});
            }
        }

        match kind {
            EventKind::PaymentPending => serde_json::from_value(payload).map(Self::Pending),
            EventKind::PaymentSuccess => serde_json::from_value(payload).map(Self::Success),
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            WebhookEvent::Pending(_) => EventKind::PaymentPending,
            WebhookEvent::Success(_) => EventKind::PaymentSuccess,
        }
    }

    pub fn event(&self) -> &str {
        match self {
            WebhookEvent::Pending(e) => &e.event,
            WebhookEvent::Success(e) => &e.event,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            WebhookEvent::Pending(e) => e.data.id,
            WebhookEvent::Success(e) => e.data.id,
        }
    }

    pub fn amount(&self) -> i64 {
        match self {
            WebhookEvent::Pending(e) => e.data.amount,
            WebhookEvent::Success(e) => e.data.amount,
        }
    }

    /// Summary returned to the provider.
    pub fn summary(&self) -> Value {
        match self {
            WebhookEvent::Pending(e) => json!({
                "event type": e.event,
                "amount": e.data.amount,
            }),
            WebhookEvent::Success(e) => json!({
                "event type": e.event,
                "description": e.data.description,
            }),
        }
    }
}

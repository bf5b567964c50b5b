//! Inbound Events API payloads.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::types::IgnoredSubtype;

/// Outer webhook body.
///
/// Fields stay loosely typed: Slack sends many event shapes to the same
/// endpoint and only `message` events are interpreted.
#[derive(Debug, Default, Deserialize)]
pub struct EventEnvelope {
    #[serde(default, deserialize_with = "present")]
    pub challenge: Option<Value>,
    #[serde(default)]
    token: Option<Value>,
    #[serde(default)]
    event_id: Option<Value>,
    #[serde(default)]
    event: Option<Value>,
}

impl EventEnvelope {
    /// Builds the envelope from a body already parsed as a JSON object.
    pub fn from_fields(fields: Map<String, Value>) -> serde_json::Result<Self> {
        serde_json::from_value(Value::Object(fields))
    }

    pub fn has_token(&self) -> bool {
        self.token.as_ref().is_some_and(is_truthy)
    }

    /// Delivery id; a missing or null id reads as the empty string.
    pub fn event_id(&self) -> String {
        match &self.event_id {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(id)) => id.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn has_event(&self) -> bool {
        self.event.is_some()
    }

    /// The inner event, or an empty one when its shape is not a message.
    pub fn event(&self) -> InboundEvent {
        self.event
            .as_ref()
            .and_then(|event| InboundEvent::deserialize(event).ok())
            .unwrap_or_default()
    }
}

/// The `event` object of a callback, reduced to what message handling reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InboundEvent {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub subtype: Option<String>,
    pub user: Option<String>,
    pub channel: Option<String>,
    pub text: Option<String>,
    pub ts: Option<String>,
}

impl InboundEvent {
    pub fn is_message(&self) -> bool {
        self.kind.as_deref() == Some("message")
    }

    pub fn ignored_subtype(&self) -> Option<IgnoredSubtype> {
        self.subtype.as_deref()?.parse().ok()
    }
}

/// Copy of the body fields fit for logging, without the verification token.
pub fn redacted(fields: &Map<String, Value>) -> Value {
    let mut fields = fields.clone();
    fields.remove("token");
    Value::Object(fields)
}

/// Keeps an explicit `null` distinguishable from a missing key.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

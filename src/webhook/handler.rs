//! Intake decisions and the `/slack/events` endpoint.

use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use log::{debug, info, warn};
use serde_json::{Map, Value, json};

use crate::relay::EventLog;

use super::AppState;
use super::envelope::{EventEnvelope, InboundEvent, redacted};

/// What the webhook decided to do with one delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intake {
    /// URL verification handshake; echo the value back.
    Challenge(Value),
    /// No verification token in the payload.
    InvalidToken,
    /// The event id was already taken in.
    Duplicate(String),
    /// Not a message this bot answers.
    Ignored,
    /// Accepted, nothing to reply to.
    Acknowledged,
    /// Accepted and needs a reply.
    Reply { text: String, channel: String },
}

impl Intake {
    pub fn response_body(&self) -> Value {
        match self {
            Intake::Challenge(challenge) => json!({ "challenge": challenge }),
            Intake::InvalidToken => json!({ "error": "Invalid token" }),
            _ => json!({ "status": "ok" }),
        }
    }
}

/// Classifies a delivery. Records the event id before filtering, so a
/// delivery is taken in at most once even if it is then ignored.
pub fn assess(envelope: &EventEnvelope, events: &dyn EventLog, bot_user_id: &str) -> Intake {
    if let Some(challenge) = &envelope.challenge {
        return Intake::Challenge(challenge.clone());
    }

    if !envelope.has_token() {
        warn!("Rejected payload without verification token");
        return Intake::InvalidToken;
    }

    if !envelope.has_event() {
        return Intake::Acknowledged;
    }

    let event_id = envelope.event_id();
    if !events.record(&event_id) {
        info!("Duplicate event received: {event_id:?}");
        return Intake::Duplicate(event_id);
    }
    info!("Processing event: {event_id:?}");

    let event = envelope.event();
    if !should_answer(&event, bot_user_id) {
        debug!("Ignoring event: {event:?}");
        return Intake::Ignored;
    }

    let InboundEvent {
        channel, text, ts, ..
    } = event;
    match (channel, text) {
        (Some(channel), Some(text)) if !text.is_empty() => {
            info!(
                "Accepted message in channel {channel} (ts {}): {text}",
                ts.as_deref().unwrap_or("-")
            );
            Intake::Reply { text, channel }
        }
        (None, Some(text)) if !text.is_empty() => {
            warn!("Message event without channel; cannot reply");
            Intake::Ignored
        }
        _ => Intake::Acknowledged,
    }
}

/// Plain user messages only: no bot posts, deletions, edits or own messages.
fn should_answer(event: &InboundEvent, bot_user_id: &str) -> bool {
    event.is_message()
        && event.ignored_subtype().is_none()
        && event.user.as_deref() != Some(bot_user_id)
}

pub async fn slack_events(State(state): State<AppState>, body: Bytes) -> (StatusCode, Json<Value>) {
    let parsed = serde_json::from_slice::<Map<String, Value>>(&body).and_then(|fields| {
        debug!("Received event: {}", redacted(&fields));
        EventEnvelope::from_fields(fields)
    });
    let envelope = match parsed {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("Rejected malformed webhook payload: {e}");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid payload" })),
            );
        }
    };

    let intake = assess(&envelope, state.events.as_ref(), &state.bot_user_id);
    let body = intake.response_body();

    if let Intake::Reply { text, channel } = intake {
        let pipeline = Arc::clone(&state.pipeline);
        tokio::spawn(async move { pipeline.run(&text, &channel).await });
    }

    (StatusCode::OK, Json(body))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::relay::InMemoryEventLog;

    const BOT: &str = "U0BOT";

    fn assess_json(payload: Value, events: &InMemoryEventLog) -> Intake {
        let envelope: EventEnvelope = serde_json::from_value(payload).expect("valid envelope");
        assess(&envelope, events, BOT)
    }

    fn message(event_id: &str, user: &str, text: &str) -> Value {
        json!({
            "token": "verification",
            "event_id": event_id,
            "event": {"type": "message", "user": user, "channel": "C1", "text": text}
        })
    }

    #[test]
    fn challenge_is_echoed_without_recording() {
        let events = InMemoryEventLog::new();
        let intake = assess_json(json!({"challenge": "abc123"}), &events);
        assert_eq!(intake, Intake::Challenge(json!("abc123")));
        assert_eq!(intake.response_body(), json!({"challenge": "abc123"}));
        assert!(events.is_empty());
    }

    #[test]
    fn missing_token_is_rejected_without_recording() {
        let events = InMemoryEventLog::new();
        let mut payload = message("Ev1", "U1", "hi");
        payload.as_object_mut().unwrap().remove("token");

        let intake = assess_json(payload, &events);
        assert_eq!(intake, Intake::InvalidToken);
        assert_eq!(intake.response_body(), json!({"error": "Invalid token"}));
        assert!(events.is_empty());
    }

    #[test]
    fn user_message_is_accepted_once() {
        let events = InMemoryEventLog::new();
        let first = assess_json(message("Ev1", "U1", "hi"), &events);
        assert_eq!(
            first,
            Intake::Reply {
                text: "hi".to_string(),
                channel: "C1".to_string()
            }
        );
        assert_eq!(first.response_body(), json!({"status": "ok"}));

        let second = assess_json(message("Ev1", "U1", "hi"), &events);
        assert_eq!(second, Intake::Duplicate("Ev1".to_string()));
        assert_eq!(second.response_body(), json!({"status": "ok"}));
    }

    #[test]
    fn own_and_bot_messages_are_ignored() {
        let events = InMemoryEventLog::new();
        assert_eq!(
            assess_json(message("Ev1", BOT, "loop?"), &events),
            Intake::Ignored
        );

        for subtype in ["bot_message", "message_deleted", "message_changed"] {
            let payload = json!({
                "token": "verification",
                "event_id": format!("Ev-{subtype}"),
                "event": {
                    "type": "message",
                    "subtype": subtype,
                    "user": "U1",
                    "channel": "C1",
                    "text": "should not be answered"
                }
            });
            assert_eq!(assess_json(payload, &events), Intake::Ignored, "{subtype}");
        }
    }

    #[test]
    fn ignored_events_still_consume_their_id() {
        let events = InMemoryEventLog::new();
        assess_json(message("Ev1", BOT, "mine"), &events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn non_message_types_are_ignored() {
        let events = InMemoryEventLog::new();
        let payload = json!({
            "token": "verification",
            "event_id": "Ev7",
            "event": {"type": "reaction_added", "user": "U1", "reaction": "thumbsup"}
        });
        assert_eq!(assess_json(payload, &events), Intake::Ignored);
    }

    #[test]
    fn empty_text_is_acknowledged_without_reply() {
        let events = InMemoryEventLog::new();
        assert_eq!(
            assess_json(message("Ev1", "U1", ""), &events),
            Intake::Acknowledged
        );
    }

    #[test]
    fn token_without_event_is_acknowledged() {
        let events = InMemoryEventLog::new();
        assert_eq!(
            assess_json(json!({"token": "verification", "type": "app_rate_limited"}), &events),
            Intake::Acknowledged
        );
        assert!(events.is_empty());
    }

    #[test]
    fn deliveries_without_id_share_the_empty_id() {
        let events = InMemoryEventLog::new();
        let payload = json!({
            "token": "verification",
            "event": {"type": "message", "user": "U1", "channel": "C1", "text": "hi"}
        });
        assert!(matches!(
            assess_json(payload.clone(), &events),
            Intake::Reply { .. }
        ));
        assert_eq!(
            assess_json(payload, &events),
            Intake::Duplicate(String::new())
        );
        assert_eq!(events.len(), 1);
    }
}

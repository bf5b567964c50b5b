//! Slack Events API webhook.

mod envelope;
mod handler;

use std::sync::Arc;

use axum::{Router, routing::post};

use crate::relay::{EventLog, ReplyPipeline};

pub use envelope::{EventEnvelope, InboundEvent};
pub use handler::{Intake, assess};

/// Route the Events API subscription points at.
pub const EVENTS_PATH: &str = "/slack/events";

/// Shared state for the webhook, created once at startup.
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<dyn EventLog>,
    pub bot_user_id: String,
    pub pipeline: Arc<ReplyPipeline>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(EVENTS_PATH, post(handler::slack_events))
        .with_state(state)
}

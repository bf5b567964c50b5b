//! Per-channel conversation memory.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::types::ConversationTurn;

type Turns = Vec<ConversationTurn>;

/// Process-wide mapping from channel id to its ordered turns.
///
/// Histories are created on first use and live until the process exits;
/// there is no pruning. Each channel has its own lock so that a whole
/// user-turn/bot-turn exchange is serialized per channel while different
/// channels proceed independently.
#[derive(Debug, Default)]
pub struct ConversationStore {
    channels: Mutex<HashMap<String, Arc<AsyncMutex<Turns>>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `channel`'s history, creating it if needed.
    pub async fn lock(&self, channel: &str) -> ChannelHistory {
        let slot = {
            let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(channels.entry(channel.to_string()).or_default())
        };
        ChannelHistory {
            turns: slot.lock_owned().await,
        }
    }

    /// Copy of the channel's turns, oldest first. Empty for unknown channels.
    pub async fn snapshot(&self, channel: &str) -> Vec<ConversationTurn> {
        let slot = self
            .channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(channel)
            .cloned();
        match slot {
            Some(slot) => slot.lock().await.clone(),
            None => Vec::new(),
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Exclusive, append-only handle on one channel's history.
pub struct ChannelHistory {
    turns: OwnedMutexGuard<Turns>,
}

impl ChannelHistory {
    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }
}

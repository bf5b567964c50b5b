//! Reply pipeline: history, completion, pacing and delivery for one message.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info};

use crate::error::Result;
use crate::openai::CompletionClient;
use crate::slack::MessagingClient;
use crate::types::ConversationTurn;

use super::history::ConversationStore;
use super::prompt::build_prompt;

/// Produces and delivers a reply for an accepted user message.
pub struct ReplyPipeline {
    completion: Arc<dyn CompletionClient>,
    messaging: Arc<dyn MessagingClient>,
    histories: Arc<ConversationStore>,
    preamble: String,
    reply_delay: Duration,
}

impl ReplyPipeline {
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        messaging: Arc<dyn MessagingClient>,
        histories: Arc<ConversationStore>,
        preamble: String,
        reply_delay: Duration,
    ) -> Self {
        Self {
            completion,
            messaging,
            histories,
            preamble,
            reply_delay,
        }
    }

    pub fn histories(&self) -> &Arc<ConversationStore> {
        &self.histories
    }

    /// Runs the pipeline to completion. Never fails: any error is posted
    /// into the channel in place of the reply.
    pub async fn run(&self, user_text: &str, channel: &str) {
        info!("Generating reply for channel {channel}");

        if let Err(e) = self.reply(user_text, channel).await {
            error!("Error replying in channel {channel}: {e}");
            // Raw error text reaches end users; see DESIGN.md.
            if let Err(post_err) = self.messaging.post_message(channel, &e.to_string()).await {
                error!("Failed to report error to channel {channel}: {post_err}");
            }
        }
    }

    async fn reply(&self, user_text: &str, channel: &str) -> Result<()> {
        let reply = {
            let mut history = self.histories.lock(channel).await;
            history.push(ConversationTurn::user(user_text));

            let prompt = build_prompt(&self.preamble, history.turns());
            debug!(
                "Prompt for channel {channel} has {} turns",
                history.turns().len()
            );

            let reply = self.completion.complete(&prompt).await?.trim().to_string();
            history.push(ConversationTurn::bot(reply.as_str()));
            reply
        };

        info!("Sending message to channel {channel}: {reply}");

        tokio::time::sleep(self.reply_delay).await;

        self.messaging.post_message(channel, &reply).await
    }
}

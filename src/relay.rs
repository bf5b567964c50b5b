//! Reply relay - deduplication, per-channel memory and the reply pipeline.

mod events;
mod history;
mod pipeline;
mod prompt;

pub use events::{EventLog, InMemoryEventLog};
pub use history::{ChannelHistory, ConversationStore};
pub use pipeline::ReplyPipeline;
pub use prompt::{DEFAULT_PREAMBLE, build_prompt};

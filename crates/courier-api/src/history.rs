//! Shapes stored messages into the role/content pairs the agent expects.

use courier_agent::{HistoryEntry, Role};
use courier_store::{Message, MessageRole};

/// Pure transformation: drop everything the agent does not need, keep order.
pub fn assemble(messages: &[Message]) -> Vec<HistoryEntry> {
    messages
        .iter()
        .map(|message| HistoryEntry {
            role: match message.role {
                MessageRole::User => Role::User,
                MessageRole::Assistant => Role::Assistant,
            },
            content: message.content.clone(),
        })
        .collect()
}

use serde::{Deserialize, Serialize};

/// One role/content pair of the bounded history window, in the shape the
/// agent expects. Timestamps and model tags are already stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

impl HistoryEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Outbound payload of the single run call.
#[derive(Debug, Clone, Serialize)]
pub struct AgentRunRequest<'a> {
    pub message: &'a str,
    pub history: &'a [HistoryEntry],
    pub model: &'a str,
}

/// The agent answers with one complete reply string; there is no streaming
/// contract at this boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentRunResponse {
    pub response: String,
}

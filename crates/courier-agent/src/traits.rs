use async_trait::async_trait;

use crate::error::Result;
use crate::types::HistoryEntry;

/// Request/response bridge to the external reasoning agent.
///
/// One call per turn, no retries at this layer; retry policy, if any,
/// belongs to the caller of the relay.
#[async_trait]
pub trait AgentGateway: Send + Sync {
    /// Send the message plus bounded history, receive the full reply text.
    async fn invoke(&self, message: &str, history: &[HistoryEntry], model: &str)
        -> Result<String>;

    /// The agent's advertised model catalog, forwarded uninterpreted.
    async fn models(&self) -> Result<serde_json::Value>;
}

use std::sync::Arc;

use courier_agent::AgentGateway;
use courier_store::ConversationStore;
use sha2::{Digest, Sha256};

use crate::config::Config;

/// Shared application state passed to all handlers.
///
/// All resources are wrapped in Arc for efficient sharing across async tasks.
/// The store handle is the only shared mutable resource; every mutation goes
/// through its upsert/append operations.
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn ConversationStore>,
    pub agent: Arc<dyn AgentGateway>,
    /// SHA-256 digest of the bearer secret, computed once at startup so
    /// request-path comparisons run over fixed-length data.
    pub token_hash: [u8; 32],
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn ConversationStore>,
        agent: Arc<dyn AgentGateway>,
    ) -> Self {
        let token_hash: [u8; 32] = Sha256::digest(config.webchat_token.as_bytes()).into();

        Self {
            config: Arc::new(config),
            store,
            agent,
            token_hash,
        }
    }
}

pub mod client;
pub mod error;
pub mod traits;
pub mod types;

pub use client::AgentHttpClient;
pub use error::AgentError;
pub use traits::AgentGateway;
pub use types::{AgentRunRequest, AgentRunResponse, HistoryEntry, Role};

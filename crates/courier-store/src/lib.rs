pub mod client;
pub mod error;
pub mod models;
pub mod repositories;
pub mod store;

pub use client::StoreClient;
pub use error::StoreError;
pub use models::{Conversation, Message, MessageRole};
pub use repositories::{ConversationRepository, MessageRepository};
pub use store::ConversationStore;

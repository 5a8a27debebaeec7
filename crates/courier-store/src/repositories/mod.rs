mod conversation;
mod message;

pub use conversation::ConversationRepository;
pub use message::MessageRepository;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::Result;
use crate::models::{Conversation, Message, MessageRole};

/// Trait for conversation persistence operations.
///
/// The relay depends on this seam rather than on a concrete database client,
/// so tests can drive the turn state machine against an in-memory double.
/// Implementations must be safe for concurrent invocation across arbitrarily
/// many simultaneous turns; in particular `get_or_create` must be atomic.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Idempotent upsert keyed on `(channel, channel_id)`.
    ///
    /// On creation the conversation's model is set to `default_model`; on an
    /// existing record only `updated_at` is refreshed. Racing callers on the
    /// same key must all resolve to the same record.
    async fn get_or_create(
        &self,
        channel: &str,
        channel_id: &str,
        default_model: &str,
    ) -> Result<Conversation>;

    /// Look up a conversation by its surrogate id.
    async fn get_conversation(&self, id: ObjectId) -> Result<Option<Conversation>>;

    /// Append an immutable message to a conversation's log.
    ///
    /// Fails with `ConversationNotFound` if `conversation_id` does not
    /// reference an existing conversation.
    async fn append(
        &self,
        conversation_id: ObjectId,
        role: MessageRole,
        content: &str,
        model: Option<&str>,
    ) -> Result<Message>;

    /// Up to `limit` most-recent messages, returned oldest-first.
    async fn list_recent(&self, conversation_id: ObjectId, limit: i64) -> Result<Vec<Message>>;
}

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::Client;

use crate::error::{Result, StoreError};
use crate::models::{Conversation, Message, MessageRole};
use crate::repositories::{ConversationRepository, MessageRepository};
use crate::store::ConversationStore;

/// Long-lived handle to the conversation store.
///
/// Constructed once at process start and shared across request tasks; the
/// underlying `mongodb::Client` is pooled and clone-cheap.
pub struct StoreClient {
    conversation_repo: ConversationRepository,
    message_repo: MessageRepository,
}

impl StoreClient {
    pub async fn connect(mongodb_uri: &str, db_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self {
            conversation_repo: ConversationRepository::new(&client, db_name),
            message_repo: MessageRepository::new(&client, db_name),
        })
    }

    /// Create the indexes the store's contract depends on. Idempotent.
    pub async fn ensure_indexes(&self) -> Result<()> {
        self.conversation_repo.ensure_indexes().await?;
        self.message_repo.ensure_indexes().await?;
        Ok(())
    }

    pub fn conversations(&self) -> &ConversationRepository {
        &self.conversation_repo
    }

    pub fn messages(&self) -> &MessageRepository {
        &self.message_repo
    }
}

#[async_trait]
impl ConversationStore for StoreClient {
    async fn get_or_create(
        &self,
        channel: &str,
        channel_id: &str,
        default_model: &str,
    ) -> Result<Conversation> {
        self.conversation_repo
            .get_or_create(channel, channel_id, default_model)
            .await
    }

    async fn get_conversation(&self, id: ObjectId) -> Result<Option<Conversation>> {
        self.conversation_repo.get(id).await
    }

    async fn append(
        &self,
        conversation_id: ObjectId,
        role: MessageRole,
        content: &str,
        model: Option<&str>,
    ) -> Result<Message> {
        if self.conversation_repo.get(conversation_id).await?.is_none() {
            return Err(StoreError::ConversationNotFound(
                conversation_id.to_hex(),
            ));
        }
        self.message_repo
            .append(conversation_id, role, content, model)
            .await
    }

    async fn list_recent(&self, conversation_id: ObjectId, limit: i64) -> Result<Vec<Message>> {
        self.message_repo.list_recent(conversation_id, limit).await
    }
}

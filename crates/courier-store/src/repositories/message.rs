use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::{bson::doc, Client, Collection, IndexModel};

use crate::error::Result;
use crate::models::{Message, MessageRole};

#[derive(Clone)]
pub struct MessageRepository {
    collection: Collection<Message>,
}

impl MessageRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("messages");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "conversation_id": 1, "created_at": 1 })
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }

    /// Append an immutable message to a conversation's log.
    pub async fn append(
        &self,
        conversation_id: ObjectId,
        role: MessageRole,
        content: &str,
        model: Option<&str>,
    ) -> Result<Message> {
        let message = Message {
            id: ObjectId::new(),
            conversation_id,
            role,
            content: content.to_string(),
            model: model.map(str::to_string),
            created_at: Utc::now(),
        };

        self.collection.insert_one(&message).await?;
        Ok(message)
    }

    /// Up to `limit` most-recent messages, oldest-first.
    ///
    /// Queries newest-first to apply the limit, then reverses back into
    /// chronological order. Ties on `created_at` break by `_id`, which is
    /// monotonic for inserts from this process.
    pub async fn list_recent(
        &self,
        conversation_id: ObjectId,
        limit: i64,
    ) -> Result<Vec<Message>> {
        let filter = doc! { "conversation_id": conversation_id };
        let mut messages: Vec<Message> = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1, "_id": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        messages.reverse();
        Ok(messages)
    }
}

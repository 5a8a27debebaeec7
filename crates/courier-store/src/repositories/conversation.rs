use mongodb::bson::oid::ObjectId;
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{bson::doc, Client, Collection, IndexModel};

use crate::error::{Result, StoreError};
use crate::models::Conversation;

#[derive(Clone)]
pub struct ConversationRepository {
    collection: Collection<Conversation>,
}

impl ConversationRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("conversations");
        Self { collection }
    }

    /// Create the unique compound index backing the upsert.
    ///
    /// Without it, concurrent first-contact turns on the same key could
    /// insert duplicate records.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "channel": 1, "channel_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }

    /// Atomic upsert keyed on `(channel, channel_id)`.
    ///
    /// Runs as a single `findOneAndUpdate` so racing callers converge on one
    /// record. An existing conversation keeps its model; only `updated_at`
    /// is refreshed.
    pub async fn get_or_create(
        &self,
        channel: &str,
        channel_id: &str,
        default_model: &str,
    ) -> Result<Conversation> {
        let now = bson::DateTime::now();
        let filter = doc! { "channel": channel, "channel_id": channel_id };
        let update = doc! {
            "$set": { "updated_at": now },
            "$setOnInsert": {
                "channel": channel,
                "channel_id": channel_id,
                "model": default_model,
                "created_at": now,
            },
        };

        let conversation = self
            .collection
            .find_one_and_update(filter, update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?;

        // With upsert + After the document is always returned.
        conversation.ok_or_else(|| {
            StoreError::Internal(format!(
                "upsert returned no document for ({}, {})",
                channel, channel_id
            ))
        })
    }

    /// Get conversation by ID
    pub async fn get(&self, conversation_id: ObjectId) -> Result<Option<Conversation>> {
        let filter = doc! { "_id": conversation_id };
        Ok(self.collection.find_one(filter).await?)
    }
}

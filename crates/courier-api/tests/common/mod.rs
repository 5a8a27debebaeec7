//! Test doubles shared by the integration tests: an in-memory store that
//! mirrors the Mongo store's contract and a scripted agent gateway.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Utc;

use courier_agent::{AgentError, AgentGateway, HistoryEntry};
use courier_api::config::{
    AgentConfig, Config, CorsConfig, LoggingConfig, MongoDbConfig, RelayConfig, ServerConfig,
};
use courier_store::{Conversation, ConversationStore, Message, MessageRole, StoreError};

pub const TEST_TOKEN: &str = "test-secret-token-0123456789abcdef";

pub fn test_config(chunk_delay_ms: u64) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        cors: CorsConfig {
            enabled: false,
            origins: vec![],
        },
        mongodb: MongoDbConfig {
            database: "courier_test".to_string(),
        },
        agent: AgentConfig {
            url: "http://localhost:8000".to_string(),
            timeout_secs: 120,
            default_model: "main".to_string(),
        },
        relay: RelayConfig {
            channel: "webchat".to_string(),
            history_window: 20,
            history_limit: 100,
            chunk_delay_ms,
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            format: "pretty".to_string(),
        },
        mongodb_uri: String::new(),
        webchat_token: TEST_TOKEN.to_string(),
    }
}

#[derive(Default)]
struct MemoryInner {
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
}

/// In-memory `ConversationStore` double. A single lock around the whole
/// state gives it the same atomicity the Mongo upsert provides, so the
/// relay's concurrency properties can be exercised without a database.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
    /// Total store operations, used to prove the access gate rejects
    /// without side effects.
    pub operations: AtomicUsize,
    /// When set, the next assistant append fails, simulating a persistence
    /// failure after the agent already replied.
    pub fail_assistant_append: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversation_count(&self) -> usize {
        self.inner.lock().unwrap().conversations.len()
    }

    pub fn messages_for(&self, conversation_id: ObjectId) -> Vec<Message> {
        self.inner
            .lock()
            .unwrap()
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn get_or_create(
        &self,
        channel: &str,
        channel_id: &str,
        default_model: &str,
    ) -> Result<Conversation, StoreError> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        let mut inner = self.inner.lock().unwrap();

        if let Some(existing) = inner
            .conversations
            .iter_mut()
            .find(|c| c.channel == channel && c.channel_id == channel_id)
        {
            existing.updated_at = Utc::now();
            return Ok(existing.clone());
        }

        let conversation = Conversation {
            id: ObjectId::new(),
            channel: channel.to_string(),
            channel_id: channel_id.to_string(),
            model: default_model.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        inner.conversations.push(conversation.clone());
        Ok(conversation)
    }

    async fn get_conversation(&self, id: ObjectId) -> Result<Option<Conversation>, StoreError> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.lock().unwrap();
        Ok(inner.conversations.iter().find(|c| c.id == id).cloned())
    }

    async fn append(
        &self,
        conversation_id: ObjectId,
        role: MessageRole,
        content: &str,
        model: Option<&str>,
    ) -> Result<Message, StoreError> {
        self.operations.fetch_add(1, Ordering::SeqCst);

        if role == MessageRole::Assistant && self.fail_assistant_append.load(Ordering::SeqCst) {
            return Err(StoreError::Internal(
                "simulated write failure".to_string(),
            ));
        }

        let mut inner = self.inner.lock().unwrap();
        if !inner.conversations.iter().any(|c| c.id == conversation_id) {
            return Err(StoreError::ConversationNotFound(conversation_id.to_hex()));
        }

        let message = Message {
            id: ObjectId::new(),
            conversation_id,
            role,
            content: content.to_string(),
            model: model.map(str::to_string),
            created_at: Utc::now(),
        };
        inner.messages.push(message.clone());
        Ok(message)
    }

    async fn list_recent(
        &self,
        conversation_id: ObjectId,
        limit: i64,
    ) -> Result<Vec<Message>, StoreError> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.lock().unwrap();
        // Insertion order is creation order here; take the last `limit`.
        let matching: Vec<Message> = inner
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        let skip = matching.len().saturating_sub(limit as usize);
        Ok(matching.into_iter().skip(skip).collect())
    }
}

pub enum AgentBehavior {
    Reply(String),
    Timeout,
    Fail(u16, String),
}

/// Scripted `AgentGateway` double recording what it was invoked with.
pub struct ScriptedAgent {
    behavior: AgentBehavior,
    pub calls: AtomicUsize,
    pub last_message: Mutex<Option<String>>,
    pub last_history: Mutex<Option<Vec<HistoryEntry>>>,
    pub last_model: Mutex<Option<String>>,
}

impl ScriptedAgent {
    fn with_behavior(behavior: AgentBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_message: Mutex::new(None),
            last_history: Mutex::new(None),
            last_model: Mutex::new(None),
        }
    }

    pub fn replying(reply: impl Into<String>) -> Self {
        Self::with_behavior(AgentBehavior::Reply(reply.into()))
    }

    pub fn timing_out() -> Self {
        Self::with_behavior(AgentBehavior::Timeout)
    }

    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        Self::with_behavior(AgentBehavior::Fail(status, body.into()))
    }
}

#[async_trait]
impl AgentGateway for ScriptedAgent {
    async fn invoke(
        &self,
        message: &str,
        history: &[HistoryEntry],
        model: &str,
    ) -> Result<String, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_message.lock().unwrap() = Some(message.to_string());
        *self.last_history.lock().unwrap() = Some(history.to_vec());
        *self.last_model.lock().unwrap() = Some(model.to_string());

        match &self.behavior {
            AgentBehavior::Reply(reply) => Ok(reply.clone()),
            AgentBehavior::Timeout => Err(AgentError::Timeout),
            AgentBehavior::Fail(status, body) => Err(AgentError::Status {
                status: *status,
                body: body.clone(),
            }),
        }
    }

    async fn models(&self) -> Result<serde_json::Value, AgentError> {
        Ok(serde_json::json!({
            "models": [
                { "id": "main", "type": "chat", "available": true }
            ]
        }))
    }
}

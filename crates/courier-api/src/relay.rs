//! The per-turn relay: one inbound user message in, one ordered event
//! stream out.
//!
//! Each turn runs as its own spawned task pushing events into a bounded
//! channel; the transport layer drains the receiver and maps events onto
//! its native streaming primitive. Side effects are strictly ordered:
//!
//! 1. resolve the conversation (atomic get-or-create) and emit its id
//! 2. persist the inbound user message
//! 3. assemble the bounded history window
//! 4. invoke the agent (single call, bounded wait)
//! 5. persist the assistant reply
//! 6. emit the reply as paced text chunks
//!
//! No text chunk is ever emitted before step 5 completes, so any reply text
//! a caller sees is already recoverable through history retrieval. A failure
//! at any step becomes a single `Error` event; the stream always closes with
//! `Done`. If the receiver is dropped (caller disconnected), remaining
//! emission stops — persistence has either already happened or the turn
//! runs to completion on its own, favoring durability over cancellation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use courier_agent::{AgentError, AgentGateway};
use courier_store::{ConversationStore, MessageRole, StoreError};

use crate::chunk;
use crate::history;

/// Relay policy knobs, sourced from config once per process.
#[derive(Debug, Clone)]
pub struct RelayOptions {
    /// Calling surface half of the conversation key.
    pub channel: String,
    /// Most-recent messages handed to the agent as context.
    pub history_window: i64,
    /// Cosmetic pause between text chunks; zero disables pacing.
    pub chunk_delay: Duration,
}

/// One inbound turn.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    /// Channel-scoped conversation key (caller-supplied or generated).
    pub channel_id: String,
    pub message: String,
    pub model: String,
}

/// Events of the turn stream, in emission order: `Conversation` first,
/// then either `Text`* or a single `Error`, then `Done`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    Conversation { id: String },
    Text { content: String },
    Error { message: String },
    Done,
}

#[derive(thiserror::Error, Debug)]
enum TurnError {
    #[error("Storage failure: {0}")]
    Store(#[from] StoreError),

    #[error("Agent failure: {0}")]
    Agent(#[from] AgentError),
}

/// Spawn a turn in the background, returning its event receiver.
pub fn spawn_turn(
    store: Arc<dyn ConversationStore>,
    agent: Arc<dyn AgentGateway>,
    options: RelayOptions,
    request: TurnRequest,
) -> mpsc::Receiver<RelayEvent> {
    let (tx, rx) = mpsc::channel(64);

    tokio::spawn(async move {
        if let Err(e) = run_turn(store, agent, &options, request, &tx).await {
            tracing::error!("relay turn failed: {}", e);
            let _ = tx
                .send(RelayEvent::Error {
                    message: e.to_string(),
                })
                .await;
        }
        let _ = tx.send(RelayEvent::Done).await;
    });

    rx
}

async fn run_turn(
    store: Arc<dyn ConversationStore>,
    agent: Arc<dyn AgentGateway>,
    options: &RelayOptions,
    request: TurnRequest,
    tx: &mpsc::Sender<RelayEvent>,
) -> Result<(), TurnError> {
    let conversation = store
        .get_or_create(&options.channel, &request.channel_id, &request.model)
        .await?;

    tracing::debug!(
        conversation_id = %conversation.id,
        model = %request.model,
        "turn resolved"
    );

    // The caller gets the id before the agent is invoked, so it can be
    // captured even if the turn fails later.
    let announced = tx
        .send(RelayEvent::Conversation {
            id: conversation.id.to_hex(),
        })
        .await;
    if announced.is_err() {
        return Ok(());
    }

    // The user's utterance is durable before the agent is ever paid for.
    store
        .append(
            conversation.id,
            MessageRole::User,
            &request.message,
            Some(&request.model),
        )
        .await?;

    let recent = store
        .list_recent(conversation.id, options.history_window)
        .await?;
    let window = history::assemble(&recent);

    let reply = agent
        .invoke(&request.message, &window, &request.model)
        .await?;

    // Durability before delivery: a reply that cannot be recorded is not
    // shown to the caller either.
    store
        .append(
            conversation.id,
            MessageRole::Assistant,
            &reply,
            Some(&request.model),
        )
        .await?;

    for content in chunk::split_reply(&reply) {
        if tx.send(RelayEvent::Text { content }).await.is_err() {
            // Caller went away; the reply is already persisted.
            return Ok(());
        }
        if !options.chunk_delay.is_zero() {
            tokio::time::sleep(options.chunk_delay).await;
        }
    }

    Ok(())
}

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::response::sse::{Event, Sse};
use axum::Json;
use bson::oid::ObjectId;
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use uuid::Uuid;

use courier_agent::HistoryEntry;

use crate::error::{ApiError, ApiResult};
use crate::history;
use crate::relay::{self, RelayEvent, RelayOptions, TurnRequest};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Channel-scoped conversation key. Absent on first contact; a fresh
    /// one is generated and the resolved id comes back in the stream.
    #[serde(rename = "conversationId")]
    pub conversation_id: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(rename = "conversationId")]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<HistoryEntry>,
}

/// Submit a turn and stream the reply as Server-Sent Events.
///
/// The stream emits a `conversationId` event first, then `text` chunks whose
/// concatenation is the full reply, and always ends with `done`. Failures
/// after the stream opens arrive as a single `error` event instead of text;
/// the HTTP status is already committed to 200 by then.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message is required".to_string()));
    }

    let model = request
        .model
        .unwrap_or_else(|| state.config.agent.default_model.clone());
    let channel_id = request
        .conversation_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let options = RelayOptions {
        channel: state.config.relay.channel.clone(),
        history_window: state.config.relay.history_window,
        chunk_delay: Duration::from_millis(state.config.relay.chunk_delay_ms),
    };
    let turn = TurnRequest {
        channel_id,
        message: request.message,
        model,
    };

    let receiver = relay::spawn_turn(
        Arc::clone(&state.store),
        Arc::clone(&state.agent),
        options,
        turn,
    );

    let stream = ReceiverStream::new(receiver)
        .map(|event| Ok::<Event, Infallible>(to_sse_event(event)));

    Ok(Sse::new(stream))
}

/// Read back a conversation's message log, oldest-first, bounded.
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let raw_id = query
        .conversation_id
        .ok_or_else(|| ApiError::BadRequest("Missing conversationId".to_string()))?;
    let conversation_id = ObjectId::parse_str(&raw_id)
        .map_err(|_| ApiError::BadRequest("Invalid conversationId format".to_string()))?;

    state
        .store
        .get_conversation(conversation_id)
        .await?
        .ok_or(ApiError::ConversationNotFound(raw_id))?;

    let messages = state
        .store
        .list_recent(conversation_id, state.config.relay.history_limit)
        .await?;

    Ok(Json(HistoryResponse {
        messages: history::assemble(&messages),
    }))
}

fn to_sse_event(event: RelayEvent) -> Event {
    let sse_event = match event {
        RelayEvent::Conversation { id } => Event::default()
            .event("conversationId")
            .json_data(serde_json::json!({ "id": id })),
        RelayEvent::Text { content } => Event::default()
            .event("text")
            .json_data(serde_json::json!({ "content": content })),
        RelayEvent::Error { message } => Event::default()
            .event("error")
            .json_data(serde_json::json!({ "error": message })),
        RelayEvent::Done => Event::default()
            .event("done")
            .json_data(serde_json::json!({ "status": "completed" })),
    };

    // json_data only fails on unserializable payloads; these are all plain
    // strings.
    sse_event.unwrap_or_else(|_| Event::default().event("error").data("event encoding failed"))
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use courier_agent::AgentError;
use courier_store::StoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ConversationNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::ConversationNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Agent(AgentError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Agent(_) => StatusCode::BAD_GATEWAY,
        };

        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

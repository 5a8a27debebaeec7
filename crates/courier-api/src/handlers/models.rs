use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::error::ApiResult;
use crate::state::AppState;

/// Pass-through of the agent's advertised model catalog. The relay does not
/// interpret it beyond forwarding.
pub async fn list_models(State(state): State<Arc<AppState>>) -> ApiResult<Json<serde_json::Value>> {
    let catalog = state.agent.models().await?;
    Ok(Json(catalog))
}

//! Bearer-token access gate.
//!
//! One static secret guards the whole API surface that touches the store.
//! The SHA-256 digest of the secret is cached in `AppState` at startup;
//! request tokens are hashed to the same fixed length and compared in
//! constant time, so neither the secret's content nor its length leaks
//! through timing. Missing or wrong credentials are rejected before any
//! store access happens.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::ApiError;
use crate::state::AppState;

/// Axum middleware enforcing the bearer check on protected routes.
/// Attach via `axum::middleware::from_fn_with_state`.
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let provided = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("");

    let provided_hash = Sha256::digest(provided.as_bytes());

    if !bool::from(provided_hash.as_slice().ct_eq(&state.token_hash)) {
        return ApiError::Unauthorized.into_response();
    }

    next.run(req).await
}

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::auth;
use crate::config::Config;
use crate::handlers::{chat, health, models};
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    // Both the write path (relay) and the read path (history) sit behind
    // the access gate; the model catalog and health check do not.
    let gated_routes = Router::new()
        .route("/api/chat", post(chat::send_message).get(chat::get_history))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/models", get(models::list_models))
        .merge(gated_routes)
        // Generous bound: the SSE response itself opens immediately, but a
        // stuck handler should still not hold a connection forever.
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(300)))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let mut cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors = cors.allow_origin(Any);
        } else {
            for origin in &config.cors.origins {
                if let Ok(parsed_origin) = origin.parse::<axum::http::HeaderValue>() {
                    cors = cors.allow_origin(parsed_origin);
                }
            }
        }

        cors
    } else {
        CorsLayer::permissive()
    }
}

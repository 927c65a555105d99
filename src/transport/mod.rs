// SPDX-License-Identifier: MIT

//! HTTP + WebSocket transport for the action runtime.

pub mod http;
pub mod ws;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the axum `Router` for all routes (§6), nested under the
/// configured prefix when one is set.
pub fn build_router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route("/", get(http::index))
        .route("/a/{slug}", get(http::action_page))
        .route("/a/{slug}/ws", get(ws::ws_handler))
        .route("/api/actions", get(http::list_actions))
        .route("/healthz", get(http::healthz))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state.clone());

    let prefix = state.config.prefix.trim_end_matches('/');
    if prefix.is_empty() {
        routes
    } else {
        Router::new().nest(prefix, routes)
    }
}

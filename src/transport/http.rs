// SPDX-License-Identifier: MIT

//! HTTP handlers: the browser shell, the machine-readable action listing,
//! and the liveness probe (§6).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::assets;
use crate::error::ActionError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub action_count: usize,
}

/// `GET <prefix>/` — the browser shell, not bound to any particular action.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    assets::index_html(&state.config.prefix)
}

/// `GET <prefix>/a/{slug}` — the browser shell for one action. 404s up
/// front if the slug isn't registered, so a bad link fails immediately
/// instead of opening a WebSocket that will.
pub async fn action_page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    match state.registry.get(&slug).await {
        Ok(_) => assets::index_html(&state.config.prefix).into_response(),
        Err(_not_found) => ActionError::NotFound
            .to_http_response(format!("no action registered for slug {slug:?}"))
            .into_response(),
    }
}

/// `GET <prefix>/api/actions` — registered actions in registration order.
pub async fn list_actions(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.registry.list().await)
}

/// `GET <prefix>/healthz` — liveness probe.
pub async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "running".to_owned(),
        action_count: state.registry.len().await,
    })
}

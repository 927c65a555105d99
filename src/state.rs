// SPDX-License-Identifier: MIT

//! Process-wide shared state handed to every HTTP/WebSocket handler.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::registry::Registry;

/// Shared application state: the action registry, resolved configuration,
/// and the process-level shutdown signal every connection's `Session`
/// descends from.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub config: Arc<AppConfig>,
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(registry: Arc<Registry>, config: AppConfig, shutdown: CancellationToken) -> Self {
        Self { registry, config: Arc::new(config), shutdown }
    }
}

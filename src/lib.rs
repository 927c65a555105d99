// SPDX-License-Identifier: MIT

//! actioncell: a server-driven remote UI runtime. Action handlers call
//! `display.*`/`input.*` as if they were talking to a local terminal; under
//! the hood each call is a framed message over a WebSocket, with handler
//! execution suspended at every input until the browser replies.

pub mod action;
pub mod action_loop;
pub mod assets;
pub mod component;
pub mod config;
pub mod demos;
pub mod error;
pub mod io_context;
pub mod message;
pub mod registry;
pub mod session;
pub mod state;
pub mod transport;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::registry::Registry;
use crate::state::AppState;
use crate::transport::build_router;

/// Run the server until shutdown (Ctrl-C or the underlying listener dying).
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let shutdown = CancellationToken::new();

    let registry = Arc::new(Registry::new());
    demos::register_demo_actions(&registry).await?;

    if config.dev_proxy {
        tracing::info!("dev proxy enabled: serving the embedded shell only (ACTIONCELL_DEV_PROXY)");
    }

    let action_count = registry.len().await;
    let state = Arc::new(AppState::new(Arc::clone(&registry), config, shutdown.clone()));
    let router = build_router(Arc::clone(&state));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, action_count, "actioncell listening");

    let shutdown_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("received shutdown signal");
            shutdown_signal.cancel();
        }
    });

    axum::serve(listener, router).with_graceful_shutdown(shutdown.cancelled_owned()).await?;
    Ok(())
}

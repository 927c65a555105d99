// SPDX-License-Identifier: MIT

//! Integration tests for the HTTP surface.
//!
//! Uses `axum_test::TestServer` — no real TCP needed.

use std::sync::Arc;

use axum_test::TestServer;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use actioncell::config::AppConfig;
use actioncell::registry::Registry;
use actioncell::state::AppState;
use actioncell::transport::build_router;

fn test_config() -> AppConfig {
    AppConfig::parse_from(["actioncell"])
}

fn test_server(registry: Registry) -> TestServer {
    let state = Arc::new(AppState::new(Arc::new(registry), test_config(), CancellationToken::new()));
    let router = build_router(state);
    TestServer::new(router).expect("failed to create test server")
}

#[tokio::test]
async fn healthz_reports_empty_registry() -> anyhow::Result<()> {
    let server = test_server(Registry::new());
    let resp = server.get("/healthz").await;
    resp.assert_status_ok();

    let body: serde_json::Value = resp.json();
    assert_eq!(body["status"], "running");
    assert_eq!(body["action_count"], 0);
    Ok(())
}

#[tokio::test]
async fn actions_listing_preserves_registration_order() -> anyhow::Result<()> {
    let registry = Registry::new();
    actioncell::demos::register_demo_actions(&registry).await?;

    let server = test_server(registry);
    let resp = server.get("/api/actions").await;
    resp.assert_status_ok();

    let list: Vec<serde_json::Value> = resp.json();
    let slugs: Vec<&str> = list.iter().filter_map(|a| a["slug"].as_str()).collect();
    assert_eq!(slugs, vec!["hello", "nuke", "upload_file", "user_profile"]);
    Ok(())
}

#[tokio::test]
async fn unknown_action_page_returns_404() -> anyhow::Result<()> {
    let server = test_server(Registry::new());
    let resp = server.get("/a/does-not-exist").await;
    resp.assert_status_not_found();

    let body: serde_json::Value = resp.json();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn registered_action_page_serves_shell() -> anyhow::Result<()> {
    let registry = Registry::new();
    actioncell::demos::register_demo_actions(&registry).await?;

    let server = test_server(registry);
    let resp = server.get("/a/hello").await;
    resp.assert_status_ok();
    Ok(())
}

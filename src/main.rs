// SPDX-License-Identifier: MIT

use clap::Parser;
use tracing::error;

use actioncell::config::AppConfig;

#[tokio::main]
async fn main() {
    let config = AppConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = actioncell::run(config).await {
        error!("fatal: {e:#}");
        std::process::exit(1);
    }
}

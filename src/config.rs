// SPDX-License-Identifier: MIT

/// Configuration for the action host.
#[derive(Debug, Clone, clap::Parser)]
pub struct AppConfig {
    /// Host to bind on.
    #[arg(long, default_value = "127.0.0.1", env = "ACTIONCELL_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8181, env = "ACTIONCELL_PORT")]
    pub port: u16,

    /// URL path prefix for all routes, e.g. "/backend". Empty means no prefix.
    #[arg(long, default_value = "", env = "ACTIONCELL_PREFIX")]
    pub prefix: String,

    /// Proxy static assets to a local Vite dev server instead of serving the
    /// embedded bundle. Not part of the protocol core.
    #[arg(long, env = "ACTIONCELL_DEV_PROXY")]
    pub dev_proxy: bool,

    /// Optional timeout in milliseconds for a single input wait. Zero means
    /// no timeout (inputs block indefinitely).
    #[arg(long, default_value_t = 0, env = "ACTIONCELL_INPUT_TIMEOUT_MS")]
    pub input_timeout_ms: u64,
}

impl AppConfig {
    /// The input-wait timeout, or `None` if inputs should block indefinitely.
    pub fn input_timeout(&self) -> Option<std::time::Duration> {
        if self.input_timeout_ms == 0 {
            None
        } else {
            Some(std::time::Duration::from_millis(self.input_timeout_ms))
        }
    }
}

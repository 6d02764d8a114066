mod config;
mod console;
mod documents;
mod engine;
mod errors;
mod models;
mod screening;
mod session;
#[cfg(test)]
mod testutil;
mod uploads;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::console::Console;
use crate::engine::http::HttpEngine;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HR console v{}", env!("CARGO_PKG_VERSION"));
    info!("Backend engine: {}", config.backend_url);

    let engine = HttpEngine::new(config.backend_url.clone());

    Console::new(&engine).run().await
}

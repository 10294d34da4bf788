//! ScholarSelect server
//!
//! Entry point for the chat counselor.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use scholar_select::config::AppConfig;
use scholar_select::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) so RUST_LOG and SCHOLAR_* apply below
    let _ = dotenv();

    init_tracing();

    let config = AppConfig::load().context("Configuration error")?;
    server::start_server(Arc::new(config)).await
}

/// Structured logging (M-LOG-STRUCTURED); `LOG_FORMAT=json` for JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}

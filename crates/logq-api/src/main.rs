//! logq HTTP service: translate log requests to SPL over HTTP.
//!
//! Fits the hybrid parser once at startup on a blocking thread, then serves
//! forced-mode parses. Drift records from concurrent requests go through a
//! mutex-guarded file sink.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use logq_api::config::ApiConfig;
use logq_api::drift::SerializedDriftLog;
use logq_api::routes;
use logq_api::state::AppState;
use logq_parser::{HybridParser, ParserConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logq-api starting");

    let config = ApiConfig::from_env();
    let parser_config = match &config.parser_config {
        Some(path) => ParserConfig::from_file(path)?,
        None => {
            tracing::warn!("LOGQ_CONFIG not set, using built-in parser defaults");
            ParserConfig::default()
        }
    };

    // ── Fit the parser ──────────────────────────────────────────
    let (parser, examples) = tokio::task::spawn_blocking(move || {
        HybridParser::from_config(&parser_config, |file| Box::new(SerializedDriftLog::new(file)))
    })
    .await??;
    let corpus_size = examples.len();

    let app = routes::build_router(AppState::new(parser, corpus_size));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, corpus_size, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}

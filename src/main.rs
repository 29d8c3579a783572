//! Passage highlighter · highlight service
//!
//! - Axum HTTP API for passage highlights (list/create/delete)
//! - Passage rendering and selection resolution
//! - Optional OpenAI translation of selections
//!
//! Important env variables:
//!   PORT                    : u16 (default 3000)
//!   HIGHLIGHTER_CONFIG_PATH : TOML config (prompts + extra passages)
//!   OPENAI_API_KEY          : enables OpenAI translation if present
//!   LOG_LEVEL               : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT              : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use passage_highlighter::config::port_from_env;
use passage_highlighter::routes::build_router;
use passage_highlighter::state::AppState;
use passage_highlighter::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let state = Arc::new(AppState::new());
  let app = build_router(state);

  let addr = SocketAddr::from(([0, 0, 0, 0], port_from_env()));
  let listener = TcpListener::bind(addr).await?;
  info!(target: "highlighter", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "highlighter", error = %e, "Failed to listen for shutdown signal");
  }
  info!(target: "highlighter", "Shutdown signal received");
}

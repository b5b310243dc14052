//! Binary entrypoint for the chatgpt-service HTTP proxy.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use chatgpt_service::config::Config;
use chatgpt_service::server::{self, AppState};

/// Interval between TTL eviction sweeps.
const EVICTION_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting chatgpt-service v{}", env!("CARGO_PKG_VERSION"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            return ExitCode::from(1);
        }
    };

    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to create state: {e}");
            return ExitCode::from(1);
        }
    };

    spawn_eviction_sweep(Arc::clone(&state));

    let port = state.config.port;
    if let Err(e) = server::run_server_with_shutdown(state, port, shutdown_signal()).await {
        tracing::error!("Server error: {e}");
        return ExitCode::from(1);
    }

    tracing::info!("Server exiting");
    ExitCode::SUCCESS
}

/// Schedule the periodic eviction sweep over the thread store.
fn spawn_eviction_sweep(state: Arc<AppState>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(EVICTION_SWEEP_INTERVAL);
        // First tick completes immediately; skip it so the initial sweep
        // happens one full interval after startup.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            state.chat.store().evict_expired(state.config.thread_ttl);
        }
    });
}

/// Resolve once the process receives ctrl-c.
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutting down server...");
}

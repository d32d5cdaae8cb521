// Auction tracker entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file)
// 2. Load config
// 3. Open the league store
// 4. Build the ledger and player directory
// 5. Create mpsc channels
// 6. Spawn WebSocket server task
// 7. Spawn service loop task
// 8. Wait for Ctrl+C
// 9. Cleanup on exit

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

use auction_tracker::app;
use auction_tracker::config;
use auction_tracker::ledger::Ledger;
use auction_tracker::players::PlayerDirectory;
use auction_tracker::store::LeagueStore;
use auction_tracker::ws_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, terminal stays clean)
    init_tracing()?;
    info!("Auction tracker starting up");

    // 2. Load config
    let config = config::load_or_default().context("failed to load configuration")?;
    info!(
        "Config loaded: port {}, database {}, page size {}",
        config.ws_port, config.db_path, config.page_size
    );

    // 3. Open the league store
    let store = Arc::new(
        LeagueStore::open(&config.db_path).context("failed to open league store")?,
    );
    info!("League store opened at {}", config.db_path);

    // 4. Build the ledger and player directory
    let ledger = Arc::new(Ledger::new(store, config.page_size));
    let state = app::AppState {
        ledger,
        directory: PlayerDirectory::bundled(),
    };

    // 5. Create mpsc channels
    let (ws_tx, ws_rx) = mpsc::channel(256);
    let (reply_tx, reply_rx) = mpsc::channel(256);

    // 6. Spawn WebSocket server task
    let ws_port = config.ws_port;
    let ws_handle = tokio::spawn(async move {
        if let Err(e) = ws_server::run(ws_port, ws_tx, reply_rx).await {
            error!("WebSocket server error: {e}");
        }
    });

    // 7. Spawn service loop task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(ws_rx, reply_tx, state).await {
            error!("Service loop error: {e}");
        }
    });

    // 8. Wait for Ctrl+C
    info!("Service ready. Listening on 127.0.0.1:{ws_port}");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Shutdown signal received");

    // 9. Cleanup: abort the server (it loops forever); the service loop
    // drains and exits once its channel closes.
    ws_handle.abort();
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), app_handle).await;

    info!("Auction tracker shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file under `logs/`.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("auction-tracker.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("auction_tracker=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

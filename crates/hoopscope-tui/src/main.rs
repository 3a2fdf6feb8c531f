// Hoopscope entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config (writes bundled defaults on first run)
// 3. Build the analysis client
// 4. Create mpsc channels and the app state
// 5. Spawn the app loop, run the TUI until quit
// 6. Wait briefly for the app loop to wind down

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

use hoopscope_app::app::{self, AppState};
use hoopscope_core::config;
use hoopscope_core::season::current_season;
use hoopscope_llm::client::AnalysisClient;
use hoopscope_tui::tui::{self, ViewState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Hoopscope starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded from {}: model={}, timeout={}s",
        config.config_dir.display(),
        config.llm.model,
        config.llm.timeout_secs
    );

    let client = AnalysisClient::from_config(&config).context("failed to build analysis client")?;
    if client.has_credential() {
        info!("Analysis client ready (API key configured)");
    } else {
        info!("Analysis client has no API key; analyses will fail until one is saved");
    }

    let (event_tx, event_rx) = mpsc::channel(16);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(64);

    let view_state = ViewState::new(
        config.selection.default_season,
        config.selection.default_games,
        current_season(&chrono::Local::now().date_naive()),
    );
    let app_state = AppState::new(config, client, event_tx);

    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(event_rx, cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    if let Err(e) = tui::run(ui_rx, cmd_tx, view_state).await {
        error!("TUI error: {}", e);
    }

    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), app_handle).await;

    info!("Hoopscope shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (the terminal belongs to the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("hoopscope.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hoopscope=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

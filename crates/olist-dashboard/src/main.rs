mod bootstrap;

use anyhow::{Context, Result};
use dashboard_core::settings::Settings;
use dashboard_runtime::session::DashboardSession;
use dashboard_ui::app::{self, App};

#[tokio::main]
async fn main() -> Result<()> {
    // Logging comes first so warnings from the last-used merge are kept.
    let (cli, matches) = Settings::parse_cli();

    let logs_dir = bootstrap::ensure_directories()?;
    let log_path = bootstrap::resolve_log_path(cli.log_file.as_deref(), &logs_dir);
    bootstrap::setup_logging(&cli.log_level, &log_path)?;

    let settings = cli.merge_last_used(&matches);

    tracing::info!("Olist dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data: {}, Theme: {}, Currency: {}, Top N: {}",
        settings.data_path.display(),
        settings.theme,
        settings.currency,
        settings.top_n
    );

    let mut session = DashboardSession::from_settings(&settings);
    let snapshot = session
        .snapshot()
        .with_context(|| format!("failed to load {}", settings.data_path.display()))?;

    match snapshot.range {
        Some(range) => tracing::info!(
            "Range {}..={}: {} rows, {} orders",
            range.start,
            range.end,
            snapshot.rows,
            snapshot.totals.total_orders
        ),
        None => tracing::info!("Dataset is empty; nothing to chart"),
    }

    let app = App::new(&settings.theme, settings.currency(), session, snapshot);

    // The loop exits on 'q' / Esc / Ctrl+C inside the TUI.  An external
    // SIGINT drops the loop mid-frame, so the terminal is restored here.
    tokio::select! {
        result = app.run() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down");
            app::restore_terminal()?;
        }
    }

    Ok(())
}

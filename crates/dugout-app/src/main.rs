// Dugout entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Initialize tracing (log to file, stdout is for output)
// 3. Load config
// 4. Fetch all datasets concurrently and build the snapshot
// 5. Run the command and print its output

use dugout_app::cli::{self, Cli};
use dugout_app::config;
use dugout_app::loader;

use anyhow::Context;
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse arguments
    let cli = Cli::parse();

    // 2. Initialize tracing
    init_tracing()?;
    info!("dugout starting up");

    // 3. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: data source {}, page size {}",
        config.data.source, config.leaderboard.page_size
    );

    // 4. Load datasets
    let source = loader::source_from_config(&config);
    let snapshot = loader::load_snapshot(source.as_ref(), &config.data)
        .await
        .context("failed to load league data")?;

    // 5. Run the command
    let output = cli::execute(&cli.command, &config, &snapshot)?;
    print!("{output}");

    info!("dugout finished");
    Ok(())
}

/// Initialize tracing to log to a file so stdout carries only command output.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("dugout.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dugout=info,dugout_app=info,dugout_core=info,warn")),
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

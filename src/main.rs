// UI Helper - command-line driver
//
// Loads a page description, attaches the helper, replays scripted actions
// (open/close/click/copy/wait) and prints the resulting document.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use ui_helper::config::{Config, LogRotation, LoggingConfig};
use ui_helper::logging::{CaptureLayer, LogBuffer};

/// Install the global subscriber: stderr + capture buffer, plus optional JSON file
///
/// Precedence: RUST_LOG env var > config file > default "info".
/// The returned guard must stay alive for file logs to flush.
fn init_tracing(
    logging: &LoggingConfig,
    log_buffer: &LogBuffer,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let default_filter = format!("ui_helper={}", logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(CaptureLayer::new(log_buffer.clone()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    if !logging.file_enabled {
        registry.init();
        return None;
    }

    if let Err(e) = std::fs::create_dir_all(&logging.file_dir) {
        eprintln!(
            "Warning: Could not create log directory {:?}: {}",
            logging.file_dir, e
        );
        registry.init();
        return None;
    }

    let file_appender = match logging.file_rotation {
        LogRotation::Hourly => {
            tracing_appender::rolling::hourly(&logging.file_dir, &logging.file_prefix)
        }
        LogRotation::Daily => {
            tracing_appender::rolling::daily(&logging.file_dir, &logging.file_prefix)
        }
        LogRotation::Never => {
            tracing_appender::rolling::never(&logging.file_dir, &logging.file_prefix)
        }
    };

    // Non-blocking writer: writes happen on a background thread
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    registry
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Before loading: a broken file must still be resettable
    let (page, actions, memory_clipboard, diagnostics) = match cli.command {
        Commands::Config { show, reset, path } => return cli::handle_config(show, reset, path),
        Commands::Run {
            page,
            actions,
            memory_clipboard,
            diagnostics,
        } => (page, actions, memory_clipboard, diagnostics),
    };

    Config::ensure_config_exists();
    let config = Config::load()?;

    let log_buffer = LogBuffer::new();
    let _file_guard = init_tracing(&config.logging, &log_buffer);

    cli::handle_run(
        &config,
        &log_buffer,
        &page,
        &actions,
        memory_clipboard,
        diagnostics,
    )
    .await
}

// CLI module - command-line argument parsing and handlers
//
// Subcommands:
// - run: load a page, attach the helper, replay actions, print the result
// - config --show / --path / --reset: configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use ui_helper::config::{Config, VERSION};
use ui_helper::document::lock;
use ui_helper::logging::LogBuffer;
use ui_helper::script::{run_steps, Step};
use ui_helper::{Clipboard, Document, MemoryClipboard, PageSpec, SystemClipboard, UiHelper};

/// UI Helper - modal overlays, backdrop dismissal and copy feedback
#[derive(Parser)]
#[command(name = "ui-helper")]
#[command(version = VERSION)]
#[command(about = "Drive modal and clipboard helpers against a page description", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a page and replay actions against it
    Run {
        /// Page description (JSON array of elements)
        page: PathBuf,

        /// Actions: open:<id>, close:<id>, click:<id>, copy:<id>, wait:<ms>
        actions: Vec<Step>,

        /// Use an in-process clipboard instead of the system one
        #[arg(long)]
        memory_clipboard: bool,

        /// Print captured diagnostics after the page snapshot
        #[arg(long)]
        diagnostics: bool,
    },

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

/// Load a page description file
pub fn load_page(path: &Path) -> Result<Document> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read page {}", path.display()))?;
    let elements: Vec<PageSpec> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse page {}", path.display()))?;
    Ok(Document::from_spec(&elements))
}

pub async fn handle_run(
    config: &Config,
    log_buffer: &LogBuffer,
    page: &Path,
    actions: &[Step],
    memory_clipboard: bool,
    diagnostics: bool,
) -> Result<()> {
    let document = load_page(page)?.into_shared();

    let clipboard: Arc<dyn Clipboard> = if memory_clipboard {
        Arc::new(MemoryClipboard::new())
    } else {
        Arc::new(SystemClipboard)
    };

    let helper = UiHelper::attach(document, config, clipboard);
    let outcomes = run_steps(&helper, actions).await?;
    for outcome in &outcomes {
        tracing::info!(?outcome, "Copy settled");
    }

    let snapshot = lock(helper.document()).snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    if diagnostics {
        for entry in log_buffer.get_all() {
            println!(
                "{} {:<5} {} {}",
                entry.timestamp.to_rfc3339(),
                entry.level.as_str(),
                entry.target,
                entry.message
            );
        }
    }

    Ok(())
}

/// Handle `config` without loading the config first, so a broken file can
/// still be located and reset
pub fn handle_config(show: bool, reset: bool, path: bool) -> Result<()> {
    if path {
        println!("{}", config_path()?.display());
    } else if show {
        let config = Config::load()?;
        println!("# Effective configuration (env > file > defaults)");
        print!("{}", config.to_toml());
    } else if reset {
        let path = config_path()?;
        reset_config(&path)?;
        println!("Config reset to defaults: {}", path.display());
    } else {
        println!("Usage: ui-helper config [--show|--reset|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --path    Show config file path");
    }
    Ok(())
}

fn config_path() -> Result<PathBuf> {
    Config::config_path().context("Could not determine config path")
}

/// Overwrite `path` with the default config, whatever it held before
pub fn reset_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, Config::default().to_toml())
        .with_context(|| format!("Failed to write {}", path.display()))
}

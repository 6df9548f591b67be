//! # tm - Advanced Task Manager
//!
//! A terminal task manager for planning and prioritising everyday work, with a
//! scriptable CLI and an interactive terminal user interface (TUI).
//!
//! ## Key Features
//!
//! - **Categories and Priorities**: Every task is Work, Personal or Urgent and
//!   High, Medium or Low priority
//! - **Due Dates**: ISO dates or shortcuts like `today`, `fri`, `in 3d`, `eom`
//! - **Filtered, Sorted Views**: Filter by category, sort by priority or due date
//! - **Write-Through Storage**: Every change is saved immediately to a local JSON file
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the TUI
//! tm
//!
//! # Add a task via CLI
//! tm add "Prepare quarterly report" --category work --priority high --due fri
//!
//! # List urgent tasks by due date
//! tm list --filter urgent --sort date
//!
//! # Mark a task done using an id prefix
//! tm toggle 0191
//! ```
//!
//! ## Key Commands
//!
//! - `tm ui` - Launch the TUI (the default when no command is given)
//! - `tm add <text>` - Create a task
//! - `tm edit <id>` - Overwrite a task's fields
//! - `tm list` - View tasks with a category filter and sort order
//! - `tm toggle <id>` / `tm delete <id>` - Complete or remove a task
//! - `tm reset` - Delete every task
//!
//! Data is stored in `~/.tm/` (override with `--data-dir` or `TM_DATA_DIR`),
//! alongside an optional `config.toml`. Set `TM_LOG=debug` for diagnostics.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod cli;
pub mod cmd;
pub mod config;
pub mod due;
pub mod fields;
pub mod form;
pub mod input;
pub mod storage;
pub mod store;
pub mod task;
pub mod view;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::{load_config, resolve_data_dir};
use storage::FileStore;
use store::TaskStore;

const LOG_FILE: &str = "tm.log";

/// Install the global subscriber. The TUI owns the terminal, so it logs to a
/// file in the data directory; everything else logs to stderr.
fn init_tracing(log_file: Option<File>) {
    let filter = EnvFilter::try_from_env("TM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(file) => registry
            .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
            .init(),
        None => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init(),
    }
}

fn open_log_file(data_dir: &Path) -> Option<File> {
    File::options()
        .create(true)
        .append(true)
        .open(data_dir.join(LOG_FILE))
        .ok()
}

fn run(cli: Cli) -> Result<()> {
    let data_dir = resolve_data_dir(cli.data_dir.as_deref());
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    let command = cli.command.unwrap_or(Commands::Ui);
    let is_ui = matches!(command, Commands::Ui);
    init_tracing(if is_ui { open_log_file(&data_dir) } else { None });

    if let Commands::Completions { shell } = command {
        cmd_completions(shell);
        return Ok(());
    }

    let config = load_config(&data_dir)?;
    let backend = FileStore::open(&data_dir)
        .with_context(|| format!("Failed to open storage in {}", data_dir.display()))?;
    tracing::debug!(dir = %backend.dir().display(), key = %config.storage.key, "opening task store");
    let mut store = TaskStore::open(backend, &config.storage.key).context("Failed to open task list")?;

    match command {
        Commands::Ui => tui::run::run_tui(store, &config.view).context("Terminal UI failed")?,

        Commands::Add { text, category, priority, due } =>
            cmd_add(&mut store, text, category, priority, due)?,

        Commands::Edit { id, text, category, priority, due, clear_due } =>
            cmd_edit(&mut store, id, text, category, priority, due, clear_due)?,

        Commands::List { filter, sort } => cmd_list(
            &store,
            filter.unwrap_or(config.view.filter),
            sort.unwrap_or(config.view.sort),
        ),

        Commands::Toggle { id } => cmd_toggle(&mut store, id)?,

        Commands::Delete { id } => cmd_delete(&mut store, id)?,

        Commands::Reset => cmd_reset(&mut store)?,

        Commands::Completions { .. } => unreachable!("completions handled above"),
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

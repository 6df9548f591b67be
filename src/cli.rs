use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Plan and prioritise your tasks.
/// Data lives in ~/.tm unless --data-dir or TM_DATA_DIR says otherwise.
#[derive(Parser)]
#[command(name = "tm", version, about = "Advanced task manager")]
pub struct Cli {
    /// Directory holding the task list and config.toml (default: $TM_DATA_DIR, then ~/.tm).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Subcommand to run; opens the interactive UI when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

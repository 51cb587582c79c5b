use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "ollie", version)]
#[command(about = "Replay analog-stick samples through the trick matcher", long_about = None)]
pub struct Cli {
    /// Session file (TOML) with matcher tuning and the trick list
    pub session: PathBuf,

    /// JSON sample script; without it a demo performing every trick is replayed
    pub script: Option<PathBuf>,
}

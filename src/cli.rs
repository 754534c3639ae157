//! Command-line interface for the 1A2B server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 1A2B - number-guessing game server
#[derive(Parser, Debug)]
#[command(name = "one_a_two_b")]
#[command(about = "1A2B number-guessing game server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Path to the best-record file (created if it doesn't exist)
        #[arg(long, default_value = "data/records.json")]
        records: PathBuf,
    },

    /// Clear the persisted best records
    ResetRecords {
        /// Path to the best-record file
        #[arg(long, default_value = "data/records.json")]
        records: PathBuf,
    },
}

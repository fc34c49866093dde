//! Command-line argument parsing for GameBuddy
//!
//! Everything else is configured through the environment; the command line
//! only selects the `.env` file and what to run.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// GameBuddy - conversational game recommendations over a semantic Steam index
#[derive(Parser, Debug)]
#[command(name = "gamebuddy")]
#[command(version)]
#[command(about = "Start the game recommendation server", long_about = None)]
pub struct Args {
    /// Path to .env server configuration file
    #[arg(short, long, value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Subcommand (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Build the index and serve HTTP requests
    Serve,

    /// Build (or validate) the embedding cache and exit
    BuildIndex,
}

impl Args {
    /// The command to run, `serve` when none was given
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }
}

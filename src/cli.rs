//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `flakeid`.
#[derive(Debug, Parser)]
#[command(name = "flakeid", version, about = "Mint and decode time-ordered 64-bit identifiers")]
pub struct Cli {
    /// YAML configuration file.
    #[arg(long, global = true, env = "FLAKEID_CONFIG")]
    pub config: Option<PathBuf>,

    /// Replay clock samples from a cassette instead of reading the system clock.
    #[arg(long, global = true, value_name = "CASSETTE")]
    pub replay: Option<PathBuf>,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Mint one identifier for datacenter 1, worker 1.
    Next {
        /// Print `<id>.<EXT>` instead of the bare identifier.
        #[arg(long, value_name = "EXT")]
        extension: Option<String>,
    },
    /// Mint identifiers for a datacenter and worker.
    Generate {
        /// Datacenter id (0-31); defaults to the configured one.
        #[arg(short, long)]
        datacenter: Option<u8>,
        /// Worker id (0-31); defaults to the configured one.
        #[arg(short, long)]
        worker: Option<u8>,
        /// How many identifiers to mint.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Break an identifier into its fields.
    Decode {
        /// Identifier in decimal.
        id: String,
        /// Print the fields as JSON.
        #[arg(long)]
        json: bool,
    },
}

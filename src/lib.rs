//! Process-local generator of unique, roughly time-ordered 64-bit
//! identifiers, plus the `flakeid` CLI built on it.
//!
//! ```no_run
//! use flakeid::snowflake::Generator;
//!
//! let generator = Generator::live();
//! let id = generator.generate_id(3, 7).unwrap();
//! assert_eq!(id.datacenter_id(), 3);
//! assert_eq!(id.worker_id(), 7);
//! ```

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod ports;
pub mod snowflake;

pub use error::{Error, Result};
pub use snowflake::{create_next_id, generate_id, Generator, NodeId, SnowflakeId};

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> std::result::Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli)
}

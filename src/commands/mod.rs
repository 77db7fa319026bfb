//! Command dispatch and handlers.

pub mod decode;
pub mod generate;
pub mod next;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::{Cli, Command};
use crate::config::GeneratorConfig;
use crate::context::ServiceContext;
use crate::logging;
use crate::ports::Clock;
use crate::snowflake::Generator;

/// Environment variable naming a cassette file to record clock samples into.
pub const ENV_RECORD: &str = "FLAKEID_RECORD";

/// Dispatch a parsed command to its handler.
///
/// `--replay` serves clock samples from a cassette. Otherwise, when
/// `FLAKEID_RECORD` is set to a file path, every clock sample the command
/// takes is recorded there.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the selected
/// command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let config = GeneratorConfig::load(cli.config.as_deref()).map_err(|e| e.to_string())?;
    logging::init(&config.log_level);

    let ctx = if let Some(path) = &cli.replay {
        ServiceContext::replaying(path)?
    } else if let Ok(path) = env::var(ENV_RECORD) {
        ServiceContext::recording(&PathBuf::from(path))
    } else {
        ServiceContext::live()
    };

    let result = dispatch_with_context(&cli.command, &ctx, &config);

    // Finish recording after command completes (even on error)
    if let Some(path) = ctx.finish()? {
        eprintln!("Recording saved to: {}", path.display());
    }

    result
}

/// Dispatch a command with the given service context and configuration.
fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    config: &GeneratorConfig,
) -> Result<(), String> {
    match command {
        Command::Next { extension } => next::run(&generator(ctx, config)?, extension.as_deref()),
        Command::Generate { datacenter, worker, count } => generate::run(
            &generator(ctx, config)?,
            datacenter.unwrap_or(config.datacenter_id),
            worker.unwrap_or(config.worker_id),
            *count,
        ),
        Command::Decode { id, json } => {
            decode::run(id, &config.time_base().map_err(|e| e.to_string())?, *json)
        }
    }
}

fn generator(
    ctx: &ServiceContext,
    config: &GeneratorConfig,
) -> Result<Generator<Arc<dyn Clock>>, String> {
    Generator::from_config(Arc::clone(&ctx.clock), config).map_err(|e| e.to_string())
}

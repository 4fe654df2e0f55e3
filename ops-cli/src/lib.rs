//! `claimlens` command-line tool
//!
//! Runs bill analysis, policy parsing and market alternative lookups from
//! the shell, and hosts the billing HTTP API. Results are printed to stdout
//! as pretty JSON; logs go to stderr through the redacting logger.

pub mod cli;
pub mod commands;
pub mod error;

pub use cli::*;
pub use commands::*;
pub use error::*;

use config_engine::{AppConfig, ConfigLoader};
use logger_redacted::LoggerConfig;

/// # Errors
///
/// Fails when the configuration file is missing or invalid.
pub fn load_config(cli: &Cli) -> CliResult<AppConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    Ok(loader.load()?)
}

pub fn logger_config(config: &AppConfig) -> LoggerConfig {
    LoggerConfig {
        level: config.logging.level.clone(),
        json: config.logging.json,
        redaction_enabled: config.logging.redact,
    }
}

/// Execute `command`, returning the text to print, if any
///
/// # Errors
///
/// Returns the failure of the command.
pub async fn run(ctx: &Context, command: Command) -> CliResult<Option<String>> {
    match command {
        Command::Analyze { file, policy, summary } => {
            analyze(ctx, &file, policy.as_deref(), summary).await.map(Some)
        }
        Command::ParsePolicy { file } => parse_policy(&file).await.map(Some),
        Command::Alternatives { name, price, kind } => alternatives(ctx, &name, price, kind.into()).map(Some),
        Command::Serve { bind } => {
            let addr = bind_address(ctx, bind.as_deref())?;
            serve(ctx, addr).await.map(|()| None)
        }
    }
}

use clap::Parser;
use colored::Colorize;
use error_common::ErrorReport;
use logger_redacted::init_logging;
use ops_cli::{load_config, logger_config, run, Cli, CliError, Context};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(error) = execute(cli).await {
        let report = ErrorReport::from_error(&error);
        error!(
            error_id = %report.error_id,
            error_type = %report.error_type,
            code = %report.code,
            "Command failed"
        );
        eprintln!("{} {error} ({})", "error:".bright_red().bold(), report.code);
        std::process::exit(error.exit_code());
    }
}

async fn execute(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli)?;
    init_logging(&logger_config(&config))?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting claimlens");

    let ctx = Context::from_config(config).await?;
    if let Some(output) = run(&ctx, cli.command).await? {
        println!("{output}");
    }
    Ok(())
}

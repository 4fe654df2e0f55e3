// Configuration validation
use std::net::SocketAddr;

use crate::error::{ConfigError, Result};
use crate::settings::AppConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// # Errors
///
/// Returns [`ConfigError::ValidationError`] describing the first invalid
/// setting.
pub fn validate(config: &AppConfig) -> Result<()> {
    validate_log_level(&config.logging.level)?;

    config
        .server
        .bind_address
        .parse::<SocketAddr>()
        .map_err(|e| {
            ConfigError::ValidationError(format!(
                "server.bind_address '{}' is not a socket address: {e}",
                config.server.bind_address
            ))
        })?;

    if config.data.currency_symbol.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "data.currency_symbol cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Accepts bare levels and `target=level` directives, comma separated
fn validate_log_level(directives: &str) -> Result<()> {
    if directives.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "logging.level cannot be empty".to_string(),
        ));
    }

    for directive in directives.split(',').map(str::trim) {
        let level = directive
            .rsplit_once('=')
            .map_or(directive, |(_, level)| level)
            .to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level directive '{directive}' has unknown level"
            )));
        }
    }
    Ok(())
}

//! Logging with automatic PII redaction
//!
//! Every formatted log line passes through [`PiiRedactor`] before it reaches
//! the output, so patient identifiers, email addresses, phone numbers and
//! SSNs that slip into messages or fields never land in log files.
//!
//! # Detected Data Types
//!
//! - **Email Addresses**: `jane.doe@example.com` → `EMAIL[hash]` or `j***@e***`
//! - **Phone Numbers**: `(555) 123-4567` → `PHONE[hash]` or `(***) ***-****`
//! - **SSN**: `123-45-6789` → `SSN[hash]` or `***-**-****`
//! - **Patient Identifiers**: `PAT-004217`, `MRN123456` → `PATIENT[hash]`
//! - **Custom Patterns**: Configurable deployment-specific patterns
//!
//! # Example
//!
//! ```rust,no_run
//! use logger_redacted::{init_logging, LoggerConfig};
//!
//! fn main() -> Result<(), logger_redacted::LoggingError> {
//!     init_logging(&LoggerConfig::default())?;
//!
//!     // Written as: "Bill uploaded by EMAIL[...]"
//!     tracing::info!("Bill uploaded by jane.doe@example.com");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod redactor;
pub mod writer;

pub use config::*;
pub use error::*;
pub use redactor::*;
pub use writer::*;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level when set.
///
/// # Errors
///
/// Fails when the filter directive or a custom redaction pattern does not
/// parse, or when a global subscriber is already installed.
pub fn init_logging(config: &LoggerConfig) -> LoggingResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| LoggingError::InvalidFilter(e.to_string()))?,
    };

    let redaction = if config.redaction_enabled {
        RedactionConfig::default()
    } else {
        RedactionConfig::disabled()
    };
    let redactor = Arc::new(PiiRedactor::new(redaction)?);
    let writer = RedactingMakeWriter::new(std::io::stderr, redactor);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| LoggingError::Init(e.to_string()))
}

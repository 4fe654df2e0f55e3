use std::path::PathBuf;

use billing_service::BillingError;
use config_engine::ConfigError;
use error_common::{codes, Classify, ErrorKind};
use insurance_service::InsuranceError;
use logger_redacted::LoggingError;
use pricing_service::PricingError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging setup failed: {0}")]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Billing(#[from] BillingError),

    #[error(transparent)]
    Insurance(#[from] InsuranceError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a valid bill: {reason}")]
    BillFormat { path: PathBuf, reason: String },

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

impl Classify for CliError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) | Self::Logging(_) => ErrorKind::Configuration,
            Self::Billing(error) => error.kind(),
            Self::Insurance(error) => error.kind(),
            Self::Pricing(error) => error.kind(),
            Self::Read { .. } => ErrorKind::Validation,
            Self::BillFormat { .. } => ErrorKind::Format,
            Self::Output(_) | Self::Server(_) => ErrorKind::Internal,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Config(_) | Self::Logging(_) => codes::system::CONFIGURATION,
            Self::Billing(error) => error.code(),
            Self::Insurance(error) => error.code(),
            Self::Pricing(error) => error.code(),
            Self::Read { .. } => codes::system::IO,
            Self::BillFormat { .. } => codes::validation::INVALID_FORMAT,
            Self::Output(_) | Self::Server(_) => codes::system::INTERNAL,
        }
    }
}

impl CliError {
    /// 2 for problems with the input, 1 for everything else
    pub fn exit_code(&self) -> i32 {
        if self.kind().is_client_error() {
            2
        } else {
            1
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;

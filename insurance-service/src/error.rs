use error_common::{codes, Classify, ErrorKind};
use thiserror::Error;

use crate::parser::PolicyFormatError;

#[derive(Error, Debug)]
pub enum InsuranceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("Policy document error: {0}")]
    DocumentFormat(#[from] PolicyFormatError),

    #[error("Failed to read policy document: {0}")]
    Io(#[from] std::io::Error),
}

impl Classify for InsuranceError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::InvalidPolicy(_) => ErrorKind::Validation,
            Self::DocumentFormat(_) => ErrorKind::Format,
            Self::Io(_) => ErrorKind::Configuration,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => codes::validation::INVALID_INPUT,
            Self::InvalidPolicy(_) => codes::policy::INVALID_POLICY,
            Self::DocumentFormat(_) => codes::policy::DOCUMENT_FORMAT,
            Self::Io(_) => codes::system::IO,
        }
    }
}

pub type InsuranceResult<T> = Result<T, InsuranceError>;

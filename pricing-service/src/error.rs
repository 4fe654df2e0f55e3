use error_common::{codes, Classify, ErrorKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid reference entry '{item}': {reason}")]
    InvalidReferenceEntry { item: String, reason: String },

    #[error("Failed to read reference prices: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse reference prices: {0}")]
    Json(#[from] serde_json::Error),
}

impl Classify for PricingError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::InvalidReferenceEntry { .. } | Self::Io(_) | Self::Json(_) => {
                ErrorKind::Configuration
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => codes::validation::INVALID_INPUT,
            Self::InvalidReferenceEntry { .. } => codes::pricing::INVALID_REFERENCE_ENTRY,
            Self::Io(_) | Self::Json(_) => codes::pricing::REFERENCE_SOURCE_UNREADABLE,
        }
    }
}

pub type PricingResult<T> = std::result::Result<T, PricingError>;

/// Trimmed item name, rejecting blank input
pub(crate) fn require_name(item_name: &str) -> PricingResult<&str> {
    let trimmed = item_name.trim();
    if trimmed.is_empty() {
        return Err(PricingError::Validation("Item name cannot be empty".to_string()));
    }
    Ok(trimmed)
}

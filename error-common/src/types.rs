use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse error classification shared by all services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed or missing input supplied by the caller
    #[serde(rename = "validation_error")]
    Validation,
    /// A referenced resource does not exist
    #[serde(rename = "not_found")]
    NotFound,
    /// A source document does not match the expected layout
    #[serde(rename = "format_error")]
    Format,
    /// Startup or configuration problem
    #[serde(rename = "configuration_error")]
    Configuration,
    /// Unexpected failure; details are only available in logs
    #[serde(rename = "internal_error")]
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation_error",
            Self::NotFound => "not_found",
            Self::Format => "format_error",
            Self::Configuration => "configuration_error",
            Self::Internal => "internal_error",
        }
    }

    /// Errors the caller can fix by changing the request
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation | Self::NotFound | Self::Format)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every service error enum so callers can map errors
/// without matching on foreign variants.
pub trait Classify: std::error::Error {
    fn kind(&self) -> ErrorKind;

    fn code(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_as_error_type() {
        let json = serde_json::to_string(&ErrorKind::Validation).unwrap();
        assert_eq!(json, "\"validation_error\"");
        assert_eq!(ErrorKind::Internal.to_string(), "internal_error");
    }

    #[test]
    fn test_client_error_kinds() {
        assert!(ErrorKind::Validation.is_client_error());
        assert!(ErrorKind::Format.is_client_error());
        assert!(!ErrorKind::Internal.is_client_error());
        assert!(!ErrorKind::Configuration.is_client_error());
    }
}

// Error reporting utilities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Classify, ErrorKind};

/// Public error body returned to API and CLI callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Unique error ID for tracking
    pub error_id: Uuid,
    pub error_type: ErrorKind,
    pub code: String,
    /// Human-readable error message
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorReport {
    pub fn from_error<E: Classify>(error: &E) -> Self {
        let kind = error.kind();
        // Internal causes stay in the logs
        let message = match kind {
            ErrorKind::Internal => "Internal error; see logs for the matching error id".to_string(),
            _ => error.to_string(),
        };

        Self {
            error_id: Uuid::new_v4(),
            error_type: kind,
            code: error.code().to_string(),
            message,
            timestamp: Utc::now(),
        }
    }

    /// Reuse an id that was already logged alongside the cause
    pub fn with_error_id(mut self, error_id: Uuid) -> Self {
        self.error_id = error_id;
        self
    }
}

/// Log an unexpected failure with its full cause chain and return the
/// correlation id under which it was recorded.
pub fn report_internal(context: &str, cause: &anyhow::Error) -> Uuid {
    let error_id = Uuid::new_v4();
    tracing::error!(
        error_id = %error_id,
        context = context,
        error = format!("{cause:#}"),
        "Internal failure"
    );
    error_id
}

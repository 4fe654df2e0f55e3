//! Common error handling utilities for ClaimLens Engine
//!
//! This crate provides the error vocabulary shared by every ClaimLens
//! service. Each service keeps its own `thiserror` enum; this crate gives
//! those enums a common classification and a single public report shape.
//!
//! # Key Features
//!
//! - **Error Kinds**: Coarse classification used to map errors to HTTP status
//!   codes and CLI exit codes
//! - **Error Codes**: Stable, machine-readable codes for API responses
//! - **Error Reports**: Public error body that never carries internal causes
//! - **Internal Failure Reporting**: Logs the full cause chain under a
//!   correlation id that is safe to hand back to callers
//!
//! # Example
//!
//! ```rust
//! use error_common::{codes, Classify, ErrorKind, ErrorReport};
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("Item name cannot be empty")]
//! struct EmptyName;
//!
//! impl Classify for EmptyName {
//!     fn kind(&self) -> ErrorKind {
//!         ErrorKind::Validation
//!     }
//!
//!     fn code(&self) -> &'static str {
//!         codes::validation::MISSING_REQUIRED_FIELD
//!     }
//! }
//!
//! let report = ErrorReport::from_error(&EmptyName);
//! assert_eq!(report.error_type, ErrorKind::Validation);
//! assert_eq!(report.code, "VALIDATION_1002");
//! ```

pub mod codes;
pub mod reporting;
pub mod types;

pub use reporting::*;
pub use types::*;

//! Insurance policy model for bill coverage evaluation
//!
//! This crate provides:
//! - Policy model with case-insensitive coverage, exclusion and
//!   non-payable queries
//! - Built-in default policy
//! - Policy document parsing behind pluggable document layouts
//! - Active policy registry with versioned, atomically replaced snapshots

pub mod defaults;
pub mod error;
pub mod models;
pub mod parser;
pub mod service;

pub use defaults::*;
pub use error::*;
pub use models::*;
pub use parser::*;
pub use service::*;

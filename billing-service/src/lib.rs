//! Medical bill review for ClaimLens
//!
//! Provides:
//! - Coverage evaluation of a bill against the active insurance policy
//! - Market price warnings for treatments and other billed items
//! - Bill document parsing behind pluggable layouts
//! - Patient-facing summaries of an analysis
//! - In-memory billing record ledger with overcharge and duplicate detection
//! - The `/api/billing` HTTP routes

pub mod anomaly;
pub mod document;
pub mod error;
pub mod evaluator;
pub mod ledger;
pub mod models;
pub mod records;
pub mod reporting;
pub mod routes;
pub mod service;

pub use anomaly::*;
pub use document::*;
pub use error::*;
pub use evaluator::*;
pub use ledger::*;
pub use models::*;
pub use records::*;
pub use reporting::*;
pub use service::*;

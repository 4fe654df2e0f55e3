//! Market price reference data for medical bill review
//!
//! This crate provides:
//! - Reference price table with case-insensitive lookup
//! - Cost efficiency classification of billed amounts into market bands
//! - Cheaper medicine brands and procedure providers with savings estimates

pub mod alternatives;
pub mod comparator;
pub mod error;
pub mod models;
pub mod reference;

pub use alternatives::*;
pub use comparator::*;
pub use error::*;
pub use models::*;
pub use reference::*;

//! Configuration management for ClaimLens Engine
//!
//! Settings are layered, later sources overriding earlier ones:
//!
//! 1. Built-in defaults ([`AppConfig::default`])
//! 2. An optional YAML or TOML file
//! 3. `CLAIMLENS_`-prefixed environment variables, with `__` separating
//!    nested keys (`CLAIMLENS_SERVER__BIND_ADDRESS=0.0.0.0:8080`)
//!
//! # Example
//!
//! ```rust,no_run
//! use config_engine::ConfigLoader;
//!
//! fn main() -> Result<(), config_engine::ConfigError> {
//!     let config = ConfigLoader::new().with_file("claimlens.yaml").load()?;
//!     println!("serving on {}", config.server.bind_address);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use error::*;
pub use loader::*;
pub use settings::*;

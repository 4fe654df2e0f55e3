use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use figment::Figment;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::settings::AppConfig;
use crate::validation::validate;

pub const ENV_PREFIX: &str = "CLAIMLENS_";

/// Builds an [`AppConfig`] from defaults, an optional file and the
/// environment.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            file: None,
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// `.toml` files are read as TOML, anything else as YAML
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn figment(&self) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        if let Some(path) = &self.file {
            let is_toml = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
            figment = if is_toml {
                figment.merge(Toml::file(path))
            } else {
                figment.merge(Yaml::file(path))
            };
        }

        figment.merge(Env::prefixed(&self.env_prefix).split("__"))
    }

    /// # Errors
    ///
    /// Fails when the configured file is missing, a source cannot be parsed,
    /// or the merged result does not pass validation.
    pub fn load(&self) -> Result<AppConfig> {
        if let Some(path) = &self.file {
            if !path.exists() {
                return Err(ConfigError::SourceNotFound(path.clone()));
            }
        }

        let config: AppConfig = self.figment().extract().map_err(Box::new)?;
        validate(&config)?;

        debug!(
            file = ?self.file,
            bind_address = %config.server.bind_address,
            "Configuration loaded"
        );
        Ok(config)
    }
}

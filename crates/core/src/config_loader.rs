use crate::config::AppConfig;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/Config.toml";

/// Environment variable prefix; nested keys use `__`, e.g. `PROPARB_SCAN__BANKROLL`.
pub const ENV_PREFIX: &str = "PROPARB_";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration by merging defaults, `config/Config.toml` and
    /// `PROPARB_` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be parsed.
    pub fn load() -> Result<AppConfig> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Loads configuration from a specific TOML file. A missing file is not
    /// an error; defaults and environment variables still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        let path = path.as_ref();
        let config: AppConfig = Self::base()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

        tracing::debug!(path = %path.display(), bankroll = %config.scan.bankroll, "Configuration loaded");
        Ok(config)
    }

    /// Loads configuration with a profile overlay (`config/Config.{profile}.toml`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be parsed.
    pub fn load_with_profile(profile: &str) -> Result<AppConfig> {
        let config: AppConfig = Self::base()
            .merge(Toml::file(DEFAULT_CONFIG_PATH))
            .merge(Toml::file(format!("config/Config.{profile}.toml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load configuration profile '{profile}'"))?;

        Ok(config)
    }

    fn base() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
    }
}

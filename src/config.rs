//! Application configuration management.
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. A TOML file (explicit path, else `config.toml` in the platform config dir)
//! 3. Environment variables prefixed `STATCACHE_`
//!
//! CLI flags are applied on top by the caller.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::clients::compare::DEFAULT_BUFFER_SIZE;
use crate::clients::lines::OnMissing;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "STATCACHE_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// What the line reader does with missing or unreadable files.
    pub on_missing: OnMissing,

    /// Directories searched for relative file names the line reader can't
    /// find as given.
    pub search_dirs: Vec<PathBuf>,

    /// Treat files with identical signatures as equal without reading them.
    pub shallow_compare: bool,

    /// Chunk size in bytes for content comparison.
    pub compare_buffer_size: usize,

    /// Normalize cache keys to Unicode NFC.
    pub normalize_unicode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            on_missing: OnMissing::Propagate,
            search_dirs: Vec::new(),
            shallow_compare: false,
            compare_buffer_size: DEFAULT_BUFFER_SIZE,
            normalize_unicode: cfg!(target_os = "macos"),
        }
    }
}

impl Config {
    /// Load the configuration, falling back to defaults on any error.
    ///
    /// `path` overrides the platform-specific config file location.
    pub fn load(path: Option<&Path>) -> Self {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load the configuration, reporting errors.
    ///
    /// # Errors
    ///
    /// Fails if an explicitly given config file does not exist, or if the
    /// config file or environment contains invalid values. A missing file at
    /// the platform default location is not an error.
    pub fn try_load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) if !p.is_file() => {
                anyhow::bail!("Config file not found: {}", p.display())
            }
            Some(p) => Some(p.to_path_buf()),
            None => Self::config_path().ok(),
        };
        Self::figment(file.as_deref())
            .extract()
            .context("Invalid configuration")
    }

    /// The layered figment, exposed for callers that want to add providers.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(file) = file {
            log::debug!("Reading config from {}", file.display());
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the default platform-specific configuration path.
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "statcache", "statcache")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }
}

//! Layered application configuration.
//!
//! Settings are merged with `figment`, later layers winning:
//!
//! 1. built-in defaults
//! 2. the TOML file passed with `--config` (no file is read otherwise)
//! 3. `DUPES2TRASH_*` environment variables, e.g. `DUPES2TRASH_CHUNK_SIZE=65536`
//! 4. command-line flags
//!
//! ```toml
//! output = "json"
//! min_size = 1024
//! skip_hidden = true
//! ignore_patterns = ["*.tmp", "node_modules/"]
//! chunk_size = 65536
//! ```

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, OutputFormat};
use crate::duplicates::FinderConfig;
use crate::scanner::{WalkerConfig, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};

/// Prefix of environment variables read into [`Config`].
pub const ENV_PREFIX: &str = "DUPES2TRASH_";

/// Errors loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file named by `--config` does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed or has invalid values.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Result rendering.
    pub output: OutputFormat,
    /// Smallest file size considered, in bytes.
    pub min_size: Option<u64>,
    /// Largest file size considered, in bytes.
    pub max_size: Option<u64>,
    /// Skip names starting with `.`.
    pub skip_hidden: bool,
    /// Gitignore-style patterns excluded from the walk.
    pub ignore_patterns: Vec<String>,
    /// Bytes read per comparison step, clamped to `1..=MAX_CHUNK_SIZE`.
    pub chunk_size: usize,
    /// List instead of moving.
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputFormat::Text,
            min_size: None,
            max_size: None,
            skip_hidden: false,
            ignore_patterns: Vec::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            dry_run: false,
        }
    }
}

impl Config {
    /// The default and environment layers, plus `path` when given.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load defaults, the optional TOML file, and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `path` is given but missing and
    /// [`ConfigError::Invalid`] if any layer fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
        }

        let config: Config = Self::figment(path).extract().map_err(Box::new)?;
        log::debug!("Loaded configuration: {:?}", config);
        Ok(config.normalized())
    }

    /// Load every layer and apply command-line overrides.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Self::load(cli.config.as_deref())?;
        config.apply_cli(cli);
        Ok(config)
    }

    /// Overlay values given on the command line.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(output) = cli.output {
            self.output = output;
        }
        if cli.min_size.is_some() {
            self.min_size = cli.min_size;
        }
        if cli.max_size.is_some() {
            self.max_size = cli.max_size;
        }
        if cli.skip_hidden {
            self.skip_hidden = true;
        }
        if !cli.ignore_patterns.is_empty() {
            self.ignore_patterns.extend(cli.ignore_patterns.iter().cloned());
        }
        if let Some(chunk_size) = cli.chunk_size {
            self.chunk_size = chunk_size;
        }
        if cli.dry_run {
            self.dry_run = true;
        }
        *self = std::mem::take(self).normalized();
    }

    fn normalized(mut self) -> Self {
        self.chunk_size = self.chunk_size.clamp(1, MAX_CHUNK_SIZE);
        self
    }

    /// Walker settings derived from this configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::default()
            .with_skip_hidden(self.skip_hidden)
            .with_size_bounds(self.min_size, self.max_size)
            .with_ignore_patterns(self.ignore_patterns.clone())
    }

    /// Finder settings derived from this configuration.
    #[must_use]
    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig::default()
            .with_walker_config(self.walker_config())
            .with_chunk_size(self.chunk_size)
    }
}

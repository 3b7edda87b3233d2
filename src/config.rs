//! Configuration and data file loading
//!
//! Configuration is layered with figment:
//! - built-in defaults
//! - an optional TOML file
//! - `SKIRMISH_` environment variables (`__` separates nested keys,
//!   e.g. `SKIRMISH_RULES__FRONT_RANK=3`)

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Combat rule tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatRules {
    /// Monsters that can be engaged at once (front rank size)
    pub attackers_count: usize,
    /// Party positions able to melee
    pub front_rank: usize,
    /// Base percent chance that a retreat succeeds
    pub retreat_chance: u8,
    /// Sides of the per-round handicap die
    pub handicap_die: u32,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            attackers_count: 3,
            front_rank: 2,
            retreat_chance: 50,
            handicap_die: 7,
        }
    }
}

/// Top level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub rules: CombatRules,
    /// Combat delay setting (0-9). Seconds a spell result stays up; 0 waits for a key.
    pub delay: u8,
    /// Fixed RNG seed, random when unset
    pub seed: Option<u64>,
    /// Driver poll period in milliseconds
    pub tick_ms: u64,
    /// Encounter data file
    pub encounter: Option<PathBuf>,
    /// Party data file
    pub party: Option<PathBuf>,
    /// String table overrides
    pub strings: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules: CombatRules::default(),
            delay: 5,
            seed: None,
            tick_ms: 50,
            encounter: None,
            party: None,
            strings: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] figment::Error),
}

/// Data file errors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: figment::Error,
    },
}

impl Config {
    /// The layered figment for an optional config file
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed("SKIRMISH_").split("__"))
    }

    /// Load configuration. A named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
        }
        Ok(Self::figment(path).extract()?)
    }
}

/// Figment over a single TOML data file that must exist
pub(crate) fn load_figment(path: &Path) -> Result<Figment, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    Ok(Figment::from(Toml::file(path)))
}

/// Deserialize a TOML data file
pub(crate) fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    load_figment(path)?
        .extract()
        .map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

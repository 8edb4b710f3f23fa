/// Execution configuration.
///
/// JSON file at `QEXEC_CONFIG` (or passed to `from_file`), then environment
/// overrides, then defaults when nothing is found.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::runtime::MAX_STEPS;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "QEXEC_CONFIG";
/// Environment variable overriding `qvm.seed`.
pub const SEED_ENV: &str = "QEXEC_SEED";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{var} must be an unsigned integer, got '{value}'")]
    InvalidEnv { var: &'static str, value: String },
}

/// Execution settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Local simulator configuration
    pub qvm: QvmConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QvmConfig {
    /// Base RNG seed; shot `k` uses `seed + k`. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Widest program the simulator accepts.
    pub max_qubits: usize,
    /// Per-shot instruction budget.
    pub max_steps: usize,
    /// Run shots on the rayon pool.
    pub parallel_shots: bool,
}

impl Default for QvmConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_qubits: 20,
            max_steps: MAX_STEPS,
            parallel_shots: true,
        }
    }
}

impl Config {
    /// Load config from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save config to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })
    }

    /// Apply environment overrides on top of `self`.
    pub fn with_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(value) = std::env::var(SEED_ENV) {
            let seed = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { var: SEED_ENV, value: value.clone() })?;
            self.qvm.seed = Some(seed);
        }
        Ok(self)
    }

    /// Defaults, then the file named by `QEXEC_CONFIG`, then `QEXEC_SEED`.
    ///
    /// Never fails: a broken file or variable is logged and skipped.
    pub fn load() -> Self {
        let base = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(&path).unwrap_or_else(|err| {
                warn!(error = %err, "ignoring {CONFIG_ENV}");
                Self::default()
            }),
            None => Self::default(),
        };
        match base.clone().with_env() {
            Ok(config) => {
                debug!(?config, "loaded configuration");
                config
            }
            Err(err) => {
                warn!(error = %err, "ignoring environment override");
                base
            }
        }
    }
}

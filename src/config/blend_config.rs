//! Service configuration: HTTP server settings and optimizer limits
//!
//! Every field has a default, so an empty or absent file yields a working
//! service with the values in [`super::defaults`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use super::defaults::{
    CONFIG_PATH_ENV, DEFAULT_MAX_BODY_BYTES, DEFAULT_MAX_COALS, DEFAULT_MAX_COMBINATIONS,
    DEFAULT_SERVER_ADDR, DEFAULT_TIME_BUDGET_MS, DEFAULT_WORKERS, LOCAL_CONFIG_FILE,
};
use crate::optimization::OptimizerLimits;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration.
///
/// Load with `BlendConfig::load()` which searches:
/// 1. `$COALBLEND_CONFIG` env var
/// 2. `./blend_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlendConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Search limits and worker pool size
    #[serde(default)]
    pub optimizer: OptimizerConfig,
}

impl BlendConfig {
    /// Load configuration using the standard search order:
    /// 1. `$COALBLEND_CONFIG` environment variable
    /// 2. `./blend_config.toml` in the current working directory
    /// 3. Built-in defaults
    ///
    /// A file that fails to load is logged and skipped.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from {CONFIG_PATH_ENV}");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {CONFIG_PATH_ENV}, falling back");
                    }
                }
            } else {
                warn!(path = %path, "{CONFIG_PATH_ENV} points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./{LOCAL_CONFIG_FILE}");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{LOCAL_CONFIG_FILE}, using defaults");
                }
            }
        }

        info!("No {LOCAL_CONFIG_FILE} found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    ///
    /// Unknown keys are logged as warnings; out-of-range values are errors.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        // Two-pass: unknown keys first (warnings only)
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML, e.g. for `coal-blend print-config`.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (errors, warnings) = super::validation::validate_ranges(self);
        for w in &warnings {
            warn!("{}", w);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Apply `$COALBLEND_SERVER_ADDR`, then the CLI flag, over `server.addr`.
    pub fn apply_addr_overrides(&mut self, env_addr: Option<String>, cli_addr: Option<String>) {
        if let Some(addr) = env_addr.filter(|a| !a.trim().is_empty()) {
            self.server.addr = addr;
        }
        if let Some(addr) = cli_addr {
            self.server.addr = addr;
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ============================================================================
// Server
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server bind address.
    ///
    /// Can be overridden by `COALBLEND_SERVER_ADDR` env var or `--addr` CLI flag.
    #[serde(default = "default_server_addr")]
    pub addr: String,

    /// Request body limit in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Cross-origin callers allowed; empty means same-origin only
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_server_addr() -> String {
    DEFAULT_SERVER_ADDR.to_string()
}
fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
            max_body_bytes: default_max_body_bytes(),
            cors_origins: Vec::new(),
        }
    }
}

// ============================================================================
// Optimizer
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Maximum coals per request
    #[serde(default = "default_max_coals")]
    pub max_coals: usize,

    /// Ceiling on feasible combinations per request
    #[serde(default = "default_max_combinations")]
    pub max_combinations: u64,

    /// Enumeration deadline (ms)
    #[serde(default = "default_time_budget_ms")]
    pub time_budget_ms: u64,

    /// Concurrent optimizations (0 = one per CPU)
    #[serde(default)]
    pub workers: usize,
}

fn default_max_coals() -> usize {
    DEFAULT_MAX_COALS
}
fn default_max_combinations() -> u64 {
    DEFAULT_MAX_COMBINATIONS
}
fn default_time_budget_ms() -> u64 {
    DEFAULT_TIME_BUDGET_MS
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_coals: default_max_coals(),
            max_combinations: default_max_combinations(),
            time_budget_ms: default_time_budget_ms(),
            workers: DEFAULT_WORKERS,
        }
    }
}

impl OptimizerConfig {
    /// Per-call limits handed to the optimizer.
    pub fn limits(&self) -> OptimizerLimits {
        OptimizerLimits {
            max_coals: self.max_coals,
            max_combinations: self.max_combinations,
            time_budget: Duration::from_millis(self.time_budget_ms),
        }
    }

    /// Effective worker count with `0` resolved to the CPU count.
    pub fn resolved_workers(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            std::thread::available_parallelism().map_or(1, |n| n.get())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

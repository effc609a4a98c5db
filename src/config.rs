//! Configuration
//!
//! Optional TOML file; every field has a default so an empty file (or no
//! file at all) yields the stock thresholds and socket path.
//!
//! ```toml
//! [thresholds]
//! version = "di-eval/1"
//! cgt_trust = 0.70
//!
//! [shim]
//! socket_path = "/tmp/devine_intel.sock"
//! max_request_bytes = 1048576
//! read_timeout_ms = 5000
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::types::ThresholdSet;
use crate::{DEFAULT_MAX_REQUEST_BYTES, DEFAULT_READ_TIMEOUT_MS, DEFAULT_SOCKET_PATH};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub thresholds: ThresholdSet,
    pub shim: ShimConfig,
}

/// Local RPC shim settings, passed to the server constructor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShimConfig {
    /// Unix socket path; any stale file here is removed before binding
    pub socket_path: PathBuf,
    /// Requests larger than this get a failure envelope
    pub max_request_bytes: usize,
    /// Per-connection read timeout
    pub read_timeout_ms: u64,
}

impl Default for ShimConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }
}

impl ShimConfig {
    /// Defaults with a different socket path
    pub fn at(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            ..Default::default()
        }
    }
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })?;
        config.thresholds.validate()?;
        Ok(config)
    }

    /// Load from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Load when a path is given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

//! Error types
//!
//! The promotion engine and world weighting are total and have no error
//! type. Errors only arise at the edges: config loading, the socket
//! shim and the scenario runner.

use thiserror::Error;

/// Config file loading and validation
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("threshold {name} must be a finite value in [0,1], got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
}

/// Local RPC shim (server and client)
#[derive(Debug, Error)]
pub enum ShimError {
    /// Startup failure; fatal to the server process
    #[error("failed to bind {path}: {source}")]
    Bind {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed envelope: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request read timed out after {0} ms")]
    Timeout(u64),

    #[error("request exceeds {0} bytes")]
    TooLarge(usize),

    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Pathflow scenario runner
#[derive(Debug, Error)]
pub enum PathflowError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scenario file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

//! Error types for configuration loading using `thiserror`.
//!
//! The running simulation itself never fails; only setup does.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for `SimConfig`
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but is out of range
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

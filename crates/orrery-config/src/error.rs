//! Configuration error types.

use std::path::PathBuf;

/// Errors that can occur when loading, saving, or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read `config.ron`.
    #[error("failed to read config {path}: {source}")]
    ReadError {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create the config directory or write `config.ron`.
    #[error("failed to write config {path}: {source}")]
    WriteError {
        /// File or directory that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid RON for [`Config`](crate::Config).
    #[error("failed to parse config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// Failed to serialize the config to RON.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),

    /// A setting parsed but holds an unusable value.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Dotted path of the setting, e.g. `transfer.speed`.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// No platform config directory could be determined.
    #[error("no config directory available on this platform")]
    NoConfigDir,
}

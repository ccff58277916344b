//! Error handling for station output collection.
//!
//! Fatal errors only: anything that stops the whole batch before or outside
//! the per-station loop. Per-station problems are recorded as
//! [`crate::models::StationOutcome`] values instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Station table not found at path: {path}")]
    TableNotFound { path: PathBuf },

    #[error("Failed to parse station table {path}: {reason}")]
    TableParse { path: PathBuf, reason: String },

    #[error("Station table {path} has no column '{column}' (found: {available})")]
    MissingColumn {
        path: PathBuf,
        column: String,
        available: String,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid config file {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Cannot prepare output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Processing interrupted: {reason}")]
    Interrupted { reason: String },
}

impl CollectorError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn interrupted(reason: impl Into<String>) -> Self {
        Self::Interrupted {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CollectorError>;

//! Station NetCDF Collector Library
//!
//! Gathers the latest model output file of every station into one folder.
//!
//! For each station listed in a CSV table this library:
//! - Resolves the station's model output folder under a common root
//! - Picks the most recently modified run folder
//! - Copies one NetCDF file from that run into a shared output directory
//! - Records a per-station outcome and aggregates a run summary

pub mod cli;
pub mod config;
pub mod constants;
pub mod copier;
pub mod discovery;
pub mod error;
pub mod models;
pub mod processor;
pub mod stations;

// Re-export commonly used types
pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use models::{CollectionStats, NcSelection, SkipReason, StationOutcome, StationRecord};
pub use processor::StationCollector;

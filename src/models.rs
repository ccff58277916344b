//! Core data structures for station output collection.
//!
//! Defines station records read from the table, the per-station outcome
//! of a collection pass, and the aggregated statistics reported at the end.

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;

/// One row of the station table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationRecord {
    /// Zero-based data row index in file order
    pub row: usize,
    /// Station code, used verbatim as a path segment
    pub name: String,
}

impl StationRecord {
    pub fn new(row: usize, name: impl Into<String>) -> Self {
        Self {
            row,
            name: name.into(),
        }
    }

    /// True when the name is a single normal path component
    pub fn is_valid_path_segment(&self) -> bool {
        let name = self.name.as_str();
        !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains('/')
            && !name.contains('\\')
    }
}

/// The most recently modified run folder of a station
#[derive(Debug, Clone)]
pub struct LatestFolder {
    pub path: PathBuf,
    pub name: String,
    pub modified: SystemTime,
}

/// How one NetCDF file is chosen when a run folder holds several
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NcSelection {
    /// Lexicographically smallest file name
    #[default]
    Alphabetical,
    /// Most recently modified file, ties broken by smallest name
    Newest,
}

impl fmt::Display for NcSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NcSelection::Alphabetical => write!(f, "alphabetical"),
            NcSelection::Newest => write!(f, "newest"),
        }
    }
}

/// Why a station produced no copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingOutputFolder { path: PathBuf },
    NoRunFolders { path: PathBuf },
    NoNetcdfFile { folder: PathBuf },
    InvalidStationName,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingOutputFolder { path } => {
                write!(f, "model output folder does not exist: {}", path.display())
            }
            SkipReason::NoRunFolders { path } => {
                write!(f, "no run folders in {}", path.display())
            }
            SkipReason::NoNetcdfFile { folder } => {
                write!(f, "no NetCDF files found in {}", folder.display())
            }
            SkipReason::InvalidStationName => write!(f, "station name is not a valid folder name"),
        }
    }
}

/// Result of processing a single station
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationOutcome {
    Copied {
        source: PathBuf,
        destination: PathBuf,
        bytes: u64,
    },
    WouldCopy {
        source: PathBuf,
        destination: PathBuf,
    },
    Skipped(SkipReason),
    Failed {
        reason: String,
    },
}

impl StationOutcome {
    pub fn is_skip(&self) -> bool {
        matches!(self, StationOutcome::Skipped(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, StationOutcome::Failed { .. })
    }
}

/// Outcome paired with the station it belongs to
#[derive(Debug, Clone)]
pub struct StationReport {
    pub station: StationRecord,
    pub outcome: StationOutcome,
}

/// Collection statistics
#[derive(Debug, Default)]
pub struct CollectionStats {
    pub stations_processed: usize,
    pub files_copied: usize,
    pub files_would_copy: usize,
    pub stations_skipped: usize,
    pub stations_failed: usize,
    pub bytes_copied: u64,
    pub output_dir: PathBuf,
    pub processing_time_ms: u128,
    pub reports: Vec<StationReport>,
}

impl CollectionStats {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            ..Default::default()
        }
    }

    /// Count an outcome and keep it for the final report
    pub fn record(&mut self, station: StationRecord, outcome: StationOutcome) {
        self.stations_processed += 1;
        match &outcome {
            StationOutcome::Copied { bytes, .. } => {
                self.files_copied += 1;
                self.bytes_copied += bytes;
            }
            StationOutcome::WouldCopy { .. } => self.files_would_copy += 1,
            StationOutcome::Skipped(_) => self.stations_skipped += 1,
            StationOutcome::Failed { .. } => self.stations_failed += 1,
        }
        self.reports.push(StationReport { station, outcome });
    }

    pub fn has_failures(&self) -> bool {
        self.stations_failed > 0
    }

    /// Outcome recorded for the first station with this name
    pub fn outcome_for(&self, station: &str) -> Option<&StationOutcome> {
        self.reports
            .iter()
            .find(|report| report.station.name == station)
            .map(|report| &report.outcome)
    }
}

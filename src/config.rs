//! Configuration management and validation.
//!
//! The collector needs three paths (model root, station table, output
//! directory) plus a few optional knobs. Values are layered: built-in
//! defaults, then an optional TOML file, then command-line overrides.

use crate::constants::{APP_NAME, CONFIG_FILE_NAME, DEFAULT_OUTPUT_SUBDIR, DEFAULT_STATION_COLUMN};
use crate::error::{CollectorError, Result};
use crate::models::NcSelection;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings as they appear in a config file; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub model_root: Option<PathBuf>,
    pub station_table: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub station_column: Option<String>,
    pub output_subdir: Option<String>,
    pub nc_selection: Option<NcSelection>,
    pub dry_run: Option<bool>,
}

impl ConfigFile {
    /// Read and parse a TOML config file
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let parsed = toml::from_str(&data).map_err(|source| CollectorError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config file {}", path.display());
        Ok(parsed)
    }

    /// Overlay `other` on top of `self`; set fields in `other` win
    pub fn merge(self, other: ConfigFile) -> Self {
        Self {
            model_root: other.model_root.or(self.model_root),
            station_table: other.station_table.or(self.station_table),
            output_dir: other.output_dir.or(self.output_dir),
            station_column: other.station_column.or(self.station_column),
            output_subdir: other.output_subdir.or(self.output_subdir),
            nc_selection: other.nc_selection.or(self.nc_selection),
            dry_run: other.dry_run.or(self.dry_run),
        }
    }
}

/// Resolved configuration for one collection run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorConfig {
    /// Root folder holding one subfolder per station
    pub model_root: PathBuf,

    /// CSV table listing the stations to collect
    pub station_table: PathBuf,

    /// Shared destination folder for the copied files
    pub output_dir: PathBuf,

    /// Header of the station column
    pub station_column: String,

    /// Folder under each station holding the model runs
    pub output_subdir: String,

    /// Rule for picking one file when a run folder has several
    pub nc_selection: NcSelection,

    /// Report what would be copied without writing anything
    pub dry_run: bool,
}

impl CollectorConfig {
    /// Create a configuration with defaults for the optional settings
    pub fn new(model_root: PathBuf, station_table: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            model_root,
            station_table,
            output_dir,
            station_column: DEFAULT_STATION_COLUMN.to_string(),
            output_subdir: DEFAULT_OUTPUT_SUBDIR.to_string(),
            nc_selection: NcSelection::default(),
            dry_run: false,
        }
    }

    /// Build a configuration from merged layers, requiring the three paths
    pub fn from_layers(layers: ConfigFile) -> Result<Self> {
        let model_root = layers
            .model_root
            .ok_or_else(|| CollectorError::configuration("model_root is not set"))?;
        let station_table = layers
            .station_table
            .ok_or_else(|| CollectorError::configuration("station_table is not set"))?;
        let output_dir = layers
            .output_dir
            .ok_or_else(|| CollectorError::configuration("output_dir is not set"))?;

        let mut config = Self::new(model_root, station_table, output_dir);
        if let Some(column) = layers.station_column {
            config.station_column = column;
        }
        if let Some(subdir) = layers.output_subdir {
            config.output_subdir = subdir;
        }
        if let Some(selection) = layers.nc_selection {
            config.nc_selection = selection;
        }
        if let Some(dry_run) = layers.dry_run {
            config.dry_run = dry_run;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_station_column(mut self, column: impl Into<String>) -> Self {
        self.station_column = column.into();
        self
    }

    pub fn with_output_subdir(mut self, subdir: impl Into<String>) -> Self {
        self.output_subdir = subdir.into();
        self
    }

    pub fn with_nc_selection(mut self, selection: NcSelection) -> Self {
        self.nc_selection = selection;
        self
    }

    pub fn with_dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Check values that would make every station fail the same way
    pub fn validate(&self) -> Result<()> {
        if self.station_column.trim().is_empty() {
            return Err(CollectorError::configuration(
                "station_column must not be empty",
            ));
        }
        if self.output_subdir.is_empty()
            || self.output_subdir == "."
            || self.output_subdir == ".."
            || self.output_subdir.contains('/')
            || self.output_subdir.contains('\\')
        {
            return Err(CollectorError::configuration(format!(
                "output_subdir must be a single folder name, got '{}'",
                self.output_subdir
            )));
        }
        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(CollectorError::configuration(format!(
                "output_dir exists but is not a directory: {}",
                self.output_dir.display()
            )));
        }
        Ok(())
    }

    /// `{model_root}/{station}/{output_subdir}`
    pub fn station_output_dir(&self, station: &str) -> PathBuf {
        self.model_root.join(station).join(&self.output_subdir)
    }

    /// Default config file location under the user config directory
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE_NAME))
    }
}

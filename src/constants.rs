//! Fixed names and defaults shared across the collector.

/// Application name used for the config directory and log filter
pub const APP_NAME: &str = "station-nc-collector";

/// Crate name as it appears in tracing targets
pub const LOG_TARGET: &str = "station_nc_collector";

/// Config file name looked up under the user config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Header of the station column in the station table
pub const DEFAULT_STATION_COLUMN: &str = "Station_Name";

/// Folder under each station directory that holds the model runs
pub const DEFAULT_OUTPUT_SUBDIR: &str = "output";

/// Suffix identifying NetCDF files (case-sensitive)
pub const NETCDF_SUFFIX: &str = ".nc";

/// Timestamp format used when logging folder modification times
pub const MTIME_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

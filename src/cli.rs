//! Command-line interface components.

use crate::config::{CollectorConfig, ConfigFile};
use crate::constants::LOG_TARGET;
use crate::models::{CollectionStats, NcSelection};
use crate::processor::{StationCollector, print_summary};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug, Default)]
#[command(name = "station-nc-collector")]
#[command(about = "Copy the latest NetCDF model output of each station into one directory")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Root folder containing one model output folder per station
    #[arg(short, long, value_name = "DIR")]
    pub model_root: Option<PathBuf>,

    /// CSV table with an index column and a station column
    #[arg(short = 't', long, value_name = "FILE")]
    pub station_table: Option<PathBuf>,

    /// Directory receiving the copied NetCDF files
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// TOML config file (defaults to the user config directory if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Header of the station column in the table
    #[arg(long, value_name = "NAME")]
    pub station_column: Option<String>,

    /// Folder under each station holding the model runs
    #[arg(long, value_name = "NAME")]
    pub output_subdir: Option<String>,

    /// How to choose between several NetCDF files in one run folder
    #[arg(long, value_enum)]
    pub nc_selection: Option<NcSelection>,

    /// Report what would be copied without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors and hide the progress bar
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Log level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Settings given on the command line, as the top config layer
    pub fn as_config_layer(&self) -> ConfigFile {
        ConfigFile {
            model_root: self.model_root.clone(),
            station_table: self.station_table.clone(),
            output_dir: self.output_dir.clone(),
            station_column: self.station_column.clone(),
            output_subdir: self.output_subdir.clone(),
            nc_selection: self.nc_selection,
            dry_run: self.dry_run.then_some(true),
        }
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Load configuration using layered approach (defaults -> file -> args)
pub fn load_configuration(args: &Args) -> Result<CollectorConfig> {
    let config_file = match &args.config {
        Some(path) => Some(path.clone()),
        None => CollectorConfig::default_config_path().filter(|path| path.exists()),
    };

    let file_layer = match &config_file {
        Some(path) => {
            info!("Using config file: {}", path.display());
            ConfigFile::from_path(path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?
        }
        None => {
            debug!("No config file found, using command-line settings only");
            ConfigFile::default()
        }
    };

    let config = CollectorConfig::from_layers(file_layer.merge(args.as_config_layer()))
        .context("Incomplete configuration (set paths in a config file or via flags)")?;

    debug!("Resolved configuration: {:?}", config);
    Ok(config)
}

/// Run a full collection for the parsed arguments
pub async fn run(args: Args) -> Result<CollectionStats> {
    setup_logging(&args);

    let config = load_configuration(&args)?;
    let dry_run = config.dry_run;

    info!(
        "Collecting latest NetCDF outputs from {} into {}",
        config.model_root.display(),
        config.output_dir.display()
    );

    let collector = StationCollector::new(config).with_progress(!args.quiet);
    let stats = collector.run().await.with_context(|| {
        format!(
            "Collection aborted (station table: {})",
            collector.config().station_table.display()
        )
    })?;

    if !args.quiet {
        print_summary(&stats, dry_run);
    }

    Ok(stats)
}

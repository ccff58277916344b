//! Collection engine.
//!
//! Walks the station list in table order and, for each station, resolves
//! the latest run folder, selects one NetCDF file and copies it into the
//! shared output directory. Every per-station problem becomes a recorded
//! outcome; only setup problems abort the run.

use crate::config::CollectorConfig;
use crate::copier::{copy_into, destination_for, find_netcdf_files, select_netcdf};
use crate::discovery::{Resolution, resolve_latest_folder};
use crate::error::{CollectorError, Result};
use crate::models::{CollectionStats, SkipReason, StationOutcome, StationRecord};
use crate::stations::load_station_table;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use tokio::fs;
use tracing::{debug, error, info, warn};

/// Main processor for station output collection
pub struct StationCollector {
    config: CollectorConfig,
    show_progress: bool,
}

impl StationCollector {
    /// Create a new collector
    pub fn new(config: CollectorConfig) -> Self {
        Self {
            config,
            show_progress: false,
        }
    }

    /// Display a progress bar while collecting
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Load the station table and collect every station in it
    pub async fn run(&self) -> Result<CollectionStats> {
        let stations = load_station_table(&self.config.station_table, &self.config.station_column)?;
        self.collect(&stations).await
    }

    /// Collect the given stations sequentially
    pub async fn collect(&self, stations: &[StationRecord]) -> Result<CollectionStats> {
        let start_time = Instant::now();
        let mut stats = CollectionStats::new(self.config.output_dir.clone());

        self.prepare_output_dir().await?;

        let progress_bar = self.create_progress_bar(stations.len());

        for station in stations {
            if let Some(pb) = &progress_bar {
                pb.set_message(station.name.clone());
            }

            let outcome = self.collect_station(station).await;
            log_outcome(station, &outcome);
            stats.record(station.clone(), outcome);

            if let Some(pb) = &progress_bar {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress_bar {
            pb.finish_and_clear();
        }

        stats.processing_time_ms = start_time.elapsed().as_millis();
        info!(
            "Collection finished: {} copied, {} skipped, {} failed in {}ms",
            stats.files_copied + stats.files_would_copy,
            stats.stations_skipped,
            stats.stations_failed,
            stats.processing_time_ms
        );

        Ok(stats)
    }

    /// Process a single station: resolve, select, copy
    pub async fn collect_station(&self, station: &StationRecord) -> StationOutcome {
        debug!("Processing station: {}", station.name);

        if !station.is_valid_path_segment() {
            return StationOutcome::Skipped(SkipReason::InvalidStationName);
        }

        let output_dir = self.config.station_output_dir(&station.name);

        let latest = match resolve_latest_folder(&output_dir).await {
            Ok(Resolution::Latest(folder)) => folder,
            Ok(Resolution::NotFound) => {
                return StationOutcome::Skipped(SkipReason::MissingOutputFolder { path: output_dir });
            }
            Ok(Resolution::Empty) => {
                return StationOutcome::Skipped(SkipReason::NoRunFolders { path: output_dir });
            }
            Err(e) => {
                return StationOutcome::Failed {
                    reason: format!("cannot list {}: {}", output_dir.display(), e),
                };
            }
        };

        let candidates = match find_netcdf_files(&latest.path).await {
            Ok(candidates) => candidates,
            Err(e) => {
                return StationOutcome::Failed {
                    reason: format!("cannot list {}: {}", latest.path.display(), e),
                };
            }
        };

        let Some(source) = select_netcdf(&candidates, self.config.nc_selection) else {
            return StationOutcome::Skipped(SkipReason::NoNetcdfFile {
                folder: latest.path,
            });
        };

        if candidates.len() > 1 {
            debug!(
                "{} NetCDF files in {}, selected {} ({})",
                candidates.len(),
                latest.path.display(),
                source.display_name(),
                self.config.nc_selection
            );
        }

        if self.config.dry_run {
            return StationOutcome::WouldCopy {
                source: source.path.clone(),
                destination: destination_for(source, &self.config.output_dir),
            };
        }

        match copy_into(source, &self.config.output_dir).await {
            Ok((destination, bytes)) => StationOutcome::Copied {
                source: source.path.clone(),
                destination,
                bytes,
            },
            Err(e) => StationOutcome::Failed {
                reason: format!("cannot copy {}: {}", source.path.display(), e),
            },
        }
    }

    /// Make sure the destination exists before any copy
    async fn prepare_output_dir(&self) -> Result<()> {
        let output_dir = &self.config.output_dir;
        if self.config.dry_run {
            if !output_dir.is_dir() {
                warn!(
                    "Output directory {} does not exist (dry run, not creating it)",
                    output_dir.display()
                );
            }
            return Ok(());
        }

        fs::create_dir_all(output_dir)
            .await
            .map_err(|source| CollectorError::OutputDir {
                path: output_dir.clone(),
                source,
            })
    }

    fn create_progress_bar(&self, total: usize) -> Option<ProgressBar> {
        if !self.show_progress || total == 0 {
            return None;
        }

        let pb = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        Some(pb)
    }
}

fn log_outcome(station: &StationRecord, outcome: &StationOutcome) {
    match outcome {
        StationOutcome::Copied {
            destination, bytes, ..
        } => info!(
            "Station {}: copied {} ({} bytes)",
            station.name,
            destination.display(),
            bytes
        ),
        StationOutcome::WouldCopy {
            source,
            destination,
        } => info!(
            "Station {}: would copy {} -> {}",
            station.name,
            source.display(),
            destination.display()
        ),
        StationOutcome::Skipped(reason) => {
            warn!("Skipping station {}: {}", station.name, reason)
        }
        StationOutcome::Failed { reason } => error!("Station {} failed: {}", station.name, reason),
    }
}

/// Print the per-station report and totals
pub fn print_summary(stats: &CollectionStats, dry_run: bool) {
    println!("\n{}", "Collection summary".bright_green().bold());

    for report in &stats.reports {
        let name = report.station.name.bright_cyan();
        match &report.outcome {
            StationOutcome::Copied { destination, .. } => {
                println!("  {} {} -> {}", "copied ".green(), name, destination.display());
            }
            StationOutcome::WouldCopy { source, .. } => {
                println!("  {} {} <- {}", "dry-run".yellow(), name, source.display());
            }
            StationOutcome::Skipped(reason) => {
                println!("  {} {} ({})", "skipped".yellow(), name, reason);
            }
            StationOutcome::Failed { reason } => {
                println!("  {} {} ({})", "failed ".red(), name, reason);
            }
        }
    }

    println!();
    println!(
        "  {} {}",
        "Stations:".bright_cyan(),
        stats.stations_processed.to_string().bright_white().bold()
    );
    if dry_run {
        println!(
            "  {} {}",
            "Would copy:".bright_cyan(),
            stats.files_would_copy.to_string().bright_white().bold()
        );
    } else {
        println!(
            "  {} {} ({})",
            "Copied:".bright_cyan(),
            stats.files_copied.to_string().bright_white().bold(),
            format_bytes(stats.bytes_copied)
        );
    }
    println!(
        "  {} {}",
        "Skipped:".bright_cyan(),
        stats.stations_skipped.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Failed:".bright_cyan(),
        if stats.stations_failed > 0 {
            stats.stations_failed.to_string().bright_red().bold()
        } else {
            stats.stations_failed.to_string().bright_white().bold()
        }
    );
    println!(
        "  {} {}",
        "Output:".bright_cyan(),
        stats.output_dir.display()
    );
    println!(
        "  {} {:.2}s",
        "Time:".bright_cyan(),
        stats.processing_time_ms as f64 / 1000.0
    );
}

/// Format a byte count for display
fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

#[cfg(test)]
mod tests;

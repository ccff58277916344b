//! Pipeline tests for the station collector
//!
//! Build small model output trees on disk and run the collector over them.


use crate::config::CollectorConfig;
use crate::discovery::test_support::set_mtime;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary model root, station table and output directory
pub struct TestLayout {
    pub temp_dir: TempDir,
    pub model_root: PathBuf,
    pub table_path: PathBuf,
    pub output_dir: PathBuf,
}

impl TestLayout {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let model_root = temp_dir.path().join("ICOS_sites");
        let table_path = temp_dir.path().join("stations_readyformodelrun.csv");
        let output_dir = temp_dir.path().join("output_pystemmus");
        fs::create_dir_all(&model_root).unwrap();

        Self {
            temp_dir,
            model_root,
            table_path,
            output_dir,
        }
    }

    pub fn config(&self) -> CollectorConfig {
        CollectorConfig::new(
            self.model_root.clone(),
            self.table_path.clone(),
            self.output_dir.clone(),
        )
    }

    /// Write a station table with a leading index column
    pub fn write_table(&self, stations: &[&str]) {
        let mut content = String::from(",Station_Name\n");
        for (i, station) in stations.iter().enumerate() {
            content.push_str(&format!("{},{}\n", i, station));
        }
        fs::write(&self.table_path, content).unwrap();
    }

    /// `model_root/{station}/output`
    pub fn station_output(&self, station: &str) -> PathBuf {
        self.model_root.join(station).join("output")
    }

    /// Create a run folder holding `files` (name, content) with the given mtime offset
    pub fn add_run(&self, station: &str, run: &str, mtime_offset: u64, files: &[(&str, &str)]) -> PathBuf {
        let run_path = self.station_output(station).join(run);
        fs::create_dir_all(&run_path).unwrap();
        for (name, content) in files {
            fs::write(run_path.join(name), content).unwrap();
        }
        set_mtime(&run_path, mtime_offset);
        run_path
    }
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

//! Station table loading.
//!
//! Reads the CSV table listing stations to collect. The first column is a
//! row index written by the upstream preprocessing step and is ignored; only
//! the station column is used. Every cell is read as a string so station
//! codes are never type-inferred.

use crate::error::{CollectorError, Result};
use crate::models::StationRecord;
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Load station records from `path`, keeping file order
pub fn load_station_table(path: &Path, station_column: &str) -> Result<Vec<StationRecord>> {
    if !path.exists() {
        return Err(CollectorError::TableNotFound {
            path: path.to_path_buf(),
        });
    }

    debug!("Reading station table: {}", path.display());

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| CollectorError::TableParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let column = df
        .column(station_column)
        .map_err(|_| CollectorError::MissingColumn {
            path: path.to_path_buf(),
            column: station_column.to_string(),
            available: df
                .get_column_names()
                .iter()
                .map(|name| name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })?;

    let names = column.as_materialized_series().str()?;
    let mut stations = Vec::with_capacity(names.len());

    for (row, value) in names.into_iter().enumerate() {
        // Kept verbatim; only blank cells are rejected
        let name = value.unwrap_or_default();
        if name.trim().is_empty() {
            return Err(CollectorError::TableParse {
                path: path.to_path_buf(),
                reason: format!("empty station name in data row {}", row + 1),
            });
        }
        stations.push(StationRecord::new(row, name));
    }

    info!(
        "Loaded {} stations from {}",
        stations.len(),
        path.display()
    );

    Ok(stations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_table(temp_dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = temp_dir.path().join("stations.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_table(
            &temp_dir,
            ",Station_Name,latitude\n0,SE-Deg,64.18\n1,DE-Hai,51.08\n2,FR-Pue,43.74\n",
        );

        let stations = load_station_table(&path, "Station_Name").unwrap();
        let names: Vec<&str> = stations.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["SE-Deg", "DE-Hai", "FR-Pue"]);
        assert_eq!(stations[2].row, 2);
    }

    #[test]
    fn test_duplicates_kept() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_table(&temp_dir, ",Station_Name\n0,SE-Deg\n1,SE-Deg\n");

        let stations = load_station_table(&path, "Station_Name").unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].name, stations[1].name);
    }

    #[test]
    fn test_numeric_codes_stay_strings() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_table(&temp_dir, "idx,Station_Name\n0,01330\n1,00042\n");

        let stations = load_station_table(&path, "Station_Name").unwrap();
        assert_eq!(stations[0].name, "01330");
        assert_eq!(stations[1].name, "00042");
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.csv");

        match load_station_table(&path, "Station_Name") {
            Err(CollectorError::TableNotFound { path: reported }) => assert_eq!(reported, path),
            other => panic!("Expected TableNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_column() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_table(&temp_dir, ",Site\n0,SE-Deg\n");

        match load_station_table(&path, "Station_Name") {
            Err(CollectorError::MissingColumn {
                column, available, ..
            }) => {
                assert_eq!(column, "Station_Name");
                assert!(available.contains("Site"));
            }
            other => panic!("Expected MissingColumn error, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_delimiter() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_table(&temp_dir, "idx;Station_Name\n0;SE-Deg\n");

        let result = load_station_table(&path, "Station_Name");
        assert!(matches!(result, Err(CollectorError::MissingColumn { .. })));
    }

    #[test]
    fn test_empty_station_name() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_table(&temp_dir, ",Station_Name\n0,SE-Deg\n1,\n");

        match load_station_table(&path, "Station_Name") {
            Err(CollectorError::TableParse { reason, .. }) => {
                assert!(reason.contains("row 2"));
            }
            other => panic!("Expected TableParse error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_table(&temp_dir, "");

        assert!(load_station_table(&path, "Station_Name").is_err());
    }

    #[test]
    fn test_custom_column() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_table(&temp_dir, ",Code\n0,SE-Deg\n");

        let stations = load_station_table(&path, "Code").unwrap();
        assert_eq!(stations.len(), 1);
    }

    #[test]
    fn test_names_kept_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_table(&temp_dir, ",Station_Name\n0, SE-Deg\n1,DE-Hai \n");

        let stations = load_station_table(&path, "Station_Name").unwrap();
        assert_eq!(stations[0].name, " SE-Deg");
        assert_eq!(stations[1].name, "DE-Hai ");
    }

    #[test]
    fn test_blank_station_name() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_table(&temp_dir, ",Station_Name\n0,   \n");

        assert!(matches!(
            load_station_table(&path, "Station_Name"),
            Err(CollectorError::TableParse { .. })
        ));
    }
}

//! Latest run folder resolution
//!
//! Each station keeps its model runs as subfolders of an output directory:
//! ```text
//! model_root/
//!   SE-Deg/
//!     output/
//!       run_2024-04-30/
//!         result.nc
//!       run_2024-05-03/
//!         result.nc
//! ```
//! The latest run is the subfolder with the greatest modification time.

use crate::constants::MTIME_DISPLAY_FORMAT;
use crate::models::LatestFolder;
use chrono::{DateTime, Local};
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{debug, trace};

/// Outcome of looking for a station's latest run folder
#[derive(Debug)]
pub enum Resolution {
    /// The station output directory does not exist
    NotFound,
    /// The output directory exists but holds no subfolders
    Empty,
    Latest(LatestFolder),
}

/// Find the most recently modified immediate subfolder of `output_dir`
///
/// Equal modification times are broken by folder name: the greatest name
/// wins, so run folders named by date or counter resolve predictably.
pub async fn resolve_latest_folder(output_dir: &Path) -> io::Result<Resolution> {
    match fs::metadata(output_dir).await {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => return Ok(Resolution::NotFound),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Resolution::NotFound),
        Err(e) => return Err(e),
    }

    let mut latest: Option<LatestFolder> = None;
    let mut dir = fs::read_dir(output_dir).await?;

    while let Some(entry) = dir.next_entry().await? {
        let path = entry.path();

        // Follows symlinks: a run folder linked into scratch storage still counts
        let metadata = match fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                trace!("Ignoring dangling link: {}", path.display());
                continue;
            }
            Err(e) => return Err(e),
        };
        if !metadata.is_dir() {
            continue;
        }

        let modified = metadata.modified()?;
        let candidate = LatestFolder {
            path,
            name: entry.file_name().to_string_lossy().into_owned(),
            modified,
        };

        let newer = match &latest {
            None => true,
            Some(current) => {
                (candidate.modified, &candidate.name) > (current.modified, &current.name)
            }
        };
        if newer {
            latest = Some(candidate);
        }
    }

    Ok(match latest {
        Some(folder) => {
            debug!(
                "Latest run folder in {}: {} (modified {})",
                output_dir.display(),
                folder.name,
                format_mtime(&folder)
            );
            Resolution::Latest(folder)
        }
        None => Resolution::Empty,
    })
}

fn format_mtime(folder: &LatestFolder) -> String {
    DateTime::<Local>::from(folder.modified)
        .format(MTIME_DISPLAY_FORMAT)
        .to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs::File;
    use std::path::Path;
    use std::time::{Duration, SystemTime};

    /// Set a folder's modification time to `offset_secs` after a fixed epoch
    pub fn set_mtime(path: &Path, offset_secs: u64) {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + offset_secs);
        File::open(path).unwrap().set_modified(time).unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::set_mtime;
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn expect_latest(resolution: Resolution) -> LatestFolder {
        match resolution {
            Resolution::Latest(folder) => folder,
            other => panic!("Expected Latest, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_picks_newest_folder() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("output");
        fs::create_dir_all(output.join("run1")).unwrap();
        fs::create_dir_all(output.join("run2")).unwrap();
        fs::create_dir_all(output.join("run0")).unwrap();
        set_mtime(&output.join("run1"), 100);
        set_mtime(&output.join("run2"), 300);
        set_mtime(&output.join("run0"), 200);

        let folder = expect_latest(resolve_latest_folder(&output).await.unwrap());
        assert_eq!(folder.name, "run2");
        assert_eq!(folder.path, output.join("run2"));
    }

    #[tokio::test]
    async fn test_ignores_files() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("output");
        fs::create_dir_all(output.join("run1")).unwrap();
        set_mtime(&output.join("run1"), 0);
        fs::write(output.join("late.nc"), "newer file, not a folder").unwrap();

        let folder = expect_latest(resolve_latest_folder(&output).await.unwrap());
        assert_eq!(folder.name, "run1");
    }

    #[tokio::test]
    async fn test_tie_broken_by_name() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("output");
        for name in ["b_run", "c_run", "a_run"] {
            fs::create_dir_all(output.join(name)).unwrap();
            set_mtime(&output.join(name), 50);
        }

        let folder = expect_latest(resolve_latest_folder(&output).await.unwrap());
        assert_eq!(folder.name, "c_run");
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("XX-Missing").join("output");

        let resolution = resolve_latest_folder(&output).await.unwrap();
        assert!(matches!(resolution, Resolution::NotFound));
    }

    #[tokio::test]
    async fn test_output_path_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("output");
        fs::write(&output, "not a folder").unwrap();

        let resolution = resolve_latest_folder(&output).await.unwrap();
        assert!(matches!(resolution, Resolution::NotFound));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_follows_symlinked_run_folder() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("output");
        let scratch = temp_dir.path().join("scratch_run");
        fs::create_dir_all(output.join("run1")).unwrap();
        fs::create_dir_all(&scratch).unwrap();
        std::os::unix::fs::symlink(&scratch, output.join("run2")).unwrap();
        set_mtime(&output.join("run1"), 100);
        // Sets the target's time, which is what the link is ranked by
        set_mtime(&output.join("run2"), 200);

        let folder = expect_latest(resolve_latest_folder(&output).await.unwrap());
        assert_eq!(folder.name, "run2");
        assert_eq!(folder.path, output.join("run2"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_ignores_dangling_link() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("output");
        fs::create_dir_all(output.join("run1")).unwrap();
        std::os::unix::fs::symlink(temp_dir.path().join("gone"), output.join("run9")).unwrap();

        let folder = expect_latest(resolve_latest_folder(&output).await.unwrap());
        assert_eq!(folder.name, "run1");
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("YY-Empty").join("output");
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("notes.txt"), "no runs yet").unwrap();

        let resolution = resolve_latest_folder(&output).await.unwrap();
        assert!(matches!(resolution, Resolution::Empty));
    }
}

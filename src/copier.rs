//! NetCDF file selection and copying.

use crate::constants::NETCDF_SUFFIX;
use crate::models::NcSelection;
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tracing::{debug, trace};

/// A NetCDF file found in a run folder
#[derive(Debug, Clone)]
pub struct NetcdfCandidate {
    pub path: PathBuf,
    /// Name as stored on disk, reused unchanged for the destination
    pub file_name: OsString,
    pub modified: SystemTime,
}

impl NetcdfCandidate {
    /// File name for logs and reports
    pub fn display_name(&self) -> Cow<'_, str> {
        self.file_name.to_string_lossy()
    }
}

/// List `*.nc` files directly inside `folder`, sorted by file name
///
/// Symlinks are followed: a linked file is ranked by its target's time and
/// a link to a directory is ignored like the directory itself.
pub async fn find_netcdf_files(folder: &Path) -> io::Result<Vec<NetcdfCandidate>> {
    let mut candidates = Vec::new();
    let mut dir = fs::read_dir(folder).await?;

    while let Some(entry) = dir.next_entry().await? {
        let file_name = entry.file_name();
        if !is_netcdf_name(&file_name) {
            continue;
        }
        let path = entry.path();
        let metadata = match fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                trace!("Ignoring dangling link: {}", path.display());
                continue;
            }
            Err(e) => return Err(e),
        };
        if metadata.is_dir() {
            trace!("Ignoring directory with NetCDF suffix: {}", path.display());
            continue;
        }
        candidates.push(NetcdfCandidate {
            path,
            file_name,
            modified: metadata.modified()?,
        });
    }

    candidates.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    debug!(
        "Found {} NetCDF files in {}",
        candidates.len(),
        folder.display()
    );
    Ok(candidates)
}

/// Pick one file from name-sorted candidates
pub fn select_netcdf(
    candidates: &[NetcdfCandidate],
    selection: NcSelection,
) -> Option<&NetcdfCandidate> {
    match selection {
        NcSelection::Alphabetical => candidates.first(),
        // max_by_key keeps the last maximum; reverse so the smallest name wins ties
        NcSelection::Newest => candidates.iter().rev().max_by_key(|c| c.modified),
    }
}

/// Destination path for `source` inside `destination_dir`
pub fn destination_for(source: &NetcdfCandidate, destination_dir: &Path) -> PathBuf {
    destination_dir.join(&source.file_name)
}

/// Copy `source` into `destination_dir`, overwriting a same-named file
pub async fn copy_into(source: &NetcdfCandidate, destination_dir: &Path) -> io::Result<(PathBuf, u64)> {
    let destination = destination_for(source, destination_dir);
    let bytes = fs::copy(&source.path, &destination).await?;
    debug!(
        "Copied {} -> {} ({} bytes)",
        source.path.display(),
        destination.display(),
        bytes
    );
    Ok((destination, bytes))
}

/// Check if a file name carries the NetCDF suffix
fn is_netcdf_name(name: &OsStr) -> bool {
    name.as_encoded_bytes().ends_with(NETCDF_SUFFIX.as_bytes())
}

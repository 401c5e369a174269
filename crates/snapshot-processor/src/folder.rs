//! Listing the snapshots of a simulation output folder.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, SnapshotError};
use crate::source::{SnapshotDecoder, SnapshotHandle, SnapshotHeader};

/// File extension of EPOCH snapshot files.
pub const SNAPSHOT_EXTENSION: &str = "sdf";

/// The `*.sdf` files directly inside one directory, sorted by file name.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotFolder {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl SnapshotFolder {
    /// List snapshot files in `dir`. Subdirectories are not searched.
    pub fn scan(dir: impl AsRef<Path>) -> Result<Self> {
        let root = dir.as_ref().to_path_buf();
        let mut files = Vec::new();

        for entry in walkdir::WalkDir::new(&root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| SnapshotError::Io(e.into()))?;

            let is_snapshot = entry
                .path()
                .extension()
                .map(|ext| ext == SNAPSHOT_EXTENSION)
                .unwrap_or(false);

            if entry.file_type().is_file() && is_snapshot {
                files.push(entry.into_path());
            }
        }

        debug!(root = %root.display(), count = files.len(), "Scanned snapshot folder");
        Ok(Self { root, files })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.files.get(index).map(|p| p.as_path())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|p| p.as_path())
    }

    /// Open every file and collect its header.
    ///
    /// Files the decoder cannot open are logged and skipped.
    pub fn headers<D: SnapshotDecoder>(&self, decoder: &D) -> Vec<(PathBuf, SnapshotHeader)> {
        let mut headers = Vec::with_capacity(self.files.len());

        for path in &self.files {
            match decoder.open(path) {
                Ok(handle) => {
                    let header = handle.header().clone();
                    debug!(
                        path = %path.display(),
                        job_id = ?header.job_id,
                        step = ?header.step,
                        "Read snapshot header"
                    );
                    headers.push((path.clone(), header));
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable snapshot");
                }
            }
        }

        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["0002.sdf", "0000.sdf", "deck.status", "0001.sdf", "input.deck"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("restart.sdf")).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("0003.sdf"), b"").unwrap();

        let folder = SnapshotFolder::scan(dir.path()).unwrap();
        let names: Vec<_> = folder
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["0000.sdf", "0001.sdf", "0002.sdf"]);
        assert_eq!(folder.root(), dir.path());
    }

    #[test]
    fn test_scan_empty_folder() {
        let dir = TempDir::new().unwrap();
        let folder = SnapshotFolder::scan(dir.path()).unwrap();
        assert!(folder.is_empty());
        assert_eq!(folder.get(0), None);
    }

    #[test]
    fn test_scan_missing_folder() {
        let dir = TempDir::new().unwrap();
        let err = SnapshotFolder::scan(dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, SnapshotError::Io(_)));
    }
}

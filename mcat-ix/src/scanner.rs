//! Music file scanner
//!
//! Recursive MP3 discovery under a root directory. Traversal order is
//! whatever the filesystem yields; no sorting is applied.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// File scanner errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Recursive file discovery filtered to one target extension
pub struct FileScanner {
    target_extension: String,
}

impl FileScanner {
    /// Scanner for MP3 files
    pub fn new() -> Self {
        Self {
            target_extension: "mp3".to_string(),
        }
    }

    /// Walk the tree under `root_path` and collect every regular file
    /// whose extension matches (case-insensitive).
    ///
    /// A missing or non-directory root is an error and aborts the run;
    /// an existing root with zero matching files is an empty result.
    /// Unreadable entries below the root are logged and skipped.
    pub fn scan(&self, root_path: &Path) -> Result<Vec<PathBuf>, ScanError> {
        if !root_path.exists() {
            return Err(ScanError::PathNotFound(root_path.to_path_buf()));
        }

        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory(root_path.to_path_buf()));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(root_path).follow_links(false) {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && self.matches_extension(entry.path()) {
                        files.push(entry.path().to_path_buf());
                    }
                }
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                    // Continue scanning, don't abort
                }
            }
        }

        tracing::debug!(
            "Scan of {} found {} candidate files",
            root_path.display(),
            files.len()
        );

        Ok(files)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase() == self.target_extension)
            .unwrap_or(false)
    }
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn scan_nonexistent_path_fails() {
        let scanner = FileScanner::new();
        let result = scanner.scan(Path::new("/nonexistent/path"));
        match result.unwrap_err() {
            ScanError::PathNotFound(_) => {}
            other => panic!("Expected PathNotFound, got {:?}", other),
        }
    }

    #[test]
    fn scan_file_as_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("song.mp3");
        fs::write(&file, b"data").unwrap();

        let scanner = FileScanner::new();
        match scanner.scan(&file).unwrap_err() {
            ScanError::NotADirectory(_) => {}
            other => panic!("Expected NotADirectory, got {:?}", other),
        }
    }

    #[test]
    fn scan_empty_directory_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let scanner = FileScanner::new();
        assert!(scanner.scan(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn scan_filters_to_mp3_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.mp3"), b"x").unwrap();
        fs::write(dir.path().join("two.MP3"), b"x").unwrap();
        fs::write(dir.path().join("cover.jpg"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::write(dir.path().join("no_extension"), b"x").unwrap();

        let nested = dir.path().join("album");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("three.mp3"), b"x").unwrap();

        let scanner = FileScanner::new();
        let files = scanner.scan(dir.path()).unwrap();
        assert_eq!(files.len(), 3);
    }
}

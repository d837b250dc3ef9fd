//! Cover art sideloading
//!
//! Writes embedded picture bytes to `<title>_<artist>.jpg` under the
//! thumbnail directory. Bytes are written verbatim as `.jpg` regardless
//! of the original encoding; nothing is sniffed or re-encoded.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Artwork writing errors
#[derive(Debug, Error)]
pub enum ArtworkError {
    /// The thumbnail directory could not be created; fatal to the run
    #[error("Failed to create thumbnail directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    /// One thumbnail file could not be written
    #[error("Failed to write thumbnail {0}: {1}")]
    Write(PathBuf, std::io::Error),
}

/// Writes cover images next to the catalog
pub struct ArtworkWriter {
    thumbnail_dir: PathBuf,
}

impl ArtworkWriter {
    pub fn new(thumbnail_dir: impl Into<PathBuf>) -> Self {
        Self {
            thumbnail_dir: thumbnail_dir.into(),
        }
    }

    pub fn thumbnail_dir(&self) -> &Path {
        &self.thumbnail_dir
    }

    /// Create the output directory (idempotent). Called once before the
    /// scan starts; failure aborts the whole run.
    pub fn init(&self) -> Result<(), ArtworkError> {
        fs::create_dir_all(&self.thumbnail_dir)
            .map_err(|e| ArtworkError::CreateDir(self.thumbnail_dir.clone(), e))
    }

    /// Write picture bytes for one song and return the path written.
    ///
    /// Two songs sharing title and artist compute the same filename and
    /// silently overwrite each other; there is no collision detection.
    pub fn write(&self, title: &str, artist: &str, data: &[u8]) -> Result<PathBuf, ArtworkError> {
        let name = format!("{}_{}.jpg", sanitize(title), sanitize(artist));
        let dest = self.thumbnail_dir.join(name);

        fs::write(&dest, data).map_err(|e| ArtworkError::Write(dest.clone(), e))?;

        Ok(dest)
    }
}

/// Replace whitespace, path separators, and NUL with underscores so the
/// generated name stays a single plain filename. Other characters pass
/// through untouched.
fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_whitespace() || c == '/' || c == '\\' || c == '\0' {
                '_'
            } else {
                c
            }
        })
        .collect()
}

//! Shared catalog models

use serde::{Deserialize, Serialize};

/// Substituted when a file has no readable title tag
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// Substituted when a file has no readable artist tag
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
/// Substituted when a file has no readable album tag
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// One catalog entry per scanned file.
///
/// This is the exact shape the JSON catalog file holds; `thumbnail_path`
/// serializes as `null` when the file carried no embedded cover image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
    /// Base name of the file
    pub filename: String,
    /// Path as yielded by the walk; the unique key for upsert
    pub full_path: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Set only when an embedded cover image was found and written
    pub thumbnail_path: Option<String>,
}

impl SongRecord {
    /// Record with all-default tag fields and no thumbnail, used when a
    /// file's tags cannot be read at all
    pub fn with_defaults(filename: String, full_path: String) -> Self {
        Self {
            filename,
            full_path,
            title: UNKNOWN_TITLE.to_string(),
            artist: UNKNOWN_ARTIST.to_string(),
            album: UNKNOWN_ALBUM.to_string(),
            thumbnail_path: None,
        }
    }
}

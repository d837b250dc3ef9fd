//! Tag extraction
//!
//! Reads title/artist/album and the first embedded picture from one MP3
//! file using lofty. A file that cannot be parsed yields an error; the
//! pipeline substitutes defaults and keeps going.

use lofty::file::TaggedFileExt;
use lofty::prelude::*;
use lofty::probe::Probe;
use mcat_common::config::TitleFallback;
use mcat_common::models::{SongRecord, UNKNOWN_ALBUM, UNKNOWN_ARTIST, UNKNOWN_TITLE};
use std::path::Path;
use thiserror::Error;

/// Tag extraction errors
#[derive(Debug, Error)]
pub enum ExtractError {
    /// File could not be opened or parsed as tagged audio
    #[error("Failed to read file: {0}")]
    ReadError(String),

    /// I/O error (file read)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Extraction output: the populated record plus the raw bytes of the
/// first embedded picture, if any. Nothing about the picture's original
/// encoding is kept.
#[derive(Debug)]
pub struct Extraction {
    pub record: SongRecord,
    pub picture: Option<Vec<u8>>,
}

/// Tag extractor service
pub struct TagExtractor {
    title_fallback: TitleFallback,
}

impl TagExtractor {
    pub fn new(title_fallback: TitleFallback) -> Self {
        Self { title_fallback }
    }

    /// Extract tag fields and cover art from one file.
    ///
    /// Absent fields get their default strings; the title default follows
    /// the configured fallback policy. The first attached picture wins --
    /// no selection by type or size.
    pub fn extract(&self, file_path: &Path) -> Result<Extraction, ExtractError> {
        let filename = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let full_path = file_path.to_string_lossy().to_string();

        let tagged_file = Probe::open(file_path)
            .map_err(|e| ExtractError::ReadError(e.to_string()))?
            .read()
            .map_err(|e| ExtractError::ReadError(e.to_string()))?;

        // ID3v2 preferred, falls back to whatever tag the file carries
        let tag = tagged_file.primary_tag().or_else(|| tagged_file.first_tag());

        let (title, artist, album, picture) = match tag {
            Some(tag) => {
                let title = tag
                    .title()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| self.fallback_title(file_path));
                let artist = tag
                    .artist()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
                let album = tag
                    .album()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| UNKNOWN_ALBUM.to_string());
                let picture = tag.pictures().first().map(|p| p.data().to_vec());
                (title, artist, album, picture)
            }
            None => {
                tracing::debug!(file = %file_path.display(), "No tags found in audio file");
                (
                    self.fallback_title(file_path),
                    UNKNOWN_ARTIST.to_string(),
                    UNKNOWN_ALBUM.to_string(),
                    None,
                )
            }
        };

        Ok(Extraction {
            record: SongRecord {
                filename,
                full_path,
                title,
                artist,
                album,
                thumbnail_path: None,
            },
            picture,
        })
    }

    fn fallback_title(&self, file_path: &Path) -> String {
        match self.title_fallback {
            TitleFallback::Filename => file_path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            TitleFallback::Placeholder => UNKNOWN_TITLE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lofty::config::WriteOptions;
    use lofty::picture::{MimeType, Picture, PictureType};
    use lofty::tag::{Accessor, Tag, TagExt, TagType};
    use std::path::PathBuf;

    /// Write a minimal but valid MP3: one silent MPEG-1 Layer III frame,
    /// then an ID3v2 tag with the given fields
    fn write_mp3(
        path: &Path,
        title: Option<&str>,
        artist: Option<&str>,
        album: Option<&str>,
        picture: Option<Vec<u8>>,
    ) {
        // 0xFF 0xFB 0x90 0x00: MPEG-1 Layer III, 128 kbps, 44.1 kHz -> 417-byte frame.
        // lofty validates a frame by matching the header of the *next* frame, so
        // emit two consecutive identical frames.
        let mut frame = vec![0xFF, 0xFB, 0x90, 0x00];
        frame.resize(417, 0);
        frame.extend_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
        frame.resize(834, 0);
        std::fs::write(path, &frame).unwrap();

        let mut tag = Tag::new(TagType::Id3v2);
        if let Some(title) = title {
            tag.set_title(title.to_string());
        }
        if let Some(artist) = artist {
            tag.set_artist(artist.to_string());
        }
        if let Some(album) = album {
            tag.set_album(album.to_string());
        }
        if let Some(data) = picture {
            tag.push_picture(Picture::new_unchecked(
                PictureType::CoverFront,
                Some(MimeType::Jpeg),
                None,
                data,
            ));
        }
        tag.save_to_path(path, WriteOptions::default()).unwrap();
    }

    fn fixture(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        dir.path().join(name)
    }

    #[test]
    fn extract_nonexistent_file_fails() {
        let extractor = TagExtractor::new(TitleFallback::Placeholder);
        assert!(extractor.extract(Path::new("/nonexistent/file.mp3")).is_err());
    }

    #[test]
    fn extract_garbage_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(&dir, "corrupt.mp3");
        std::fs::write(&path, b"this is not an mp3 file at all").unwrap();

        let extractor = TagExtractor::new(TitleFallback::Placeholder);
        assert!(extractor.extract(&path).is_err());
    }

    #[test]
    fn extract_reads_tag_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(&dir, "song.mp3");
        write_mp3(&path, Some("Test"), Some("Artist"), Some("Album"), None);

        let extractor = TagExtractor::new(TitleFallback::Placeholder);
        let extraction = extractor.extract(&path).unwrap();

        assert_eq!(extraction.record.filename, "song.mp3");
        assert_eq!(extraction.record.title, "Test");
        assert_eq!(extraction.record.artist, "Artist");
        assert_eq!(extraction.record.album, "Album");
        assert!(extraction.record.thumbnail_path.is_none());
        assert!(extraction.picture.is_none());
    }

    #[test]
    fn extract_returns_first_picture_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(&dir, "song.mp3");
        let art = vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3, 4];
        write_mp3(
            &path,
            Some("Test"),
            Some("Artist"),
            Some("Album"),
            Some(art.clone()),
        );

        let extractor = TagExtractor::new(TitleFallback::Placeholder);
        let extraction = extractor.extract(&path).unwrap();
        assert_eq!(extraction.picture, Some(art));
    }

    #[test]
    fn missing_fields_get_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(&dir, "untagged_fields.mp3");
        write_mp3(&path, Some("Only Title"), None, None, None);

        let extractor = TagExtractor::new(TitleFallback::Placeholder);
        let record = extractor.extract(&path).unwrap().record;
        assert_eq!(record.title, "Only Title");
        assert_eq!(record.artist, "Unknown Artist");
        assert_eq!(record.album, "Unknown Album");
    }

    #[test]
    fn missing_title_follows_fallback_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(&dir, "my_song.mp3");
        write_mp3(&path, None, Some("Artist"), None, None);

        let by_filename = TagExtractor::new(TitleFallback::Filename);
        assert_eq!(by_filename.extract(&path).unwrap().record.title, "my_song");

        let by_placeholder = TagExtractor::new(TitleFallback::Placeholder);
        assert_eq!(
            by_placeholder.extract(&path).unwrap().record.title,
            "Unknown Title"
        );
    }
}

//! The scan-and-upsert pipeline
//!
//! Single sequential pass: walk the tree, read tags, sideload cover art,
//! persist one record per file. Tag failures are per-file and recovered;
//! everything else aborts the run.

use crate::artwork::ArtworkWriter;
use crate::extractor::TagExtractor;
use crate::scanner::FileScanner;
use crate::sink::CatalogSink;
use anyhow::Result;
use mcat_common::models::SongRecord;
use std::path::Path;
use tracing::{info, warn};

/// Outcome of one scan run
#[derive(Debug, Default, Clone, Copy)]
pub struct ScanReport {
    /// Files with the target extension that were processed
    pub files_scanned: usize,
    /// Thumbnails written
    pub artwork_written: usize,
    /// Files whose tags could not be read (still counted as scanned)
    pub tag_errors: usize,
}

/// The scan pipeline: scanner, extractor, and artwork writer wired to an
/// injected catalog sink
pub struct ScanPipeline {
    scanner: FileScanner,
    extractor: TagExtractor,
    artwork: ArtworkWriter,
}

impl ScanPipeline {
    pub fn new(extractor: TagExtractor, artwork: ArtworkWriter) -> Self {
        Self {
            scanner: FileScanner::new(),
            extractor,
            artwork,
        }
    }

    /// Run one scan over `root`, persisting every record into `sink`.
    ///
    /// Fatal errors: missing/non-directory root, thumbnail directory
    /// creation, any sink failure. A file whose tags cannot be read is
    /// logged, counted, and persisted with default fields.
    pub async fn run(&self, root: &Path, sink: &mut dyn CatalogSink) -> Result<ScanReport> {
        // Root problems surface before any processing begins
        let files = self.scanner.scan(root)?;
        self.artwork.init()?;

        let mut report = ScanReport::default();

        for path in files {
            let (mut record, picture) = match self.extractor.extract(&path) {
                Ok(extraction) => (extraction.record, extraction.picture),
                Err(e) => {
                    let filename = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default();
                    warn!("Error processing {}: {}", filename, e);
                    report.tag_errors += 1;
                    (
                        SongRecord::with_defaults(filename, path.to_string_lossy().to_string()),
                        None,
                    )
                }
            };

            if let Some(data) = picture {
                match self.artwork.write(&record.title, &record.artist, &data) {
                    Ok(written) => {
                        record.thumbnail_path = Some(written.to_string_lossy().to_string());
                        report.artwork_written += 1;
                    }
                    Err(e) => {
                        // The record still goes out, just without a thumbnail
                        warn!("Error writing artwork for {}: {}", record.filename, e);
                    }
                }
            }

            sink.persist(record).await?;
            report.files_scanned += 1;
        }

        sink.finalize().await?;

        info!("Scan complete: {} files scanned", report.files_scanned);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::JsonFileSink;
    use lofty::config::WriteOptions;
    use lofty::picture::{MimeType, Picture, PictureType};
    use lofty::tag::{Accessor, Tag, TagExt, TagType};
    use mcat_common::config::TitleFallback;
    use std::path::PathBuf;

    fn pipeline(thumb_dir: &Path) -> ScanPipeline {
        ScanPipeline::new(
            TagExtractor::new(TitleFallback::Placeholder),
            ArtworkWriter::new(thumb_dir),
        )
    }

    /// One silent MPEG frame plus an ID3v2 tag
    fn write_mp3(path: &Path, title: &str, artist: &str, album: &str, picture: Option<Vec<u8>>) {
        // lofty validates a frame against the next frame's header, so emit two.
        let mut frame = vec![0xFF, 0xFB, 0x90, 0x00];
        frame.resize(417, 0);
        frame.extend_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
        frame.resize(834, 0);
        std::fs::write(path, &frame).unwrap();

        let mut tag = Tag::new(TagType::Id3v2);
        tag.set_title(title.to_string());
        tag.set_artist(artist.to_string());
        tag.set_album(album.to_string());
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

    fn read_catalog(path: &Path) -> Vec<SongRecord> {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn missing_root_aborts_before_processing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("library.json");
        let mut sink = JsonFileSink::new(&output);

        let result = pipeline(&dir.path().join("thumbnails"))
            .run(Path::new("/nonexistent/music"), &mut sink)
            .await;

        assert!(result.is_err());
        // Nothing was written
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn empty_directory_yields_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let music = dir.path().join("music");
        std::fs::create_dir(&music).unwrap();
        let output = dir.path().join("library.json");

        let mut sink = JsonFileSink::new(&output);
        let report = pipeline(&dir.path().join("thumbnails"))
            .run(&music, &mut sink)
            .await
            .unwrap();

        assert_eq!(report.files_scanned, 0);
        assert!(read_catalog(&output).is_empty());
    }

    #[tokio::test]
    async fn non_mp3_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let music = dir.path().join("music");
        std::fs::create_dir(&music).unwrap();
        write_mp3(&music.join("one.mp3"), "One", "A", "X", None);
        std::fs::write(music.join("notes.txt"), b"not audio").unwrap();
        std::fs::write(music.join("cover.jpg"), b"not audio").unwrap();

        let output = dir.path().join("library.json");
        let mut sink = JsonFileSink::new(&output);
        let report = pipeline(&dir.path().join("thumbnails"))
            .run(&music, &mut sink)
            .await
            .unwrap();

        assert_eq!(report.files_scanned, 1);
        assert_eq!(read_catalog(&output).len(), 1);
    }

    #[tokio::test]
    async fn corrupt_mp3_is_counted_with_default_fields() {
        let dir = tempfile::tempdir().unwrap();
        let music = dir.path().join("music");
        std::fs::create_dir(&music).unwrap();
        std::fs::write(music.join("broken.mp3"), b"garbage bytes").unwrap();

        let output = dir.path().join("library.json");
        let mut sink = JsonFileSink::new(&output);
        let report = pipeline(&dir.path().join("thumbnails"))
            .run(&music, &mut sink)
            .await
            .unwrap();

        assert_eq!(report.files_scanned, 1);
        assert_eq!(report.tag_errors, 1);

        let catalog = read_catalog(&output);
        assert_eq!(catalog[0].filename, "broken.mp3");
        assert_eq!(catalog[0].title, "Unknown Title");
        assert_eq!(catalog[0].artist, "Unknown Artist");
        assert_eq!(catalog[0].album, "Unknown Album");
        assert!(catalog[0].thumbnail_path.is_none());
    }

    #[tokio::test]
    async fn embedded_picture_lands_in_thumbnail_dir() {
        let dir = tempfile::tempdir().unwrap();
        let music = dir.path().join("music");
        std::fs::create_dir(&music).unwrap();
        let art = vec![0xFF, 0xD8, 0xFF, 0xE0, 42];
        write_mp3(
            &music.join("with_art.mp3"),
            "Hey Jude",
            "The Beatles",
            "Past Masters",
            Some(art.clone()),
        );
        write_mp3(&music.join("no_art.mp3"), "Plain", "Nobody", "None", None);

        let thumbs = dir.path().join("thumbnails");
        let output = dir.path().join("library.json");
        let mut sink = JsonFileSink::new(&output);
        let report = pipeline(&thumbs).run(&music, &mut sink).await.unwrap();

        assert_eq!(report.files_scanned, 2);
        assert_eq!(report.artwork_written, 1);

        let catalog = read_catalog(&output);
        let with_art = catalog.iter().find(|r| r.filename == "with_art.mp3").unwrap();
        let thumb_path = PathBuf::from(with_art.thumbnail_path.as_ref().unwrap());
        assert!(thumb_path.is_file());
        assert_eq!(std::fs::read(&thumb_path).unwrap(), art);
        assert_eq!(
            thumb_path.file_name().unwrap().to_string_lossy(),
            "Hey_Jude_The_Beatles.jpg"
        );

        let no_art = catalog.iter().find(|r| r.filename == "no_art.mp3").unwrap();
        assert!(no_art.thumbnail_path.is_none());
    }

    #[tokio::test]
    async fn rescan_into_database_does_not_duplicate() {
        use crate::sink::DatabaseSink;
        use mcat_common::db::create_songs_table;

        let dir = tempfile::tempdir().unwrap();
        let music = dir.path().join("music");
        std::fs::create_dir(&music).unwrap();
        write_mp3(&music.join("one.mp3"), "One", "A", "X", None);
        write_mp3(&music.join("two.mp3"), "Two", "B", "Y", None);

        let pool = sqlx::SqlitePool::connect("sqlite::memory:").await.unwrap();
        create_songs_table(&pool).await.unwrap();

        let p = pipeline(&dir.path().join("thumbnails"));
        let mut sink = DatabaseSink::new(pool.clone());
        p.run(&music, &mut sink).await.unwrap();
        p.run(&music, &mut sink).await.unwrap();

        assert_eq!(mcat_common::db::songs::count_songs(&pool).await.unwrap(), 2);
    }
}

//! mcat-ix - music library indexer
//!
//! Walks a music folder, reads ID3 tags and embedded cover art from MP3
//! files, and writes the catalog either to a JSON document or to the
//! catalog database, upserted by file path.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mcat_common::config::{self, SinkKind, TitleFallback};
use mcat_ix::artwork::ArtworkWriter;
use mcat_ix::extractor::TagExtractor;
use mcat_ix::pipeline::ScanPipeline;
use mcat_ix::sink::{DatabaseSink, JsonFileSink};

/// Command-line arguments for mcat-ix
#[derive(Parser, Debug)]
#[command(name = "mcat-ix")]
#[command(about = "Music library indexer for MCAT")]
#[command(version)]
struct Args {
    /// Folder to scan; prompted for interactively when omitted
    #[arg(env = "MCAT_MUSIC_ROOT")]
    music_root: Option<PathBuf>,

    /// Catalog sink: "json" or "database"
    #[arg(short, long, env = "MCAT_SINK")]
    sink: Option<SinkKind>,

    /// Title fallback for files without a title tag: "filename" or "placeholder"
    #[arg(long, env = "MCAT_TITLE_FALLBACK")]
    title_fallback: Option<TitleFallback>,

    /// JSON catalog output path (json sink)
    #[arg(long, env = "MCAT_LIBRARY_PATH")]
    library_path: Option<PathBuf>,

    /// Catalog database path (database sink)
    #[arg(long, env = "MCAT_DATABASE_PATH")]
    database_path: Option<PathBuf>,

    /// Thumbnail output directory
    #[arg(long, env = "MCAT_THUMBNAIL_DIR")]
    thumbnail_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcat_ix=info,mcat_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let toml_config = config::load_toml_config();

    let sink_kind = args
        .sink
        .or(toml_config.scanner.sink)
        .unwrap_or(SinkKind::Json);
    let title_fallback = args
        .title_fallback
        .or(toml_config.scanner.title_fallback)
        .unwrap_or_else(|| TitleFallback::default_for(sink_kind));

    let music_root = match args.music_root.or_else(|| toml_config.scanner.music_root.clone()) {
        Some(path) => path,
        None => prompt_music_root()?,
    };

    let thumbnail_dir = config::resolve_thumbnail_dir(args.thumbnail_dir, &toml_config);

    info!("Scanning {} (sink: {})", music_root.display(), sink_kind);

    let pipeline = ScanPipeline::new(
        TagExtractor::new(title_fallback),
        ArtworkWriter::new(&thumbnail_dir),
    );

    let report = match sink_kind {
        SinkKind::Json => {
            let library_path = config::resolve_library_path(args.library_path, &toml_config);
            let mut sink = JsonFileSink::new(&library_path);
            let report = pipeline.run(&music_root, &mut sink).await?;
            println!(
                "Done! Scanned {} songs. Check '{}' and the '{}' folder.",
                report.files_scanned,
                library_path.display(),
                thumbnail_dir.display()
            );
            report
        }
        SinkKind::Database => {
            let database_path = config::resolve_database_path(args.database_path, &toml_config);
            let pool = mcat_common::db::init_database(&database_path)
                .await
                .context("Failed to open catalog database")?;

            let mut sink = DatabaseSink::new(pool.clone());
            let report = pipeline.run(&music_root, &mut sink).await?;

            pool.close().await;
            println!("Done! Scanned {} songs.", report.files_scanned);
            report
        }
    };

    if report.tag_errors > 0 {
        info!("{} files had unreadable tags", report.tag_errors);
    }

    Ok(())
}

/// Ask for the music folder on stdin
fn prompt_music_root() -> Result<PathBuf> {
    print!("Enter the path to your music folder: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read music folder path")?;

    Ok(PathBuf::from(line.trim()))
}

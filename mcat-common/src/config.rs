//! Configuration loading and resolution
//!
//! Values resolve in priority order:
//! 1. Command-line argument (clap also maps `MCAT_*` environment variables)
//! 2. TOML config file (`~/.config/mcat/config.toml`, then `/etc/mcat/config.toml`)
//! 3. Compiled default

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

/// Default listen address for mcat-ui
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
/// Default port for mcat-ui
pub const DEFAULT_SERVER_PORT: u16 = 5750;
/// Default JSON catalog output path, relative to the working directory
pub const DEFAULT_LIBRARY_PATH: &str = "library.json";
/// Default thumbnail output directory, relative to the working directory
pub const DEFAULT_THUMBNAIL_DIR: &str = "thumbnails";

/// Which catalog sink the indexer writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Accumulate records and write one pretty-printed JSON document
    Json,
    /// Upsert each record into the catalog database as it is produced
    Database,
}

impl FromStr for SinkKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(SinkKind::Json),
            "database" | "db" => Ok(SinkKind::Database),
            other => Err(Error::InvalidInput(format!(
                "Unknown sink '{}' (expected 'json' or 'database')",
                other
            ))),
        }
    }
}

impl std::fmt::Display for SinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkKind::Json => write!(f, "json"),
            SinkKind::Database => write!(f, "database"),
        }
    }
}

/// Title substitution when a parsed file carries no title tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleFallback {
    /// Use the file's stem as the title
    Filename,
    /// Use the generic "Unknown Title" placeholder
    Placeholder,
}

impl TitleFallback {
    /// Historical default per sink: the JSON variant fell back to the
    /// filename, the database variant to the placeholder string
    pub fn default_for(sink: SinkKind) -> Self {
        match sink {
            SinkKind::Json => TitleFallback::Filename,
            SinkKind::Database => TitleFallback::Placeholder,
        }
    }
}

impl FromStr for TitleFallback {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "filename" => Ok(TitleFallback::Filename),
            "placeholder" => Ok(TitleFallback::Placeholder),
            other => Err(Error::InvalidInput(format!(
                "Unknown title fallback '{}' (expected 'filename' or 'placeholder')",
                other
            ))),
        }
    }
}

/// TOML configuration file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// `[catalog]` section: where the catalog artifacts live
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub database_path: Option<PathBuf>,
    pub library_path: Option<PathBuf>,
    pub thumbnail_dir: Option<PathBuf>,
}

/// `[scanner]` section: mcat-ix behavior
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScannerConfig {
    pub music_root: Option<PathBuf>,
    pub sink: Option<SinkKind>,
    pub title_fallback: Option<TitleFallback>,
}

/// `[server]` section: mcat-ui listen address
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Locate the configuration file for the platform
fn find_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("mcat").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    let system_config = PathBuf::from("/etc/mcat/config.toml");
    if system_config.exists() {
        return Ok(system_config);
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Load the TOML config file, falling back to defaults when it is missing
/// or unreadable (a malformed file is logged, not fatal)
pub fn load_toml_config() -> TomlConfig {
    let path = match find_config_file() {
        Ok(path) => path,
        Err(_) => return TomlConfig::default(),
    };

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return TomlConfig::default();
        }
    };

    match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to parse config file {}: {}", path.display(), e);
            TomlConfig::default()
        }
    }
}

/// OS-dependent default location of the catalog database
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("mcat"))
        .unwrap_or_else(|| PathBuf::from("./mcat_data"))
        .join("mcat.db")
}

/// Resolve the catalog database path: CLI/env -> TOML -> platform default
pub fn resolve_database_path(cli: Option<PathBuf>, config: &TomlConfig) -> PathBuf {
    cli.or_else(|| config.catalog.database_path.clone())
        .unwrap_or_else(default_database_path)
}

/// Resolve the JSON catalog output path: CLI/env -> TOML -> `library.json`
pub fn resolve_library_path(cli: Option<PathBuf>, config: &TomlConfig) -> PathBuf {
    cli.or_else(|| config.catalog.library_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LIBRARY_PATH))
}

/// Resolve the thumbnail directory: CLI/env -> TOML -> `thumbnails`
pub fn resolve_thumbnail_dir(cli: Option<PathBuf>, config: &TomlConfig) -> PathBuf {
    cli.or_else(|| config.catalog.thumbnail_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_THUMBNAIL_DIR))
}

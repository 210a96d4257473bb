use std::path::{Path, PathBuf};

use directories::{ProjectDirs, UserDirs};
use serde::Deserialize;
use thiserror::Error;

use crate::report::DEFAULT_BASE_URL;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Root directory is not a directory: {0}")]
    RootDir(PathBuf),
    #[error("Output directory does not exist: {0}")]
    OutputDir(PathBuf),
    #[error("Could not determine a default {0}; pass it explicitly")]
    NoDefault(&'static str),
}

/// Application configuration loaded from TOML config file.
/// All fields are optional; the config file itself is optional.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Directory tree to scan for MIDI files.
    pub root_dir: Option<PathBuf>,
    /// Where the HTML report is written.
    pub output: Option<PathBuf>,
    /// Custom database path (overrides XDG default).
    pub db_path: Option<PathBuf>,
    /// Prefix for file links in the report.
    pub base_url: Option<String>,
}

impl AppConfig {
    /// Load config from `~/.config/midindex/config.toml`.
    /// Returns default config if file doesn't exist.
    /// Logs a warning if the file exists but can't be parsed.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
                Self::default()
            }
        }
    }

    /// Get the config file path.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Values given on the command line; each one overrides the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub scan: bool,
    pub root_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub base_url: Option<String>,
}

/// Everything one invocation needs, resolved once by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub scan: bool,
    pub root_dir: PathBuf,
    pub output: PathBuf,
    pub db_path: PathBuf,
    pub base_url: String,
}

impl RunConfig {
    /// Resolve CLI > config file > built-in defaults, then validate paths.
    pub fn resolve(cli: Overrides, config: AppConfig) -> Result<Self, ConfigError> {
        let root_dir = match cli.root_dir.or(config.root_dir) {
            Some(p) => p,
            None => default_root_dir().ok_or(ConfigError::NoDefault("root directory"))?,
        };
        let output = match cli.output.or(config.output) {
            Some(p) => p,
            None => default_output_path().ok_or(ConfigError::NoDefault("output path"))?,
        };
        let db_path = cli
            .db_path
            .or(config.db_path)
            .unwrap_or_else(default_db_path);
        let base_url = cli
            .base_url
            .or(config.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        if cli.scan && !root_dir.is_dir() {
            return Err(ConfigError::RootDir(root_dir));
        }
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                return Err(ConfigError::OutputDir(parent.to_path_buf()));
            }
        }

        Ok(Self {
            scan: cli.scan,
            root_dir,
            output,
            db_path,
            base_url,
        })
    }
}

/// FL Studio's score preset folder under the user's documents.
pub fn default_root_dir() -> Option<PathBuf> {
    let dirs = UserDirs::new()?;
    let documents = dirs
        .document_dir()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dirs.home_dir().join("Documents"));
    Some(
        documents
            .join("Image-Line")
            .join("FL Studio")
            .join("Presets")
            .join("Scores"),
    )
}

/// `midi_data.html` on the desktop, or in the home directory without one.
pub fn default_output_path() -> Option<PathBuf> {
    let dirs = UserDirs::new()?;
    let dir = dirs
        .desktop_dir()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dirs.home_dir().to_path_buf());
    Some(dir.join("midi_data.html"))
}

/// Resolve the default database path using XDG data directory.
pub fn default_db_path() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("", "", crate::APP_NAME) {
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir).ok();
        data_dir.join("midis.db")
    } else {
        // Fallback: current directory
        PathBuf::from("midis.db")
    }
}

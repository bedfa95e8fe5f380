//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "SONGBOOK_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "songbook.db";

/// Songs shown per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Contents of `config.toml`
///
/// Every section is optional; absent keys fall back to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub logging: LoggingConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    pub page_size: Option<usize>,
    /// JSON-lines dataset loaded on first run
    pub dataset: Option<PathBuf>,
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }

    /// Load configuration from a file
    ///
    /// A missing file yields the defaults with a warning. A file that exists
    /// but cannot be parsed is a configuration error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config file not found: {} (using defaults)", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded config file: {}", path.display());
        Ok(config)
    }

    /// Load the platform default config file, if one exists
    pub fn load_default() -> Result<Self> {
        match default_config_file() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Page size from config, falling back to [`DEFAULT_PAGE_SIZE`]
    pub fn page_size(&self) -> Result<NonZeroUsize> {
        resolve_page_size(self.catalog.page_size)
    }
}

/// Validate a page size, defaulting when none is given
pub fn resolve_page_size(page_size: Option<usize>) -> Result<NonZeroUsize> {
    let size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    NonZeroUsize::new(size)
        .ok_or_else(|| Error::Config("page_size must be greater than zero".to_string()))
}

/// Root folder resolution priority:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_config: &TomlConfig,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml_config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// Database path inside a root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE)
}

/// Platform config file location
///
/// Linux checks `~/.config/songbook/config.toml` then `/etc/songbook/config.toml`.
pub fn default_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("songbook").join("config.toml"));

    if cfg!(target_os = "linux") {
        if let Some(path) = &user_config {
            if path.exists() {
                return user_config;
            }
        }
        let system_config = PathBuf::from("/etc/songbook/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
        return None;
    }

    user_config.filter(|path| path.exists())
}

/// OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\songbook
        dirs::data_local_dir()
            .map(|d| d.join("songbook"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\songbook"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/songbook
        dirs::data_dir()
            .map(|d| d.join("songbook"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/songbook"))
    } else {
        // ~/.local/share/songbook
        dirs::data_local_dir()
            .map(|d| d.join("songbook"))
            .unwrap_or_else(|| PathBuf::from("./songbook_data"))
    }
}

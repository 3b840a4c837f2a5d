//! Application configuration management

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};

use super::catalog::{Grade, Subject};

/// Folder holding uploaded notes when no root is configured
pub const UPLOAD_FOLDER_NAME: &str = "NotesApp_Uploads";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where notes are kept
    pub storage: StorageConfig,
    /// UI settings
    pub ui: UiConfig,
}

/// Which note store implementation to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Notes live for the session only
    #[default]
    Memory,
    /// Notes are written under the upload root
    Filesystem,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Memory => f.write_str("in-memory"),
            StorageBackend::Filesystem => f.write_str("filesystem"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "filesystem" | "disk" => Ok(StorageBackend::Filesystem),
            other => anyhow::bail!("Unknown storage backend: {}", other),
        }
    }
}

/// Storage settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Upload root for the filesystem backend
    pub root: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the upload root: configured path, else the desktop, else the temp dir
    pub fn upload_root(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(|| {
            UserDirs::new()
                .and_then(|dirs| dirs.desktop_dir().map(|d| d.to_path_buf()))
                .unwrap_or_else(std::env::temp_dir)
                .join(UPLOAD_FOLDER_NAME)
        })
    }
}

/// Color theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// UI settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub theme: Theme,
    /// Grade preselected in the forms
    pub last_grade: Grade,
    /// Subject preselected in the forms
    pub last_subject: Subject,
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "noteshub", "NotesHub")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from disk, then apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            Self::from_json(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env(
            std::env::var("NOTESHUB_STORAGE").ok(),
            std::env::var("NOTESHUB_ROOT").ok(),
        );
        Ok(config)
    }

    fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Override storage settings from `NOTESHUB_STORAGE` / `NOTESHUB_ROOT` values.
    /// An unrecognized backend is ignored and the file setting kept.
    fn apply_env(&mut self, backend: Option<String>, root: Option<String>) {
        if let Some(backend) = backend {
            match backend.parse() {
                Ok(backend) => self.storage.backend = backend,
                Err(e) => tracing::warn!(
                    "Ignoring NOTESHUB_STORAGE: {:#}; keeping {} storage",
                    e,
                    self.storage.backend
                ),
            }
        }
        if let Some(root) = root.filter(|r| !r.trim().is_empty()) {
            self.storage.root = Some(PathBuf::from(root));
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }
}

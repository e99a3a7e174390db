// OneHand Downloader Settings
// Copyright (c) 2026 Xing_The_Creator | OneHand
//
// Persistent defaults for the YouTube downloader, stored as a `[settings]`
// table in a TOML file under the user's config directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36 Brave/1.66.118";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloaderSettings {
    pub default_quality: String,
    pub default_output_dir: PathBuf,
    pub continue_downloads: bool,
    pub no_overwrites: bool,
    pub progress: bool,
    pub user_agent: String,
}

impl Default for DownloaderSettings {
    fn default() -> Self {
        Self {
            default_quality: "best".to_string(),
            default_output_dir: default_output_dir(),
            continue_downloads: true,
            no_overwrites: true,
            progress: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    settings: DownloaderSettings,
}

impl DownloaderSettings {
    /// Defaults without the browser user agent, used when the config file is bypassed.
    pub fn bare() -> Self {
        Self {
            user_agent: String::new(),
            ..Self::default()
        }
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {:?}", path))?;
        let file: SettingsFile =
            toml::from_str(&raw).with_context(|| format!("Could not parse config file {:?}", path))?;
        Ok(file.settings)
    }

    /// Like `load`, but a broken file only logs a warning.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("[CONFIG] ⚠️ {:#}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Could not create config folder {:?}", parent))?;
        }
        let file = SettingsFile {
            settings: self.clone(),
        };
        let raw = toml::to_string_pretty(&file).context("Could not serialize settings")?;
        std::fs::write(path, raw).with_context(|| format!("Could not write config file {:?}", path))?;
        info!("[CONFIG] Settings saved to {:?}", path);
        Ok(())
    }

    /// Write the default settings to `path` and return them.
    pub fn create_default(path: &Path) -> Result<Self> {
        let settings = Self::default();
        settings.save(path)?;
        Ok(settings)
    }
}

/// `<config_dir>/onehand/youtube_downloader.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("onehand")
        .join("youtube_downloader.toml")
}

/// `~/Downloads/OneHandCoding`
pub fn default_output_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Downloads")
        .join("OneHandCoding")
}

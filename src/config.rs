// OneHand Paths & Constants
// Copyright (c) 2026 Xing_The_Creator | OneHand
//
// Resolves where the crate keeps its runtime data (sound clips, the name
// cache database, generated maps) and creates those folders on demand.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Width of the `=` rules drawn around banners.
pub const LINE_LENGTH: usize = 50;

/// Marker file that identifies the project root.
const ROOT_MARKER: &str = "Cargo.toml";

/// Overrides the data directory (useful for tests and packaged installs).
pub const DATA_DIR_ENV: &str = "ONEHAND_DATA_DIR";

/// Find the project root by walking up from `start` until a `Cargo.toml` is found.
/// Falls back to `start` itself (or its parent, for files) when nothing matches.
pub fn find_project_root(start: &Path) -> PathBuf {
    let start = if start.is_file() {
        start.parent().unwrap_or(start)
    } else {
        start
    };

    start
        .ancestors()
        .find(|dir| dir.join(ROOT_MARKER).exists())
        .unwrap_or(start)
        .to_path_buf()
}

/// Create every folder in the list, including missing parents.
pub fn create_folders(folders: &[PathBuf]) -> std::io::Result<()> {
    for folder in folders {
        std::fs::create_dir_all(folder)?;
    }
    Ok(())
}

/// Runtime directories used by the narration and name lookup tools.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub project_root: PathBuf,
    pub data_dir: PathBuf,
    pub sound_dir: PathBuf,
    pub maps_dir: PathBuf,
}

impl AppPaths {
    /// Build the layout below an explicit data directory.
    pub fn with_data_dir(project_root: PathBuf, data_dir: PathBuf) -> Self {
        let sound_dir = data_dir.join("sounds");
        let maps_dir = data_dir.join("maps");
        Self {
            project_root,
            data_dir,
            sound_dir,
            maps_dir,
        }
    }

    /// Resolve paths from the current directory (or `ONEHAND_DATA_DIR`) and create them.
    pub fn resolve() -> Result<Self> {
        let cwd = std::env::current_dir().context("Cannot determine current directory")?;
        let project_root = find_project_root(&cwd);

        let data_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => project_root.join("data"),
        };

        let paths = Self::with_data_dir(project_root, data_dir);
        paths.ensure()?;
        info!("[CONFIG] Data directory: {:?}", paths.data_dir);
        Ok(paths)
    }

    /// Create the data, sound and map folders if they are missing.
    pub fn ensure(&self) -> Result<()> {
        create_folders(&[self.data_dir.clone(), self.sound_dir.clone(), self.maps_dir.clone()])
            .with_context(|| format!("Failed to create data folders under {:?}", self.data_dir))?;
        debug!("[CONFIG] Folders ready: {:?}", self.sound_dir);
        Ok(())
    }

    /// SQLite file backing the name meaning cache.
    pub fn name_cache_db(&self) -> PathBuf {
        self.data_dir.join("name_cache.db")
    }
}

/// Read a boolean-ish environment flag (`1`, `true`, `yes`).
pub fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

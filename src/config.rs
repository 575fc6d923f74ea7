//! Store configuration
//!
//! Paths are carried in an explicit [`StoreConfig`] handed to whoever needs
//! them; there is no process-wide mutable path state. The database file lives
//! in its own subdirectory, separate from the dock directory that holds files
//! to ingest and receives extracted ones.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the database file
    pub store_dir: PathBuf,
    /// Working directory for files to ingest and extract
    pub dock_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(".blobstash"),
            dock_dir: PathBuf::from("dock"),
        }
    }
}

impl StoreConfig {
    /// Path of the database file inside the store directory
    pub fn db_path(&self) -> PathBuf {
        self.store_dir.join("storage.db")
    }

    /// Create the store and dock directories if they are missing
    pub fn ensure_dirs(&self) -> anyhow::Result<()> {
        for dir in [&self.store_dir, &self.dock_dir] {
            if !dir.exists() {
                std::fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("blobstash.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<StoreConfig>> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: StoreConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &StoreConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

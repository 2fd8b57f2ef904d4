//! Configuration file on disk

use dvdnfo_core::config::Config;
use dvdnfo_core::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::atomic::atomic_write;
use crate::location::default_config_path;

const HEADER: &str = "# dvdnfo configuration\n\n";

/// Reads and initializes `config.toml`
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Explicit path if given, otherwise the platform default
    pub fn resolve(explicit: Option<&Path>) -> Self {
        match explicit {
            Some(path) => Self::new(path),
            None => Self::new(default_config_path()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the file, or defaults when it does not exist
    pub fn load(&self) -> Result<Config> {
        Config::load_or_default(&self.path)
    }

    /// Write the default configuration.
    ///
    /// An existing file is first copied to `config.toml.backup-<timestamp>`
    /// unless `force` is set. Returns the backup path when one was made.
    pub fn init(&self, force: bool) -> Result<Option<PathBuf>> {
        let backup = if self.exists() && !force {
            let backup = PathBuf::from(format!(
                "{}.backup-{}",
                self.path.display(),
                chrono::Local::now().format("%Y%m%d-%H%M%S")
            ));
            fs::copy(&self.path, &backup)?;
            info!("Backed up {:?} to {:?}", self.path, backup);
            Some(backup)
        } else {
            None
        };

        let body = format!("{}{}", HEADER, Config::default().to_toml()?);
        atomic_write(&self.path, body.as_bytes())?;
        info!("Wrote default configuration to {:?}", self.path);

        Ok(backup)
    }
}

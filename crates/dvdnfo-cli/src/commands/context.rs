//! Shared state for command handlers

use anyhow::{Context, Result};
use dvdnfo_core::config::Config;
use dvdnfo_core::session::{CatalogSession, SessionSettings};
use dvdnfo_integration::HttpPageLoader;
use dvdnfo_storage::{ConfigStore, CookieFile};
use std::path::{Path, PathBuf};

/// Global options resolved once per invocation
#[derive(Debug)]
pub struct AppContext {
    store: ConfigStore,
    cookies_override: Option<PathBuf>,
}

impl AppContext {
    pub fn new(config_path: Option<&Path>, cookies_override: Option<PathBuf>) -> Self {
        Self {
            store: ConfigStore::resolve(config_path),
            cookies_override,
        }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn config(&self) -> Result<Config> {
        self.store
            .load()
            .context(format!("Failed to load configuration from {}", self.store.path().display()))
    }

    /// `--cookies`, then `library.cookie_file`, then the default location
    pub fn cookie_file(&self, config: &Config) -> CookieFile {
        match (&self.cookies_override, &config.library.cookie_file) {
            (Some(path), _) => CookieFile::new(path),
            (None, Some(path)) => CookieFile::new(path),
            (None, None) => CookieFile::default_location(),
        }
    }

    pub fn loader(&self, config: &Config) -> HttpPageLoader {
        HttpPageLoader::from_config(&config.catalog)
    }

    /// Catalog session over HTTP, signed in when the cookie file loads
    pub fn open_session(&self, config: &Config) -> CatalogSession {
        let cookies = self.cookie_file(config);
        CatalogSession::new(
            self.loader(config),
            &cookies,
            SessionSettings::from(&config.catalog),
        )
    }
}

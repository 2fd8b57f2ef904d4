//! Configuration management for dvdnfo

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DvdNfoError, Result};
use crate::matching::{MatchCriteria, MatchPolicy, DEFAULT_THRESHOLD, DEFAULT_YEAR_TOLERANCE};
use crate::updater::SyncOptions;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog site settings
    pub catalog: CatalogConfig,
    /// Local media library settings
    pub library: LibraryConfig,
    /// Which descriptor fields get synced by default
    pub sync: SyncOptions,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| DvdNfoError::Io(e).with_context(format!("Failed to read {}", path.display())))?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Serialize to pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        let catalog = &self.catalog;
        if !(catalog.base_url.starts_with("http://") || catalog.base_url.starts_with("https://")) {
            return Err(DvdNfoError::Config(format!(
                "catalog.base_url must be an http(s) URL, got '{}'",
                catalog.base_url
            )));
        }
        if catalog.match_threshold > 100 {
            return Err(DvdNfoError::Config(
                "catalog.match_threshold must be between 0 and 100".to_string(),
            ));
        }
        if catalog.year_tolerance < 1 {
            return Err(DvdNfoError::Config(
                "catalog.year_tolerance must be at least 1".to_string(),
            ));
        }
        if catalog.search_timeout_secs == 0 || catalog.page_timeout_secs == 0 {
            return Err(DvdNfoError::Config("timeouts must be positive".to_string()));
        }
        Ok(())
    }
}

/// Catalog-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Scheme and host of the catalog
    pub base_url: String,
    /// Seconds to wait for search results to render
    pub search_timeout_secs: u64,
    /// Seconds any single page request may take
    pub page_timeout_secs: u64,
    /// Milliseconds between checks while waiting for an element
    pub poll_interval_ms: u64,
    /// Minimum title similarity (0 to 100)
    pub match_threshold: u8,
    /// Exclusive bound on the year difference
    pub year_tolerance: i32,
    /// Candidate selection policy
    pub match_policy: MatchPolicy,
    /// User agent sent with requests
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dvd.netflix.com".to_string(),
            search_timeout_secs: 3,
            page_timeout_secs: 15,
            poll_interval_ms: 250,
            match_threshold: DEFAULT_THRESHOLD,
            year_tolerance: DEFAULT_YEAR_TOLERANCE,
            match_policy: MatchPolicy::FirstMatch,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

impl CatalogConfig {
    pub fn match_criteria(&self) -> MatchCriteria {
        MatchCriteria {
            threshold: self.match_threshold,
            year_tolerance: self.year_tolerance,
            policy: self.match_policy,
        }
    }
}

/// Local library configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Folder holding one `Name (Year)` folder per movie
    pub movies_dir: PathBuf,
    /// Folder holding one folder per TV show
    pub tvshows_dir: PathBuf,
    /// Cookie export file; defaults to `cookies.json` in the config dir
    pub cookie_file: Option<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            movies_dir: PathBuf::from("/Volumes/Media/Movies"),
            tvshows_dir: PathBuf::from("/Volumes/Media/TV"),
            cookie_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.catalog.search_timeout_secs, 3);
        assert_eq!(config.catalog.match_threshold, 80);
        assert_eq!(config.catalog.match_policy, MatchPolicy::FirstMatch);
        assert!(config.sync.plot);
        assert!(!config.sync.avg_rating);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[catalog]"));
        assert!(toml.contains("[library]"));
        assert!(toml.contains("[sync]"));
        assert!(toml.contains("best-guess-rating"));

        let config2: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config, config2);
    }

    #[test]
    fn test_partial_config() {
        let config: Config = toml::from_str(
            r#"
[catalog]
match_policy = "best-match"

[sync]
avg-rating = true
"#,
        )
        .unwrap();
        assert_eq!(config.catalog.match_policy, MatchPolicy::BestMatch);
        assert_eq!(config.catalog.search_timeout_secs, 3);
        assert!(config.sync.avg_rating);
        assert!(config.sync.plot);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.catalog.match_threshold = 120;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.catalog.base_url = "dvd.netflix.com".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.catalog.year_tolerance = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());

        fs::write(&path, "[catalog]\nsearch_timeout_secs = 5\n").unwrap();
        assert_eq!(Config::load(&path).unwrap().catalog.search_timeout_secs, 5);

        fs::write(&path, "[catalog\n").unwrap();
        assert!(matches!(Config::load(&path), Err(DvdNfoError::Toml(_))));
    }
}

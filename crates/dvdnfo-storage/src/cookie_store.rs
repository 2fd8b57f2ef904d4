//! Cookie export files

use dvdnfo_core::error::{DvdNfoError, Result};
use dvdnfo_core::loader::CookieSource;
use dvdnfo_core::types::CookieJar;
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::location::default_cookie_path;

/// A JSON array of cookies exported from a signed-in browser
#[derive(Debug, Clone)]
pub struct CookieFile {
    path: PathBuf,
}

impl CookieFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `cookies.json` in the platform config directory
    pub fn default_location() -> Self {
        Self::new(default_cookie_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl CookieSource for CookieFile {
    fn load(&self) -> Result<CookieJar> {
        let file = fs::File::open(&self.path).map_err(|e| {
            DvdNfoError::Io(e).with_context(format!("Failed to open cookie file {}", self.path.display()))
        })?;
        let jar: CookieJar = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            DvdNfoError::Serde(e).with_context(format!("Failed to parse cookie file {}", self.path.display()))
        })?;

        debug!("Read {} cookies from {:?}", jar.len(), self.path);
        Ok(jar)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EXPORT: &str = r#"[
  {
    "domain": ".netflix.com",
    "expirationDate": 1893456000.5,
    "hostOnly": false,
    "httpOnly": true,
    "name": "NetflixId",
    "path": "/",
    "sameSite": "lax",
    "secure": true,
    "session": false,
    "storeId": "0",
    "value": "abc123",
    "id": 1
  },
  {
    "domain": "dvd.netflix.com",
    "name": "lang",
    "value": "en"
  }
]"#;

    #[test]
    fn test_load_export() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cookies.json");
        fs::write(&path, EXPORT).unwrap();

        let jar = CookieFile::new(&path).load().unwrap();

        assert_eq!(jar.len(), 2);
        let first = jar.iter().next().unwrap();
        assert_eq!(first.name, "NetflixId");
        assert!(first.http_only);
        assert_eq!(
            jar.header_for("https://dvd.netflix.com/Search?v1=x", 1_700_000_000).as_deref(),
            Some("NetflixId=abc123; lang=en")
        );
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let source = CookieFile::new(dir.path().join("absent.json"));

        assert!(!source.exists());
        let err = source.load().unwrap_err();
        assert!(err.to_string().contains("Failed to open cookie file"));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cookies.json");
        fs::write(&path, "{not json").unwrap();

        let err = CookieFile::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse cookie file"));
    }

    #[test]
    fn test_describe_is_path() {
        let source = CookieFile::new("/tmp/cookies.json");
        assert_eq!(source.describe(), "/tmp/cookies.json");
    }
}

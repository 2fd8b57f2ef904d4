//! Default file locations

use std::path::PathBuf;

/// Platform config directory, `~/.dvdnfo` when none is known
pub fn config_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "dvdnfo", "dvdnfo")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".dvdnfo")
        })
}

pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Cookie export read when neither config nor flags name one
pub fn default_cookie_path() -> PathBuf {
    config_dir().join("cookies.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_share_dir() {
        assert!(default_config_path().ends_with("config.toml"));
        assert!(default_cookie_path().ends_with("cookies.json"));
        assert_eq!(default_config_path().parent(), default_cookie_path().parent());
    }
}

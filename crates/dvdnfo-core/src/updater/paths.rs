//! Where descriptors live in the media library

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DvdNfoError, Result};

/// File name the cover image is stored under
pub const LANDSCAPE_FILE: &str = "landscape.jpg";

/// Kind of title a descriptor describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorKind {
    Movie,
    TvShow,
}

impl DescriptorKind {
    /// Root element name of the descriptor
    pub fn root_tag(&self) -> &'static str {
        match self {
            DescriptorKind::Movie => "movie",
            DescriptorKind::TvShow => "tvshow",
        }
    }

    pub fn from_root_tag(tag: &str) -> Option<Self> {
        match tag {
            "movie" => Some(DescriptorKind::Movie),
            "tvshow" => Some(DescriptorKind::TvShow),
            _ => None,
        }
    }
}

/// A movie folder named `Name (Year)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieFolder {
    pub name: String,
    pub year: i32,
}

impl MovieFolder {
    /// Parse a folder name like `Alice in Wonderland (2010)`
    pub fn parse(folder: &str) -> Result<Self> {
        let invalid = || {
            DvdNfoError::Validation(format!(
                "Expected a folder name like 'Name (Year)', got '{}'",
                folder
            ))
        };

        let trimmed = folder.trim();
        let open = trimmed.rfind(" (").ok_or_else(invalid)?;
        let year_part = trimmed[open + 2..].strip_suffix(')').ok_or_else(invalid)?;
        if year_part.len() != 4 {
            return Err(invalid());
        }
        let year = year_part.parse::<i32>().map_err(|_| invalid())?;
        let name = trimmed[..open].trim();
        if name.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            name: name.to_string(),
            year,
        })
    }

    pub fn folder_name(&self) -> String {
        format!("{} ({})", self.name, self.year)
    }
}

/// `<movies_dir>/<Name (Year)>/<Name>.nfo`
pub fn movie_descriptor_path(movies_dir: &Path, folder: &MovieFolder) -> PathBuf {
    movies_dir
        .join(folder.folder_name())
        .join(format!("{}.nfo", folder.name))
}

/// `<tvshows_dir>/<Name>/tvshow.nfo`
pub fn tvshow_descriptor_path(tvshows_dir: &Path, show: &str) -> PathBuf {
    tvshows_dir.join(show).join("tvshow.nfo")
}

/// Cover image path next to a descriptor
pub fn landscape_path(descriptor: &Path) -> PathBuf {
    descriptor
        .parent()
        .map(|dir| dir.join(LANDSCAPE_FILE))
        .unwrap_or_else(|| PathBuf::from(LANDSCAPE_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_movie_folder() {
        let folder = MovieFolder::parse("Alice in Wonderland (2010)").unwrap();
        assert_eq!(folder.name, "Alice in Wonderland");
        assert_eq!(folder.year, 2010);
        assert_eq!(folder.folder_name(), "Alice in Wonderland (2010)");

        let folder = MovieFolder::parse("Ocean's Eleven (Remake) (2001)").unwrap();
        assert_eq!(folder.name, "Ocean's Eleven (Remake)");
    }

    #[test]
    fn test_parse_movie_folder_invalid() {
        assert!(MovieFolder::parse("Deliverance").is_err());
        assert!(MovieFolder::parse("Deliverance (72)").is_err());
        assert!(MovieFolder::parse(" (1972)").is_err());
        assert!(MovieFolder::parse("Deliverance (19x2)").is_err());
    }

    #[test]
    fn test_descriptor_paths() {
        let folder = MovieFolder::parse("Deliverance (1972)").unwrap();
        assert_eq!(
            movie_descriptor_path(Path::new("/media/Movies"), &folder),
            PathBuf::from("/media/Movies/Deliverance (1972)/Deliverance.nfo")
        );
        assert_eq!(
            tvshow_descriptor_path(Path::new("/media/TV"), "Blood Drive"),
            PathBuf::from("/media/TV/Blood Drive/tvshow.nfo")
        );
        assert_eq!(
            landscape_path(Path::new("/media/TV/Blood Drive/tvshow.nfo")),
            PathBuf::from("/media/TV/Blood Drive/landscape.jpg")
        );
    }

    #[test]
    fn test_root_tags() {
        assert_eq!(DescriptorKind::TvShow.root_tag(), "tvshow");
        assert_eq!(DescriptorKind::from_root_tag("movie"), Some(DescriptorKind::Movie));
        assert_eq!(DescriptorKind::from_root_tag("episodedetails"), None);
    }
}

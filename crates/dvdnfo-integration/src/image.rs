//! Cover image download

use dvdnfo_core::error::{DvdNfoError, Result};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::http::{http_error, HttpPageLoader};

/// Largest cover image accepted
const MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

/// Fetch `url` and write it to `dest`, returning the byte count.
///
/// The body is read completely before `dest` is touched, so a failed
/// transfer leaves an existing image in place.
pub fn download_image(loader: &HttpPageLoader, url: &str, dest: &Path) -> Result<u64> {
    let response = loader
        .agent()
        .get(url)
        .timeout(loader.settings().page_timeout)
        .call()
        .map_err(|e| http_error(url, e))?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_IMAGE_BYTES)
        .read_to_end(&mut bytes)
        .map_err(|e| DvdNfoError::Http {
            url: url.to_string(),
            message: format!("Failed to read image: {}", e),
        })?;

    if bytes.is_empty() {
        return Err(DvdNfoError::Http {
            url: url.to_string(),
            message: "empty image body".to_string(),
        });
    }

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(dest, &bytes)?;

    info!("Saved {} bytes from {} to {:?}", bytes.len(), url, dest);
    Ok(bytes.len() as u64)
}

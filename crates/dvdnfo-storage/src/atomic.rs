//! Atomic file replacement

use dvdnfo_core::error::{DvdNfoError, Result};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Hidden sibling used while writing `path`
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

/// Write `contents` to a temp file next to `path`, then rename over it
pub(crate) fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let temp = temp_path(path);
    let file = fs::File::create(&temp).map_err(|e| {
        DvdNfoError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to create temp file: {}", e),
        ))
    })?;
    let mut writer = BufWriter::new(file);
    writer.write_all(contents)?;
    writer.flush()?;
    drop(writer);

    fs::rename(&temp, path).map_err(|e| {
        let _ = fs::remove_file(&temp);
        DvdNfoError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to rename temp file: {}", e),
        ))
    })?;

    debug!("Wrote {:?}", path);
    Ok(())
}

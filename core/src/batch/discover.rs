use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::types::EngineError;

/// Every regular file under `dir`, recursively, in sorted order.
///
/// No extension filter: files the decoder rejects are skipped later with a diagnostic.
/// Unreadable entries are logged and left out.
pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>, EngineError> {
    if !dir.is_dir() {
        return Err(EngineError::Config(format!("{} is not a directory", dir.display())));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        match entry {
            Ok(e) if e.file_type().is_file() => files.push(e.into_path()),
            Ok(_) => {}
            Err(e) => debug!("[DISCOVER] skipping unreadable entry: {e}"),
        }
    }

    debug!("[DISCOVER] {} files under {}", files.len(), dir.display());
    Ok(files)
}

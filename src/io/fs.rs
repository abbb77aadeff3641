//! Filesystem helpers shared by the file-backed stores

use crate::types::LedgerError;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Replace `path` with `contents` so readers see either the old or the new file
///
/// Writes a sibling temp file, syncs it, then renames it over `path`.
/// Parent directories are created as needed.
pub fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), LedgerError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| LedgerError::persistence(parent, &e))?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = Path::new(&temp_name);

    let mut file = File::create(temp_path).map_err(|e| LedgerError::persistence(temp_path, &e))?;
    file.write_all(contents)
        .and_then(|()| file.sync_all())
        .map_err(|e| LedgerError::persistence(temp_path, &e))?;

    fs::rename(temp_path, path).map_err(|e| LedgerError::persistence(path, &e))
}

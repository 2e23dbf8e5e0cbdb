//! File system utilities.

use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes content to a file atomically using a temp file and rename.
///
/// This prevents file corruption if the process is interrupted (e.g., Ctrl+C).
/// The temp file is created in the same directory as the target file to ensure
/// the rename operation is atomic (same filesystem).
///
/// # Errors
///
/// Returns an error if the temp file cannot be written or renamed.
pub fn atomic_write(path: &Path, content: &str) -> std::io::Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let temp_path = parent.join(format!(".{file_name}.tmp"));

    // Write to temp file first
    fs::write(&temp_path, content)?;

    // Atomic rename (same filesystem)
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    Ok(())
}

/// Copies `path` next to itself as `<path>.backup_<YYYYmmdd_HHMMSS>`.
///
/// Returns the backup path so it can be reported for manual rollback.
pub fn create_backup(path: &Path) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let mut backup = path.as_os_str().to_owned();
    backup.push(format!(".backup_{timestamp}"));
    let backup = PathBuf::from(backup);

    fs::copy(path, &backup).with_context(|| {
        format!(
            "Failed to create backup of {} at {}",
            path.display(),
            backup.display()
        )
    })?;

    Ok(backup)
}

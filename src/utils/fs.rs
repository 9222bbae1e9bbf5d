//! File system helpers shared across commands.
//!
//! Writes go through a write-then-rename strategy so a crashed or failed
//! compile never leaves a half-written artifact behind - the compile
//! contract promises "no partial output file" on failure.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Ensures a directory exists, creating it and all parents if necessary.
///
/// Returns an error if the path exists but is not a directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Atomically writes a string to a file.
///
/// The content is first written to a temporary file in the same directory,
/// synced, then renamed over the target path. Readers never observe a
/// partially written file.
pub fn safe_write(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    ensure_dir(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write temporary file for {}", path.display()))?;
    tmp.as_file().sync_all().ok();
    tmp.persist(path).with_context(|| format!("Failed to persist file: {}", path.display()))?;
    Ok(())
}

/// Replaces every character outside `[A-Za-z0-9]` with an underscore.
///
/// Compute context names are free-form ("SAS Job Execution compute context")
/// but exported descriptors need a predictable file name.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars().map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn ensure_dir_creates_nested_directories() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a/b/c");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // Idempotent
        ensure_dir(&nested).unwrap();
    }

    #[test]
    fn ensure_dir_rejects_file_at_path() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        assert!(ensure_dir(&file).is_err());
    }

    #[test]
    fn safe_write_creates_parent_and_file() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("out/services/example.sas");
        safe_write(&target, "%put hello;").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "%put hello;");
    }

    #[test]
    fn safe_write_replaces_existing_content() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("file.sas");
        safe_write(&target, "first").unwrap();
        safe_write(&target, "second").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "second");
    }

    #[test]
    fn sanitize_file_name_replaces_special_characters() {
        assert_eq!(
            sanitize_file_name("SAS Job Execution compute context"),
            "SAS_Job_Execution_compute_context"
        );
        assert_eq!(sanitize_file_name("already_ok123"), "already_ok123");
    }

}

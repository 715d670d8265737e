//! Filesystem helpers shared by the pipelines

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Recursively copy `src` into `dst`, creating `dst` if needed
///
/// Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| walk_error(src, e))?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| Error::file_operation("create directory", &target, e))?;
        } else {
            copy_file(entry.path(), &target)?;
            copied += 1;
        }
    }

    debug!(
        "Copied {} files from {} to {}",
        copied,
        src.display(),
        dst.display()
    );
    Ok(copied)
}

/// Copy one file, creating the destination's parent directories
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::file_operation("create directory", parent, e))?;
        }
    }
    fs::copy(src, dst).map_err(|e| Error::file_operation("copy", src, e))?;
    Ok(())
}

/// Remove a directory tree if it exists
///
/// Returns whether anything was removed.
pub fn remove_dir_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::file_operation("remove", path, e)),
    }
}

/// Remove a directory tree if present, then create it empty
pub fn recreate_dir(path: &Path) -> Result<()> {
    remove_dir_if_exists(path)?;
    fs::create_dir_all(path).map_err(|e| Error::file_operation("create directory", path, e))
}

/// First regular file directly inside `dir` whose name ends with `suffix`
///
/// Candidates are ordered by file name so the choice does not depend on
/// directory iteration order.
pub fn find_first_with_suffix(dir: &Path, suffix: &str) -> Result<Option<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::file_operation("read directory", dir, e))?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::file_operation("read directory", dir, e))?;
        let path = entry.path();
        let is_match = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(suffix));
        if is_match && path.is_file() {
            candidates.push(path);
        }
    }

    candidates.sort();
    Ok(candidates.into_iter().next())
}

/// Whether `path` has one of `extensions` (case-insensitive, without dot)
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)))
}

/// Convert a walkdir error into a path-bound file error
pub fn walk_error(root: &Path, err: walkdir::Error) -> Error {
    let path = err.path().unwrap_or(root).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
    Error::file_operation("walk", &path, source)
}

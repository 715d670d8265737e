//! File size and SHA-256 digests

use corekit_core::{Error, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io;
use std::path::Path;

/// Size and checksum of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDigest {
    /// File name without directory
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Lowercase hex SHA-256
    pub sha256: String,
}

/// Calculates size and SHA-256 checksum of a file.
pub fn digest_file(path: &Path) -> Result<FileDigest> {
    let mut file = File::open(path).map_err(|e| Error::file_operation("open", path, e))?;

    let mut hasher = Sha256::new();
    let size = io::copy(&mut file, &mut hasher)
        .map_err(|e| Error::file_operation("checksum", path, e))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(FileDigest {
        name,
        size,
        sha256: format!("{:x}", hasher.finalize()),
    })
}

/// Digests of the regular files directly inside `dir`, sorted by name
///
/// Subdirectories are not descended into.
pub fn digest_directory(dir: &Path) -> Result<Vec<FileDigest>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::file_operation("read directory", dir, e))?;

    let mut digests = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::file_operation("read directory", dir, e))?;
        let path = entry.path();
        if path.is_file() {
            digests.push(digest_file(&path)?);
        }
    }

    digests.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(digests)
}

//! License header insertion for generated sources

use camino::Utf8Path;
use corekit_core::fs::{has_extension, walk_error};
use corekit_core::{Error, Result};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Source extensions that receive a license header
const SOURCE_EXTENSIONS: &[&str] = &["c", "h", "cpp", "hpp"];

/// First-line prefixes of headers already carrying a license
pub const LICENSE_PREFIXES: &[&str] = &[
    "/***************************************************************************//**",
    "/* --------------------------------------------------------------------------",
    "/*",
];

/// Header prepended to unlicensed sources
pub const MIT_LICENSE: &str = "/*
 * This file is part of the Silicon Labs Arduino Core
 *
 * The MIT License (MIT)
 *
 * Copyright 2023 Silicon Laboratories Inc. www.silabs.com
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the \"Software\"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in
 * all copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
 * THE SOFTWARE.
 */

";

/// Files touched or skipped by a licensing pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LicenseReport {
    /// Files that received the header
    pub licensed: Vec<PathBuf>,
    /// Source files that already carried a license
    pub already_licensed: usize,
    /// Empty source files
    pub skipped_empty: Vec<PathBuf>,
    /// Source files that are not valid UTF-8
    pub skipped_non_utf8: Vec<PathBuf>,
}

/// Whether the first line of `text` opens a known license header
pub fn has_license(text: &str) -> bool {
    let first = text.lines().next().unwrap_or_default().trim_start();
    LICENSE_PREFIXES.iter().any(|prefix| first.starts_with(prefix))
}

/// Prepend the MIT header to every unlicensed source under `dir`
///
/// Running the pass twice leaves files unchanged after the first run. A
/// missing directory yields an empty report.
pub fn apply_license(dir: &Utf8Path) -> Result<LicenseReport> {
    let mut report = LicenseReport::default();

    if !dir.is_dir() {
        debug!("Skipping licensing of missing directory {}", dir);
        return Ok(report);
    }

    let walker = WalkDir::new(dir).sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|e| walk_error(dir.as_std_path(), e))?;
        let path = entry.path();
        if !entry.file_type().is_file() || !has_extension(path, SOURCE_EXTENSIONS) {
            continue;
        }

        let bytes = fs::read(path).map_err(|e| Error::file_operation("read", path, e))?;
        if bytes.is_empty() {
            report.skipped_empty.push(path.to_path_buf());
            continue;
        }

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(_) => {
                debug!("Skipping non-UTF-8 file {}", path.display());
                report.skipped_non_utf8.push(path.to_path_buf());
                continue;
            }
        };

        if has_license(&text) {
            report.already_licensed += 1;
            continue;
        }

        info!("Applying license to: {}", path.display());
        let mut licensed = String::with_capacity(MIT_LICENSE.len() + text.len());
        licensed.push_str(MIT_LICENSE);
        licensed.push_str(&text);
        fs::write(path, licensed).map_err(|e| Error::file_operation("write", path, e))?;
        report.licensed.push(path.to_path_buf());
    }

    Ok(report)
}

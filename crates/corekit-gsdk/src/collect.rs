//! Output collection
//!
//! Assembles the per-variant output directory from the generation tree.
//! Full-source variants get whole subtrees; prebuilt variants get the
//! archives, a flattened header tree, the linker script and the license.

use crate::layout::{GsdkLayout, LINKER_SCRIPT};
use camino::{Utf8Path, Utf8PathBuf};
use corekit_core::fs::{copy_file, copy_tree, recreate_dir, remove_dir_if_exists, walk_error};
use corekit_core::{Error, PlatformConfig, ProtocolStack, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Header path fragments routed into a dedicated subfolder
///
/// Checked in order; the first fragment contained in the path wins.
pub const HEADER_ROUTES: &[(&str, &str)] = &[
    ("include/psa", "psa"),
    ("include/mbedtls", "mbedtls"),
    ("include/flatbuffers", "flatbuffers"),
    ("gemmlowp/fixedpoint", "fixedpoint"),
    ("gemmlowp/internal", "internal"),
];

/// Source files removed from copied Matter subtrees
const STRIPPED_SUFFIXES: &[&str] = &[".c", ".cpp", ".S"];

/// Subfolder of `include/` a header belongs to, or `None` for the root
pub fn route_header(path: &Path) -> Option<&'static str> {
    let normalized = path.to_string_lossy().replace('\\', "/");
    HEADER_ROUTES
        .iter()
        .find(|(fragment, _)| normalized.contains(fragment))
        .map(|(_, subfolder)| *subfolder)
}

/// A file not copied because its destination name was already taken
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    /// Destination that kept its first file
    pub destination: PathBuf,
    /// Source that was not copied
    pub skipped: PathBuf,
}

/// What the collector produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectReport {
    /// Output directory
    pub output_dir: PathBuf,
    /// Archive file names copied into the output root
    pub archives: Vec<String>,
    /// Header files copied into `include/`
    pub headers: usize,
    /// Files removed from copied Matter subtrees
    pub stripped: usize,
    /// Name collisions in flattened destinations
    pub collisions: Vec<Collision>,
    /// Mirror destination, when mirrored
    pub mirrored_to: Option<PathBuf>,
}

/// Copies files into a flat directory without overwriting unrelated files
struct FlatCopier<'a> {
    report: &'a mut CollectReport,
}

impl FlatCopier<'_> {
    /// Copy `source` to `destination`; returns whether it was copied
    ///
    /// An existing destination with identical contents is left alone; one
    /// with different contents is kept and the collision reported.
    fn place(&mut self, source: &Path, destination: PathBuf) -> Result<bool> {
        if destination.exists() {
            let existing =
                fs::read(&destination).map_err(|e| Error::file_operation("read", &destination, e))?;
            let incoming = fs::read(source).map_err(|e| Error::file_operation("read", source, e))?;
            if existing != incoming {
                warn!(
                    "Not overwriting {} with {}",
                    destination.display(),
                    source.display()
                );
                self.report.collisions.push(Collision {
                    destination,
                    skipped: source.to_path_buf(),
                });
            }
            return Ok(false);
        }

        copy_file(source, &destination)?;
        Ok(true)
    }
}

fn sorted_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn file_name_ends_with(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(suffix))
}

fn copy_subtree(layout: &GsdkLayout, output_dir: &Utf8Path, folder: &str) -> Result<()> {
    let src = layout.gen_dir().join(folder);
    let copied = copy_tree(src.as_std_path(), output_dir.join(folder).as_std_path())?;
    debug!("Copied {} files from {}", copied, src);
    Ok(())
}

/// Assemble full-source output
pub fn collect_full_source(layout: &GsdkLayout, platform: &PlatformConfig) -> Result<CollectReport> {
    let output_dir = layout.output_dir(platform);
    recreate_dir(output_dir.as_std_path())?;

    let gecko_sdk = layout.gecko_sdk_folder();
    let mut folders = vec!["autogen".to_string(), "config".to_string(), gecko_sdk.clone()];
    if platform.is_matter() {
        folders.push(layout.matter_folder());
        folders.push("include".to_string());
    }
    for folder in &folders {
        copy_subtree(layout, &output_dir, folder)?;
    }

    info!("Applying license to GSDK folder...");
    copy_file(
        layout.license_file().as_std_path(),
        output_dir.join(&gecko_sdk).join("LICENSE").as_std_path(),
    )?;

    Ok(CollectReport {
        output_dir: output_dir.into_std_path_buf(),
        ..Default::default()
    })
}

/// Assemble prebuilt output
///
/// Fails with [`Error::ArchiveMissing`] before touching the output directory
/// when the build did not produce the archive.
pub fn collect_prebuilt(layout: &GsdkLayout, platform: &PlatformConfig) -> Result<CollectReport> {
    let archive = layout.archive();
    if !archive.is_file() {
        return Err(Error::ArchiveMissing {
            path: archive.into_std_path_buf(),
        });
    }

    info!("Copying built files...");
    let output_dir = layout.output_dir(platform);
    recreate_dir(output_dir.as_std_path())?;

    let mut report = CollectReport {
        output_dir: output_dir.clone().into_std_path_buf(),
        ..Default::default()
    };

    let gen_files = sorted_files(layout.gen_dir().as_std_path())?;

    {
        let mut copier = FlatCopier {
            report: &mut report,
        };
        let mut archives = Vec::new();
        for file in gen_files.iter().filter(|f| file_name_ends_with(f, ".a")) {
            let Some(name) = file.file_name() else { continue };
            if copier.place(file, output_dir.as_std_path().join(name))? {
                archives.push(name.to_string_lossy().into_owned());
            }
        }
        copier.report.archives = archives;
    }

    if platform.is_matter() {
        collect_matter_tree(layout, &output_dir, &mut report)?;
    } else {
        collect_headers(layout, platform, &output_dir, &gen_files, &mut report)?;
    }

    copy_file(
        layout.gen_dir().join(LINKER_SCRIPT).as_std_path(),
        output_dir.join("linkerfile.ld").as_std_path(),
    )?;

    info!("Applying license to GSDK folder...");
    copy_file(
        layout.license_file().as_std_path(),
        output_dir.join("LICENSE").as_std_path(),
    )?;

    Ok(report)
}

fn collect_headers(
    layout: &GsdkLayout,
    platform: &PlatformConfig,
    output_dir: &Utf8Path,
    gen_files: &[PathBuf],
    report: &mut CollectReport,
) -> Result<()> {
    let include_dir = output_dir.join("include").into_std_path_buf();
    fs::create_dir_all(&include_dir)
        .map_err(|e| Error::file_operation("create directory", &include_dir, e))?;

    let mut copier = FlatCopier { report };
    let mut count = 0;

    for header in gen_files.iter().filter(|f| file_name_ends_with(f, ".h")) {
        let Some(name) = header.file_name() else { continue };
        let destination = match route_header(header) {
            Some(subfolder) => include_dir.join(subfolder).join(name),
            None => include_dir.join(name),
        };
        if copier.place(header, destination)? {
            count += 1;
        }
    }

    if platform.protocol_stack == ProtocolStack::BleArduino {
        let hci_dir = layout.ble_hci_include_dir();
        if hci_dir.is_dir() {
            for header in sorted_files(hci_dir.as_std_path())?
                .iter()
                .filter(|f| file_name_ends_with(f, ".h"))
            {
                let Some(name) = header.file_name() else { continue };
                if copier.place(header, include_dir.join(name))? {
                    count += 1;
                }
            }
        } else {
            warn!("BLE HCI header folder {} not found", hci_dir);
        }
    }

    info!("Copied {} header files", count);
    copier.report.headers = count;
    Ok(())
}

fn collect_matter_tree(
    layout: &GsdkLayout,
    output_dir: &Utf8Path,
    report: &mut CollectReport,
) -> Result<()> {
    let folders = [
        "autogen".to_string(),
        "config".to_string(),
        layout.gecko_sdk_folder(),
        layout.matter_folder(),
        "include".to_string(),
    ];
    for folder in &folders {
        copy_subtree(layout, output_dir, folder)?;
    }

    let mut stripped = 0;
    for folder in &folders {
        let root = output_dir.join(folder);
        for file in sorted_files(root.as_std_path())? {
            if STRIPPED_SUFFIXES.iter().any(|s| file_name_ends_with(&file, s)) {
                fs::remove_file(&file).map_err(|e| Error::file_operation("remove", &file, e))?;
                stripped += 1;
            }
        }
    }

    let headers = folders
        .iter()
        .map(|folder| sorted_files(output_dir.join(folder).as_std_path()))
        .collect::<Result<Vec<_>>>()?
        .iter()
        .flatten()
        .filter(|f| file_name_ends_with(f, ".h"))
        .count();

    debug!("Stripped {} source files from Matter output", stripped);
    report.stripped = stripped;
    report.headers = headers;
    Ok(())
}

/// Replace the variant's folder in the shared variants tree with the output
pub fn mirror_output(layout: &GsdkLayout, platform: &PlatformConfig) -> Result<Utf8PathBuf> {
    let source = layout.output_dir(platform);
    let destination = layout.mirror_dir(platform);

    info!("Mirroring {} to {}", source, destination);
    remove_dir_if_exists(destination.as_std_path())?;
    copy_tree(source.as_std_path(), destination.as_std_path())?;
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_header() {
        let cases = [
            ("gen/gecko_sdk_4.4.0/util/third_party/mbedtls/include/psa/crypto.h", Some("psa")),
            ("gen/gecko_sdk_4.4.0/util/third_party/mbedtls/include/mbedtls/ssl.h", Some("mbedtls")),
            ("gen/tflm/third_party/flatbuffers/include/flatbuffers/base.h", Some("flatbuffers")),
            ("gen/tflm/third_party/gemmlowp/fixedpoint/fixedpoint.h", Some("fixedpoint")),
            ("gen/tflm/third_party/gemmlowp/internal/detect_platform.h", Some("internal")),
            ("gen/autogen/sl_event_handler.h", None),
            ("gen/gecko_sdk_4.4.0/platform/emlib/inc/em_gpio.h", None),
        ];
        for (path, expected) in cases {
            assert_eq!(route_header(Path::new(path)), expected, "{}", path);
        }
    }

    #[test]
    fn test_route_header_windows_separators() {
        assert_eq!(
            route_header(Path::new("gen\\mbedtls\\include\\psa\\crypto.h")),
            Some("psa")
        );
    }
}

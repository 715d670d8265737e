//! Staging project files into the vendor SDK tree
//!
//! Every staged path is recorded together with the bytes it replaced, so
//! that [`Staging::restore`] can return the vendor tree to its previous
//! state even when staging stopped halfway.

use crate::layout::GsdkLayout;
use camino::{Utf8Path, Utf8PathBuf};
use corekit_core::{AdditionalFile, Error, PlatformConfig, Result};
use std::fs;
use tracing::{debug, info, warn};

/// One file written into the vendor tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Destination path
    pub path: Utf8PathBuf,

    /// Previous contents when staging overwrote an existing file
    pub original: Option<Vec<u8>>,
}

/// Record of files staged for one variant
#[derive(Debug, Default)]
pub struct Staging {
    files: Vec<StagedFile>,
}

impl Staging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Staged files in staging order
    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    /// Copy `source` to `target`, remembering what was there before
    pub fn stage_file(&mut self, source: &Utf8Path, target: Utf8PathBuf) -> Result<()> {
        let original = match fs::read(&target) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(Error::file_operation("read", target.as_std_path(), e)),
        };

        fs::copy(source, &target)
            .map_err(|e| Error::file_operation("stage", source.as_std_path(), e))?;
        debug!("Staged {} -> {}", source, target);

        self.files.push(StagedFile { path: target, original });
        Ok(())
    }

    /// Copy `source` into `dir`, keeping its file name
    pub fn stage_into(&mut self, source: &Utf8Path, dir: &Utf8Path) -> Result<()> {
        let name = source.file_name().ok_or_else(|| {
            Error::invalid_argument(format!("'{}' does not name a file", source))
        })?;
        self.stage_file(source, dir.join(name))
    }

    /// Remove staged files, restoring any contents they replaced
    ///
    /// Every file is attempted; the first error is returned at the end.
    pub fn restore(&mut self) -> Result<()> {
        let mut first_error = None;

        for staged in self.files.drain(..).rev() {
            let result = match &staged.original {
                Some(bytes) => fs::write(&staged.path, bytes)
                    .map_err(|e| Error::file_operation("restore", staged.path.as_std_path(), e)),
                None => match fs::remove_file(&staged.path) {
                    Ok(()) => Ok(()),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                    Err(e) => Err(Error::file_operation(
                        "remove",
                        staged.path.as_std_path(),
                        e,
                    )),
                },
            };

            if let Err(e) = result {
                warn!("{}", e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Stage the descriptor, additional files and Matter data model of a variant
///
/// Files staged before a failure stay recorded in `staging`.
pub fn stage_platform(
    staging: &mut Staging,
    layout: &GsdkLayout,
    platform: &PlatformConfig,
) -> Result<()> {
    let project_folder = layout.project_folder(platform);

    if let Some(matter) = &platform.matter {
        info!("Copying ZAP file...");
        staging.stage_file(Utf8Path::new(matter.zap_file), layout.matter_zap_target())?;
    }

    info!("Copying slcp file...");
    staging.stage_into(Utf8Path::new(platform.slcp_file), &project_folder)?;

    info!("Copying additional files...");
    for file in platform.additional_files {
        match file {
            AdditionalFile::Plain(source) => {
                staging.stage_into(Utf8Path::new(source), &project_folder)?
            }
            AdditionalFile::Targeted { source, target_dir } => {
                let dir = layout.gsdk_dir().join(target_dir);
                staging.stage_into(Utf8Path::new(source), &dir)?
            }
        }
    }

    Ok(())
}

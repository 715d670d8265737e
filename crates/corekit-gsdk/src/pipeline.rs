//! GSDK generation pipeline
//!
//! Runs one variant at a time through
//! stage -> generate -> patch -> build -> license -> collect -> cleanup.
//! Cleanup runs whether or not the earlier steps succeeded; the step error,
//! if any, is returned afterwards.

use crate::collect::{collect_full_source, collect_prebuilt, mirror_output, CollectReport};
use crate::layout::GsdkLayout;
use crate::license::{apply_license, LicenseReport};
use crate::patch::{
    chip_device_config_rules, mak_rules, makefile_rules, patch_file, zap_gen_config_rules,
    AppliedPatch,
};
use crate::stage::{stage_platform, Staging};
use camino::Utf8PathBuf;
use corekit_core::fs::{find_first_with_suffix, remove_dir_if_exists};
use corekit_core::process::run_step;
use corekit_core::{
    CommandOutcome, CommandRunner, CommandSpec, Error, PlatformConfig, Result, StepPolicy,
    ToolConfig,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Timeout of the project generator and of the build
pub const STEP_TIMEOUT: Duration = Duration::from_secs(180);

/// Options chosen on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Keep the generation directory after the run
    pub keep: bool,
    /// Mirror prebuilt outputs into the shared variants tree
    pub mirror: bool,
}

/// Summary of one variant's run
#[derive(Debug, Clone, Default)]
pub struct VariantReport {
    pub name: String,
    pub patches: Vec<AppliedPatch>,
    pub build: Option<CommandOutcome>,
    pub license: LicenseReport,
    pub collect: CollectReport,
}

/// Drives the pipeline for one or more variants
pub struct GsdkGenerator {
    layout: GsdkLayout,
    runner: Arc<dyn CommandRunner>,
    options: GenerateOptions,
    step_timeout: Duration,
}

impl GsdkGenerator {
    /// Create a generator
    pub fn new(config: ToolConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            layout: GsdkLayout::new(config),
            runner,
            options: GenerateOptions::default(),
            step_timeout: STEP_TIMEOUT,
        }
    }

    /// Set command-line options
    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the timeout for external steps
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = timeout;
        self
    }

    pub fn layout(&self) -> &GsdkLayout {
        &self.layout
    }

    /// Run every platform in order, aborting on the first failure
    pub async fn generate_all(&self, platforms: &[&PlatformConfig]) -> Result<Vec<VariantReport>> {
        let mut reports = Vec::with_capacity(platforms.len());
        for platform in platforms {
            reports.push(self.generate(platform).await?);
        }
        Ok(reports)
    }

    /// Run the pipeline for one platform
    pub async fn generate(&self, platform: &PlatformConfig) -> Result<VariantReport> {
        self.log_header(platform);

        let mut staging = Staging::new();
        let result = self.run_steps(platform, &mut staging).await;
        let cleanup = self.cleanup(&mut staging);

        match (result, cleanup) {
            (Ok(report), Ok(())) => {
                info!("Output location: {}", self.layout.output_dir(platform));
                info!("Finished!");
                Ok(report)
            }
            (Ok(_), Err(e)) => Err(e),
            (Err(e), cleanup) => {
                if let Err(cleanup_err) = cleanup {
                    error!("Cleanup after failure also failed: {}", cleanup_err);
                }
                Err(e)
            }
        }
    }

    fn log_header(&self, platform: &PlatformConfig) {
        info!("Name: {}", platform.name);
        info!("Board: {}", platform.board_opn);
        info!("Project file: {}", platform.slcp_file_name());
        info!("Protocol stack: {}", platform.protocol_stack);
        info!("Prebuild: {}", platform.prebuild);
        if let Some(matter) = &platform.matter {
            info!("Matter ZAP file: {}", matter.zap_file);
        }
        info!("GSDK dir: {}", self.layout.gsdk_dir());
        info!("Output dir: {}", self.layout.output_dir(platform));
    }

    async fn run_steps(
        &self,
        platform: &PlatformConfig,
        staging: &mut Staging,
    ) -> Result<VariantReport> {
        let mut report = VariantReport {
            name: platform.name.to_string(),
            ..Default::default()
        };

        stage_platform(staging, &self.layout, platform)?;
        self.generate_project(platform).await?;

        if platform.prebuild {
            report.patches.extend(self.patch_makefiles()?);
        }
        if let Some(matter) = &platform.matter {
            info!("Patching Matter configuration...");
            let device_rules = chip_device_config_rules(matter);
            report
                .patches
                .extend(patch_file(&self.layout.chip_device_config(), &device_rules)?);
            report
                .patches
                .extend(patch_file(&self.layout.zap_gen_config(), &zap_gen_config_rules())?);
        }

        report.build = Some(self.build_project().await?);

        let gen_dir = self.layout.gen_dir();
        let autogen = apply_license(&gen_dir.join("autogen"))?;
        let config = apply_license(&gen_dir.join("config"))?;
        report.license = merge_license_reports(autogen, config);

        report.collect = if platform.prebuild {
            collect_prebuilt(&self.layout, platform)?
        } else {
            collect_full_source(&self.layout, platform)?
        };

        if self.options.mirror {
            if platform.prebuild {
                let mirrored = mirror_output(&self.layout, platform)?;
                report.collect.mirrored_to = Some(mirrored.into_std_path_buf());
            } else {
                warn!(
                    "Mirroring applies to prebuilt variants only, skipping {}",
                    platform.name
                );
            }
        }

        Ok(report)
    }

    async fn generate_project(&self, platform: &PlatformConfig) -> Result<()> {
        info!("Starting SLC generation...");
        let gen_dir = self.layout.gen_dir();
        remove_dir_if_exists(gen_dir.as_std_path())?;

        let project = self
            .layout
            .project_folder(platform)
            .join(platform.slcp_file_name());
        let spec = CommandSpec::new("slc", self.step_timeout).args([
            "generate",
            "-o",
            "makefile",
            "-tlcn",
            "gcc",
            "-cp",
            "-s",
            self.layout.gsdk_dir().as_str(),
            "-p",
            project.as_str(),
            "-d",
            gen_dir.as_str(),
            "--with",
            platform.board_opn,
        ]);

        let outcome = run_step(self.runner.as_ref(), &spec, StepPolicy::Fatal).await?;
        info!(
            "SLC generation finished in {:.1}s",
            outcome.duration.as_secs_f64()
        );
        Ok(())
    }

    fn generated_file(&self, suffix: &str) -> Result<Utf8PathBuf> {
        let gen_dir = self.layout.gen_dir();
        let found = find_first_with_suffix(gen_dir.as_std_path(), suffix)?.ok_or_else(|| {
            Error::GeneratedFileMissing {
                dir: gen_dir.clone().into_std_path_buf(),
                extension: suffix.to_string(),
            }
        })?;
        Utf8PathBuf::from_path_buf(found)
            .map_err(|p| Error::invalid_argument(format!("non UTF-8 path {}", p.display())))
    }

    fn patch_makefiles(&self) -> Result<Vec<AppliedPatch>> {
        info!("Patching the makefiles...");
        let mut applied = patch_file(&self.generated_file(".Makefile")?, &makefile_rules())?;
        applied.extend(patch_file(&self.generated_file(".mak")?, &mak_rules())?);
        info!("Patching finished");
        Ok(applied)
    }

    async fn build_project(&self) -> Result<CommandOutcome> {
        info!("Building the project...");
        let makefile = self.generated_file(".Makefile")?;
        let makefile_name = makefile.file_name().unwrap_or(makefile.as_str());

        let spec = CommandSpec::new("make", self.step_timeout)
            .args(["-f", makefile_name, "-j"])
            .arg(self.layout.config().make_jobs.to_string())
            .current_dir(self.layout.gen_dir());

        let outcome = run_step(self.runner.as_ref(), &spec, StepPolicy::Warn).await?;
        info!("Build finished in {:.1}s", outcome.duration.as_secs_f64());
        Ok(outcome)
    }

    fn cleanup(&self, staging: &mut Staging) -> Result<()> {
        info!("Cleaning up...");
        let restored = staging.restore();

        if self.options.keep {
            info!("Keeping {}", self.layout.gen_dir());
            return restored;
        }

        let removed = remove_dir_if_exists(self.layout.gen_dir().as_std_path()).map(|_| ());
        restored.and(removed)
    }
}

fn merge_license_reports(mut first: LicenseReport, second: LicenseReport) -> LicenseReport {
    first.licensed.extend(second.licensed);
    first.already_licensed += second.already_licensed;
    first.skipped_empty.extend(second.skipped_empty);
    first.skipped_non_utf8.extend(second.skipped_non_utf8);
    first
}

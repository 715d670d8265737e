//! Build-matrix regression runner
//!
//! Compiles every sketch of a test list for each of its variants with
//! `arduino-cli` and collects failures and warnings.

use crate::matrix::{TestList, Variant};
use corekit_core::{exit, CommandRunner, CommandSpec, Error, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Timeout of one compilation
pub const BUILD_TIMEOUT: Duration = Duration::from_secs(300);

/// Marker the compiler prints for every warning
const WARNING_MARKER: &str = "warning:";

/// Result of one sketch build
#[derive(Debug, Clone, Serialize)]
pub struct BuildOutcome {
    pub sketch: &'static str,
    pub variant: Variant,
    pub success: bool,
    pub warnings: bool,
    pub duration: Duration,
}

impl BuildOutcome {
    /// `<sketch> on '<board>' with '<stack>'`
    pub fn label(&self) -> String {
        format!(
            "{} on '{}' with '{}'",
            self.sketch, self.variant.board, self.variant.stack
        )
    }
}

/// Progress of a running matrix
#[derive(Debug, Clone, Copy)]
pub struct BuildProgress<'a> {
    /// 1-based build number
    pub current: usize,
    pub total: usize,
    pub sketch: &'a str,
    pub variant: Variant,
}

impl BuildProgress<'_> {
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            100
        } else {
            self.current * 100 / self.total
        }
    }
}

/// Totals of a matrix run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: Vec<String>,
    pub with_warnings: Vec<String>,
    pub duration: Duration,
}

impl BuildSummary {
    fn record(&mut self, outcome: &BuildOutcome) {
        self.total += 1;
        if outcome.success {
            self.successful += 1;
        } else {
            self.failed.push(outcome.label());
        }
        if outcome.warnings {
            self.with_warnings.push(outcome.label());
        }
    }

    /// Whether every build succeeded without warnings
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.with_warnings.is_empty()
    }

    /// Process exit status for this summary
    pub fn exit_code(&self) -> i32 {
        if self.is_clean() {
            0
        } else {
            exit::TESTS_FAILED
        }
    }
}

/// Runs `arduino-cli compile` over a test list
pub struct BuildMatrix {
    runner: Arc<dyn CommandRunner>,
    sketch_root: PathBuf,
    timeout: Duration,
}

impl BuildMatrix {
    /// Sketch paths are resolved relative to `sketch_root`
    pub fn new(runner: Arc<dyn CommandRunner>, sketch_root: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            sketch_root: sketch_root.into(),
            timeout: BUILD_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Compile one sketch for one variant
    ///
    /// A timeout counts as a failed build; a compiler that cannot be started
    /// aborts the run.
    pub async fn build(&self, sketch: &'static str, variant: Variant) -> Result<BuildOutcome> {
        let spec = CommandSpec::new("arduino-cli", self.timeout)
            .args(["compile", sketch, "-b"])
            .arg(variant.fqbn())
            .args(["--warnings", "all"])
            .current_dir(&self.sketch_root);

        let (success, warnings, duration) = match self.runner.run(&spec).await {
            Ok(outcome) => {
                let warnings = outcome.stderr.contains(WARNING_MARKER);
                if !outcome.success() {
                    warn!("Build failed!\n{}", outcome.tail());
                } else if warnings {
                    info!("Build successful with warnings!");
                } else {
                    info!("Build successful!");
                }
                (outcome.success(), warnings, outcome.duration)
            }
            Err(Error::CommandTimeout { timeout_secs, .. }) => {
                warn!("Build timed out after {}s", timeout_secs);
                (false, false, self.timeout)
            }
            Err(e) => return Err(e),
        };

        Ok(BuildOutcome {
            sketch,
            variant,
            success,
            warnings,
            duration,
        })
    }

    /// Build every entry of `list`, reporting progress before each build
    pub async fn run<F>(&self, list: TestList, mut on_build: F) -> Result<BuildSummary>
    where
        F: FnMut(BuildProgress<'_>),
    {
        let total = list.build_count();
        let started = std::time::Instant::now();
        let mut summary = BuildSummary::default();

        for (sketch, variants) in list.entries() {
            for variant in variants {
                let progress = BuildProgress {
                    current: summary.total + 1,
                    total,
                    sketch,
                    variant: *variant,
                };
                info!(
                    "[{}/{}] ({}%) Building '{}' for '{}'",
                    progress.current,
                    total,
                    progress.percent(),
                    sketch,
                    variant.fqbn()
                );
                on_build(progress);

                let outcome = self.build(sketch, *variant).await?;
                summary.record(&outcome);
            }
        }

        summary.duration = started.elapsed();
        Ok(summary)
    }
}

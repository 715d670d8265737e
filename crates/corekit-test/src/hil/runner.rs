//! Drives the testcases over every board and protocol stack

use super::io::HilIo;
use super::testcase::{TestContext, Testcase, TestcaseOutcome};
use super::{count_tests, HilTarget};
use crate::matrix::{board_fqbn, board_stacks, Variant, ALL_VARIANTS};
use corekit_core::{exit, CommandRunner, CommandSpec, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Timeout of compile, upload and bootloader burn
pub const HIL_COMMAND_TIMEOUT: Duration = Duration::from_secs(300);

/// Testcase about to run
#[derive(Debug, Clone, Copy)]
pub struct HilProgress<'a> {
    /// 1-based run number across all boards
    pub current: usize,
    pub total: usize,
    pub testcase: Testcase,
    pub variant: Variant,
    pub port: &'a str,
}

/// Results of one board
#[derive(Debug, Clone, Serialize)]
pub struct BoardReport {
    pub target: HilTarget,
    pub completed: usize,
    pub successful: usize,
    pub skipped: usize,
    pub failing: Vec<String>,
}

impl BoardReport {
    fn new(target: &HilTarget) -> Self {
        Self {
            target: target.clone(),
            completed: 0,
            successful: 0,
            skipped: 0,
            failing: Vec::new(),
        }
    }

    /// Every testcase counted as run and failed
    fn all_failed(target: &HilTarget, count: usize) -> Self {
        Self {
            completed: count,
            failing: vec![format!("ALL TESTS ON '{}'", target.board)],
            ..Self::new(target)
        }
    }
}

/// Results of a whole run
#[derive(Debug, Clone, Default, Serialize)]
pub struct HilSummary {
    pub boards: Vec<BoardReport>,
    pub duration: Duration,
}

impl HilSummary {
    pub fn completed(&self) -> usize {
        self.boards.iter().map(|b| b.completed).sum()
    }

    pub fn successful(&self) -> usize {
        self.boards.iter().map(|b| b.successful).sum()
    }

    pub fn failed(&self) -> usize {
        self.completed() - self.successful()
    }

    pub fn failing(&self) -> impl Iterator<Item = &str> {
        self.boards
            .iter()
            .flat_map(|b| b.failing.iter().map(String::as_str))
    }

    /// Process exit status for this summary
    pub fn exit_code(&self) -> i32 {
        if self.failed() == 0 {
            0
        } else {
            exit::TESTS_FAILED
        }
    }
}

/// Runs HIL testcases against attached boards
pub struct HilRunner {
    runner: Arc<dyn CommandRunner>,
    io: Arc<dyn HilIo>,
    sketch_root: PathBuf,
    timeout: Duration,
}

impl HilRunner {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        io: Arc<dyn HilIo>,
        sketch_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            io,
            sketch_root: sketch_root.into(),
            timeout: HIL_COMMAND_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run every board in order
    pub async fn run<F>(&self, targets: &[HilTarget], mut on_test: F) -> HilSummary
    where
        F: FnMut(HilProgress<'_>),
    {
        let started = Instant::now();
        let total = count_tests(targets);
        info!("Total number of tests: {}", total);

        let mut summary = HilSummary::default();
        for target in targets {
            let report = self
                .run_board(target, summary.completed(), total, &mut on_test)
                .await;
            summary.boards.push(report);
        }
        summary.duration = started.elapsed();
        summary
    }

    async fn burn_bootloader(&self, target: &HilTarget) -> Result<bool> {
        let programmer = if target.board == "nano_matter" {
            "openocd"
        } else {
            "commander"
        };
        info!("Burning bootloader for '{}'", target.board);

        let spec = CommandSpec::new("arduino-cli", self.timeout)
            .arg("burn-bootloader")
            .arg("--fqbn")
            .arg(board_fqbn(&target.board))
            .args(["-P", programmer, "-p", target.port.as_str()]);
        let outcome = self.runner.run(&spec).await?;
        if !outcome.success() {
            warn!("Bootloader burn failed!\n{}", outcome.tail());
        }
        Ok(outcome.success())
    }

    async fn run_board<F>(
        &self,
        target: &HilTarget,
        offset: usize,
        total: usize,
        on_test: &mut F,
    ) -> BoardReport
    where
        F: FnMut(HilProgress<'_>),
    {
        let variants: Vec<Variant> = ALL_VARIANTS
            .iter()
            .filter(|v| v.board == target.board)
            .copied()
            .collect();
        let testcase_count = variants.len() * Testcase::ALL.len();
        info!(
            "Board: '{}', port: '{}', variants: {:?}",
            target.board,
            target.port,
            board_stacks(&target.board)
        );

        if let Err(e) = self.io.check_port(&target.port).await {
            error!("Error opening serial port: {}", e);
            return BoardReport::all_failed(target, testcase_count);
        }

        match self.burn_bootloader(target).await {
            Ok(true) => {}
            Ok(false) => return BoardReport::all_failed(target, testcase_count),
            Err(e) => {
                error!("{}", e);
                return BoardReport::all_failed(target, testcase_count);
            }
        }

        let mut report = BoardReport::new(target);
        for variant in variants {
            let ctx = TestContext {
                runner: self.runner.as_ref(),
                io: self.io.as_ref(),
                sketch_root: &self.sketch_root,
                variant,
                port: &target.port,
                timeout: self.timeout,
            };

            for testcase in Testcase::ALL {
                on_test(HilProgress {
                    current: offset + report.completed + 1,
                    total,
                    testcase,
                    variant,
                    port: &target.port,
                });

                let outcome = testcase.run(&ctx).await;
                report.completed += 1;
                match &outcome {
                    TestcaseOutcome::Passed => {
                        info!("Testcase '{}' successful on '{}'", testcase, variant);
                        report.successful += 1;
                    }
                    TestcaseOutcome::Skipped => {
                        info!("Testcase '{}' skipped on '{}'", testcase, variant);
                        report.successful += 1;
                        report.skipped += 1;
                    }
                    TestcaseOutcome::Failed { reason } => {
                        warn!("Testcase '{}' failed on '{}': {}", testcase, variant, reason);
                        report.failing.push(format!("'{}' on '{}'", testcase, variant));
                    }
                }
            }
        }
        report
    }
}

//! HIL command - runs the hardware-in-loop testcases

use anyhow::{Context, Result};
use console::style;
use corekit_core::{tools, SystemRunner};
use corekit_test::hil::count_tests;
use corekit_test::{parse_targets, HardwareIo, HilRunner, HilSummary, HilTarget};
use owo_colors::OwoColorize;
use std::path::Path;
use std::sync::Arc;

use crate::cli::HilArgs;
use crate::output;

fn targets(args: &HilArgs) -> Result<Vec<HilTarget>> {
    match &args.port {
        Some(port) => Ok(vec![HilTarget::new(&args.target, port)?]),
        None if Path::new(&args.target).is_file() => {
            let text = std::fs::read_to_string(&args.target)
                .with_context(|| format!("Failed to read {}", args.target))?;
            Ok(parse_targets(&text)?)
        }
        None => Err(corekit_core::Error::invalid_argument(format!(
            "'{}' is not a config file; pass '<board> <port>' or a file with one board per line",
            args.target
        ))
        .into()),
    }
}

pub async fn run(args: HilArgs) -> Result<i32> {
    let targets = targets(&args)?;
    tools::preflight("hil")?;

    for target in &targets {
        output::kv(&target.board, &target.port);
    }

    let runner = HilRunner::new(
        Arc::new(SystemRunner),
        Arc::new(HardwareIo),
        args.sketch_root.as_std_path(),
    );
    let pb = output::progress_bar(count_tests(&targets) as u64, "");
    let summary = runner
        .run(&targets, |progress| {
            pb.set_position(progress.current.saturating_sub(1) as u64);
            pb.set_message(format!(
                "{} on {} ({})",
                progress.testcase, progress.variant, progress.port
            ));
        })
        .await;
    pb.finish_and_clear();

    print_summary(&summary);
    Ok(summary.exit_code())
}

fn print_summary(summary: &HilSummary) {
    output::header("HIL summary");
    for board in &summary.boards {
        output::kv(
            &board.target.board,
            &format!(
                "{}/{} passed, {} skipped",
                board.successful, board.completed, board.skipped
            ),
        );
    }
    output::kv("Completed", &summary.completed().to_string());
    output::kv("Successful", &summary.successful().green().to_string());
    output::kv("Failed", &summary.failed().red().to_string());
    output::kv("Duration", &output::duration(summary.duration));

    let failing: Vec<&str> = summary.failing().collect();
    output::list(style("Failing tests:").red(), &failing);

    println!();
    if summary.failed() == 0 {
        output::success("All HIL tests passed");
    } else {
        output::error("Some HIL tests failed");
    }
}

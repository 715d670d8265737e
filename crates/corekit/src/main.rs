//! corekit CLI - tooling for the Silicon Labs Arduino core
//!
//! This is the main entry point for the corekit command-line interface.

mod cli;
mod commands;
mod output;

use clap::error::ErrorKind;
use clap::Parser;
use console::style;
use corekit_core::exit;
use std::future::Future;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(exit::INVALID_INPUT);
        }
    };

    init_tracing(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(args).await,
        Commands::List(args) => commands::list::run(args),
        Commands::Provision(args) => commands::provision::run(args).await,
        Commands::Host(args) => commands::host::run(args).await,
        Commands::Checksum(args) => commands::checksum::run(args),
        Commands::BuildTest(args) => interruptible(commands::build_test::run(args)).await,
        Commands::Hil(args) => interruptible(commands::hil::run(args)).await,
        Commands::Bootstrap(args) => commands::bootstrap::run(args).await,
        Commands::Doctor(args) => commands::doctor::run(args).await,
    };

    let code = match result {
        Ok(code) => code,
        Err(e) => report_error(&e),
    };
    std::process::exit(code);
}

/// Run a long test command, exiting with [`exit::INTERRUPTED`] on Ctrl+C
async fn interruptible<F>(command: F) -> anyhow::Result<i32>
where
    F: Future<Output = anyhow::Result<i32>>,
{
    tokio::select! {
        result = command => result,
        _ = tokio::signal::ctrl_c() => {
            println!();
            output::warning("Interrupted");
            Ok(exit::INTERRUPTED)
        }
    }
}

/// Print an error and pick the exit status from its root cause
fn report_error(err: &anyhow::Error) -> i32 {
    output::error(&format!("{:#}", err));

    let Some(core) = err.downcast_ref::<corekit_core::Error>() else {
        return exit::FAILURE;
    };

    match core {
        corekit_core::Error::PlatformNotFound { available, .. } => {
            output::list(style("Available platform configurations:"), available);
        }
        corekit_core::Error::UnknownBoard { available, .. } => {
            output::list(style("Available boards:"), available);
        }
        corekit_core::Error::ToolNotFound { .. } => {
            output::info("Run 'corekit doctor' to see which tools are missing");
        }
        _ => {}
    }
    core.exit_code()
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

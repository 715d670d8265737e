//! Doctor command - check the system for the external tools corekit runs

use anyhow::Result;
use corekit_core::{exit, tools, SystemRunner};
use owo_colors::OwoColorize;

use crate::cli::DoctorArgs;
use crate::output;

pub async fn run(args: DoctorArgs) -> Result<i32> {
    let statuses = tools::locate_all();

    println!("{}", "External tools".bold());
    println!("{}", "─".repeat(40));

    for status in &statuses {
        let tool = &status.tool;
        let icon = if status.is_found() {
            "✓".green().to_string()
        } else {
            "✗".red().to_string()
        };

        let version = if args.versions && status.is_found() {
            tools::probe_version(&SystemRunner, tool)
                .await
                .map(|v| format!(" ({})", v))
                .unwrap_or_default()
        } else {
            String::new()
        };

        println!(
            "  {} {} [{}]{}",
            icon,
            tool.command,
            tool.purpose.dimmed(),
            version.dimmed()
        );
        if let Some(path) = &status.path {
            println!("      {}", path.display().dimmed());
        } else {
            println!(
                "      {}",
                format!("needed by: {}", tool.required_by.join(", ")).dimmed()
            );
        }
    }

    let missing = statuses.iter().filter(|s| !s.is_found()).count();
    println!();
    if missing == 0 {
        output::success("All external tools available");
        Ok(0)
    } else {
        output::warning(&format!("{} external tool(s) missing", missing));
        Ok(exit::FAILURE)
    }
}

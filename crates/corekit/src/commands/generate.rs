//! Generate command

use anyhow::{Context, Result};
use corekit_core::{tools, EmptyGroupPolicy, Registry, Resolution, SystemRunner, ToolConfig};
use corekit_gsdk::{GenerateOptions, GsdkGenerator, VariantReport};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::cli::GenerateArgs;
use crate::output;

pub async fn run(args: GenerateArgs) -> Result<i32> {
    let registry = Registry::builtin()?;
    let policy = if args.fail_on_empty {
        EmptyGroupPolicy::Reject
    } else {
        EmptyGroupPolicy::Allow
    };

    let resolution = registry.resolve(&args.name, policy)?;
    let platforms = resolution.platforms();
    debug!("'{}' resolved to {} platform(s)", args.name, platforms.len());
    if platforms.is_empty() {
        output::warning(&format!(
            "'{}' matches no platform configurations, nothing to do",
            args.name
        ));
        return Ok(0);
    }

    tools::preflight("generate")?;
    let config = ToolConfig::load(Some(args.config.as_path()))
        .with_context(|| format!("Failed to load {}", args.config))?;

    if let Resolution::Group { group, .. } = &resolution {
        output::info(&format!(
            "Generating {} platform configurations for '{}'",
            platforms.len(),
            group.name
        ));
    }

    let started = Instant::now();
    let generator = GsdkGenerator::new(config, Arc::new(SystemRunner)).with_options(
        GenerateOptions {
            keep: args.keep,
            mirror: args.mirror,
        },
    );
    let reports = generator.generate_all(&platforms).await?;

    output::header("Generated");
    for report in &reports {
        print_report(report);
    }
    output::success(&format!(
        "Generated {} platform configuration(s) in {}",
        reports.len(),
        output::duration(started.elapsed())
    ));
    Ok(0)
}

fn print_report(report: &VariantReport) {
    output::success(&report.name);
    output::kv("Output", &report.collect.output_dir.display().to_string());
    if !report.collect.archives.is_empty() {
        output::kv("Archives", &report.collect.archives.join(", "));
    }
    if report.collect.headers > 0 {
        output::kv("Headers", &report.collect.headers.to_string());
    }
    output::kv("Licensed", &report.license.licensed.len().to_string());
    if let Some(mirror) = &report.collect.mirrored_to {
        output::kv("Mirrored to", &mirror.display().to_string());
    }
    for collision in &report.collect.collisions {
        output::warning(&format!(
            "{} kept, {} not copied",
            collision.destination.display(),
            collision.skipped.display()
        ));
    }
}

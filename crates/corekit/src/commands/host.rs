//! Host command - local install server for the Arduino IDE

use anyhow::{Context, Result};
use corekit_core::SystemRunner;
use corekit_package::{local_ip, serve_directory, HostOptions, LocalInstallHost};
use std::sync::Arc;

use crate::cli::HostArgs;
use crate::output;

pub async fn run(args: HostArgs) -> Result<i32> {
    let options = HostOptions {
        package_dir: args.package_dir.into_std_path_buf(),
        core_version: args.core_version,
        port: args.port,
        ..HostOptions::default()
    };
    let host = LocalInstallHost::new(Arc::new(SystemRunner), options);

    let ip = local_ip().context("Failed to determine the local IP address")?;
    let hosted = host.prepare(ip).await?;

    output::header("Local install host");
    output::kv("Core", &hosted.core.name);
    output::kv("Size", &format!("{} bytes", hosted.core.size));
    output::kv("SHA-256", &hosted.core.sha256);
    output::kv("Index", &hosted.index_path.display().to_string());
    println!();
    output::info("Add this URL to 'Additional boards manager URLs' in the Arduino IDE:");
    println!("  {}", hosted.index_url);
    println!();

    if args.no_serve {
        return Ok(0);
    }

    let spinner = output::spinner(&format!(
        "Serving {} on port {}, press Ctrl+C to stop",
        hosted.host_dir.display(),
        host.options().port
    ));
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    let served = serve_directory(&hosted.host_dir, host.options().port, shutdown).await;
    spinner.finish_and_clear();
    served.with_context(|| format!("Failed to serve on port {}", host.options().port))?;

    output::success("Server stopped");
    Ok(0)
}

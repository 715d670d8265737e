//! Bootstrap command - prepares a fresh checkout for development

use anyhow::{Context, Result};
use corekit_core::process::run_step;
use corekit_core::{tools, CommandSpec, Error, StepPolicy, SystemRunner};
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use crate::cli::BootstrapArgs;
use crate::output;

const SUBMODULE_TIMEOUT: Duration = Duration::from_secs(600);

/// Link target, relative to the link itself
const CORE_API_TARGET: &str = "../../extra/core-api/api";

pub async fn run(args: BootstrapArgs) -> Result<i32> {
    tools::preflight("bootstrap")?;
    output::info("Setting up the development environment...");

    let spinner = output::spinner("Updating submodules...");
    let spec = CommandSpec::new("git", SUBMODULE_TIMEOUT).args([
        "submodule",
        "update",
        "--init",
        "--recursive",
    ]);
    let result = run_step(&SystemRunner, &spec, StepPolicy::Fatal).await;
    spinner.finish_and_clear();
    result?;

    link_core_api(args.api_path.as_std_path())
        .with_context(|| format!("Failed to link {}", args.api_path))?;

    output::success("Development environment setup finished");
    Ok(0)
}

/// Replace `api_path` with a link to the core API submodule
fn link_core_api(api_path: &Path) -> Result<(), Error> {
    match fs::symlink_metadata(api_path) {
        Ok(meta) if meta.is_dir() => {
            return Err(Error::file_operation(
                "replace",
                api_path,
                io::Error::new(io::ErrorKind::AlreadyExists, "is a directory"),
            ));
        }
        Ok(_) => fs::remove_file(api_path)
            .map_err(|e| Error::file_operation("remove", api_path, e))?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::file_operation("inspect", api_path, e)),
    }

    symlink_dir(Path::new(CORE_API_TARGET), api_path)
        .map_err(|e| Error::file_operation("link", api_path, e))
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_link_replaces_stale_link() {
        let dir = tempfile::TempDir::new().unwrap();
        let api = dir.path().join("api");
        std::os::unix::fs::symlink("somewhere/else", &api).unwrap();

        link_core_api(&api).unwrap();
        assert_eq!(fs::read_link(&api).unwrap(), Path::new(CORE_API_TARGET));
    }

    #[test]
    fn test_link_refuses_real_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let api = dir.path().join("api");
        fs::create_dir(&api).unwrap();

        let err = link_core_api(&api).unwrap_err();
        assert!(matches!(err, Error::FileOperation { action: "replace", .. }));
        assert!(api.is_dir());
    }
}

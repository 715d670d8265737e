//! External tool detection
//!
//! Static list of the vendor and build tools corekit shells out to, with
//! PATH lookup and version probing used by `corekit doctor` and by the
//! preflight checks of individual commands.

use crate::error::{Error, Result};
use crate::process::{CommandRunner, CommandSpec};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

const VERSION_TIMEOUT: Duration = Duration::from_secs(5);

/// An external tool corekit depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalTool {
    /// Executable name
    pub command: &'static str,

    /// Flag printing the version
    pub version_flag: &'static str,

    /// What corekit uses it for
    pub purpose: &'static str,

    /// Subcommands that need it
    pub required_by: &'static [&'static str],
}

/// Static list of known external tools
pub static EXTERNAL_TOOLS: &[ExternalTool] = &[
    ExternalTool {
        command: "slc",
        version_flag: "--version",
        purpose: "Silicon Labs project generator",
        required_by: &["generate"],
    },
    ExternalTool {
        command: "make",
        version_flag: "--version",
        purpose: "Builds generated projects",
        required_by: &["generate"],
    },
    ExternalTool {
        command: "arduino-cli",
        version_flag: "version",
        purpose: "Compiles and uploads sketches",
        required_by: &["build-test", "hil"],
    },
    ExternalTool {
        command: "git",
        version_flag: "--version",
        purpose: "Fetches submodules",
        required_by: &["bootstrap"],
    },
    ExternalTool {
        command: "sh",
        version_flag: "--version",
        purpose: "Runs the core packaging script",
        required_by: &["host"],
    },
];

/// Result of looking a tool up on PATH
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub tool: ExternalTool,
    pub path: Option<PathBuf>,
}

impl ToolStatus {
    pub fn is_found(&self) -> bool {
        self.path.is_some()
    }
}

/// Look up one tool on PATH
pub fn locate(tool: &ExternalTool) -> ToolStatus {
    let path = which::which(tool.command).ok();
    debug!("{}: {:?}", tool.command, path);
    ToolStatus { tool: *tool, path }
}

/// Look up every known tool
pub fn locate_all() -> Vec<ToolStatus> {
    EXTERNAL_TOOLS.iter().map(locate).collect()
}

/// Tools needed by a subcommand
pub fn required_by(subcommand: &str) -> Vec<&'static ExternalTool> {
    EXTERNAL_TOOLS
        .iter()
        .filter(|t| t.required_by.contains(&subcommand))
        .collect()
}

/// Fail with [`Error::ToolNotFound`] unless every tool needed by the
/// subcommand is on PATH
pub fn preflight(subcommand: &str) -> Result<()> {
    for tool in required_by(subcommand) {
        if !locate(tool).is_found() {
            return Err(Error::ToolNotFound {
                tool: tool.command.to_string(),
            });
        }
    }
    Ok(())
}

/// First line printed by the tool's version flag, if it runs successfully
pub async fn probe_version(runner: &dyn CommandRunner, tool: &ExternalTool) -> Option<String> {
    let spec =
        CommandSpec::new(tool.command, VERSION_TIMEOUT).args(tool.version_flag.split_whitespace());
    match runner.run(&spec).await {
        Ok(outcome) if outcome.success() => outcome
            .stdout
            .lines()
            .chain(outcome.stderr.lines())
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string),
        Ok(_) => None,
        Err(e) => {
            debug!("Version probe for {} failed: {}", tool.command, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::CommandOutcome;
    use async_trait::async_trait;

    struct VersionRunner;

    #[async_trait]
    impl CommandRunner for VersionRunner {
        async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome> {
            Ok(CommandOutcome {
                exit_code: Some(0),
                stdout: format!("\n{} 1.2.3\nextra\n", spec.program),
                ..Default::default()
            })
        }
    }

    #[test]
    fn test_required_by_generate() {
        let tools: Vec<&str> = required_by("generate").iter().map(|t| t.command).collect();
        assert_eq!(tools, vec!["slc", "make"]);
    }

    #[test]
    fn test_preflight_unknown_subcommand_needs_nothing() {
        assert!(preflight("list").is_ok());
    }

    #[test]
    fn test_locate_all_covers_registry() {
        assert_eq!(locate_all().len(), EXTERNAL_TOOLS.len());
    }

    #[tokio::test]
    async fn test_probe_version_takes_first_non_empty_line() {
        let version = probe_version(&VersionRunner, &EXTERNAL_TOOLS[0]).await;
        assert_eq!(version.as_deref(), Some("slc 1.2.3"));
    }
}

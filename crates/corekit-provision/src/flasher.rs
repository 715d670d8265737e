//! Provisioning flasher
//!
//! Resolves the flasher bundled with the installed Arduino core and writes
//! the selected provisioning image. The config number is validated before
//! any path is resolved or command started.

use crate::boards::{find_board, FlasherTool, ProvisionBoard};
use corekit_core::process::run_step;
use corekit_core::{
    get_home_dir, CommandOutcome, CommandRunner, CommandSpec, Error, Result, StepPolicy,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Timeout of a single flashing run
pub const FLASH_TIMEOUT: Duration = Duration::from_secs(30);

const OPENOCD_VERSION: &str = "0.12.0-arduino1-static";
const COMMANDER_VERSION: &str = "1.16.4";

/// Operating systems with a known Arduino tools location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Linux,
    MacOs,
    Windows,
}

impl HostOs {
    /// The running OS, if supported
    pub fn current() -> Option<Self> {
        match std::env::consts::OS {
            "linux" => Some(Self::Linux),
            "macos" => Some(Self::MacOs),
            "windows" => Some(Self::Windows),
            _ => None,
        }
    }
}

/// Tools folder of the installed SiliconLabs core under `home`
pub fn tools_dir(home: &Path, os: HostOs) -> PathBuf {
    let relative = match os {
        HostOs::Linux => ".arduino15/packages/SiliconLabs/tools",
        HostOs::MacOs => "Library/Arduino15/packages/SiliconLabs/tools",
        HostOs::Windows => "AppData/Local/Arduino15/packages/SiliconLabs/tools",
    };
    home.join(relative)
}

/// Parse a config number argument
pub fn parse_config_index(value: &str) -> Result<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::invalid_argument(format!("Please provide a valid config number! Got '{value}'")))
}

/// Flashes provisioning images through a [`CommandRunner`]
pub struct Provisioner {
    runner: Arc<dyn CommandRunner>,
    tools_dir: Option<PathBuf>,
    os: Option<HostOs>,
    binaries_dir: PathBuf,
    timeout: Duration,
}

impl Provisioner {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            tools_dir: None,
            os: HostOs::current(),
            binaries_dir: PathBuf::from("binaries"),
            timeout: FLASH_TIMEOUT,
        }
    }

    /// Use a specific Arduino tools folder instead of the per-OS default
    pub fn with_tools_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tools_dir = Some(dir.into());
        self
    }

    /// Override the detected OS
    pub fn with_os(mut self, os: HostOs) -> Self {
        self.os = Some(os);
        self
    }

    /// Folder holding the provisioning images
    pub fn with_binaries_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.binaries_dir = dir.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn host_os(&self) -> Result<HostOs> {
        self.os.ok_or_else(|| {
            Error::invalid_argument(format!(
                "Unsupported operating system '{}'",
                std::env::consts::OS
            ))
        })
    }

    fn resolve_tools_dir(&self) -> Result<PathBuf> {
        match &self.tools_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(tools_dir(&get_home_dir()?, self.host_os()?)),
        }
    }

    /// Path of the flasher executable inside the tools folder
    pub fn flasher_executable(&self, tools: &Path, flasher: FlasherTool) -> Result<PathBuf> {
        Ok(match flasher {
            FlasherTool::OpenOcd => tools.join("openocd").join(OPENOCD_VERSION).join("bin/openocd"),
            FlasherTool::SimplicityCommander => {
                let base = tools.join("simplicitycommander").join(COMMANDER_VERSION);
                match self.host_os()? {
                    HostOs::MacOs => base.join("Commander.app/Contents/MacOS/commander"),
                    _ => base.join("commander"),
                }
            }
        })
    }

    /// Build the flashing command for a board and config number
    pub fn plan(&self, board: &str, index: i64) -> Result<CommandSpec> {
        let board = find_board(board)?;
        let image = board.config_file(index)?;
        self.plan_for(board, image)
    }

    fn plan_for(&self, board: &ProvisionBoard, image: &str) -> Result<CommandSpec> {
        let tools = self.resolve_tools_dir()?;
        let executable = self.flasher_executable(&tools, board.flasher)?;
        let image_path = self.binaries_dir.join(image);
        let image_path = image_path.to_string_lossy().replace('\\', "/");

        info!("Flasher tool location: {}", executable.display());
        info!("Provision binary file: {}", image_path);

        let spec = CommandSpec::new(executable.to_string_lossy(), self.timeout);
        Ok(match board.flasher {
            FlasherTool::OpenOcd => {
                let scripts = tools
                    .join("openocd")
                    .join(OPENOCD_VERSION)
                    .join("share/openocd/scripts/");
                spec.arg("-d2")
                    .arg("-s")
                    .arg(scripts.to_string_lossy())
                    .args(["-f", "interface/cmsis-dap.cfg", "-f", "target/efm32s2_g23.cfg", "-c"])
                    .arg(format!(
                        "init; reset_config srst_nogate; reset halt; program {{{image_path}}}; reset; exit"
                    ))
            }
            FlasherTool::SimplicityCommander => spec.arg("flash").arg(image_path).arg("-v"),
        })
    }

    /// Flash the selected provisioning image; a non-zero exit is fatal
    pub async fn provision(&self, board: &str, index: i64) -> Result<CommandOutcome> {
        info!("Selected board: {}", board);
        info!("Selected config number: {}", index);
        let spec = self.plan(board, index)?;
        run_step(self.runner.as_ref(), &spec, StepPolicy::Fatal).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corekit_core::SystemRunner;

    fn provisioner(os: HostOs) -> Provisioner {
        Provisioner::new(Arc::new(SystemRunner))
            .with_os(os)
            .with_tools_dir("/opt/arduino/tools")
    }

    #[test]
    fn test_tools_dir_per_os() {
        let home = Path::new("/home/dev");
        assert_eq!(
            tools_dir(home, HostOs::Linux),
            PathBuf::from("/home/dev/.arduino15/packages/SiliconLabs/tools")
        );
        assert_eq!(
            tools_dir(home, HostOs::MacOs),
            PathBuf::from("/home/dev/Library/Arduino15/packages/SiliconLabs/tools")
        );
        assert!(tools_dir(home, HostOs::Windows).ends_with("AppData/Local/Arduino15/packages/SiliconLabs/tools"));
    }

    #[test]
    fn test_parse_config_index() {
        assert_eq!(parse_config_index("1").unwrap(), 1);
        assert_eq!(parse_config_index("-1").unwrap(), -1);
        let err = parse_config_index("one").unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_openocd_plan() {
        let spec = provisioner(HostOs::Linux).plan("nano_matter", 1).unwrap();
        assert_eq!(
            spec.program,
            "/opt/arduino/tools/openocd/0.12.0-arduino1-static/bin/openocd"
        );
        assert_eq!(spec.args[0], "-d2");
        assert_eq!(
            spec.args[2],
            "/opt/arduino/tools/openocd/0.12.0-arduino1-static/share/openocd/scripts/"
        );
        assert_eq!(
            spec.args.last().unwrap(),
            "init; reset_config srst_nogate; reset halt; program {binaries/1_nanomatter_nvm3.hex}; reset; exit"
        );
        assert_eq!(spec.timeout, FLASH_TIMEOUT);
    }

    #[test]
    fn test_commander_plan() {
        let spec = provisioner(HostOs::Linux).plan("xg24explorerkit", 0).unwrap();
        assert_eq!(
            spec.program,
            "/opt/arduino/tools/simplicitycommander/1.16.4/commander"
        );
        assert_eq!(spec.args, vec!["flash", "binaries/0_xg24explorerkit_nvm3.hex", "-v"]);

        let mac = provisioner(HostOs::MacOs).plan("xg24explorerkit", 0).unwrap();
        assert!(mac.program.ends_with("1.16.4/Commander.app/Contents/MacOS/commander"));
    }

    #[test]
    fn test_plan_rejects_bad_input() {
        let p = provisioner(HostOs::Linux);
        assert!(matches!(p.plan("uno", 0), Err(Error::UnknownBoard { .. })));
        assert!(matches!(
            p.plan("thingplus_matter", -1),
            Err(Error::InvalidConfigIndex { max: 2 })
        ));
    }
}

//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use corekit_test::TestList;

/// corekit - tooling for the Silicon Labs Arduino core
#[derive(Parser, Debug)]
#[command(name = "corekit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the GSDK for a platform configuration or group
    Generate(GenerateArgs),

    /// List platform configurations and groups
    List(ListArgs),

    /// Flash Matter provisioning data to a board
    Provision(ProvisionArgs),

    /// Package the core and host it for installs from the Arduino IDE
    Host(HostArgs),

    /// Show size and SHA-256 of every file in a directory
    Checksum(ChecksumArgs),

    /// Compile the test sketches for every board variant
    BuildTest(BuildTestArgs),

    /// Run hardware-in-loop tests on attached boards
    Hil(HilArgs),

    /// Fetch submodules and link the core API into the source tree
    Bootstrap(BootstrapArgs),

    /// Check that the external tools are installed
    Doctor(DoctorArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Platform configuration or group name (see `corekit list`)
    pub name: String,

    /// Keep the generation directory
    #[arg(short, long)]
    pub keep: bool,

    /// Copy prebuilt outputs into the variants folder
    #[arg(long)]
    pub mirror: bool,

    /// Fail when a group matches no platform configurations
    #[arg(long)]
    pub fail_on_empty: bool,

    /// Path to the tool configuration file
    #[arg(short, long, default_value = "gsdk.cfg")]
    pub config: Utf8PathBuf,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ProvisionArgs {
    /// Board name
    pub board: String,

    /// Provisioning config number
    #[arg(allow_hyphen_values = true)]
    pub config: String,

    /// Folder holding the provisioning images
    #[arg(long, default_value = "binaries")]
    pub binaries: Utf8PathBuf,

    /// Arduino tools folder (default: per-OS Arduino15 location)
    #[arg(long)]
    pub tools_dir: Option<Utf8PathBuf>,
}

#[derive(Args, Debug)]
pub struct HostArgs {
    /// HTTP port
    #[arg(short, long, default_value_t = 80)]
    pub port: u16,

    /// Folder holding package_core.sh and the package index
    #[arg(long, default_value = ".")]
    pub package_dir: Utf8PathBuf,

    /// Core version in the zip name
    #[arg(long, default_value = "1.0.0")]
    pub core_version: String,

    /// Prepare the host folder without serving it
    #[arg(long)]
    pub no_serve: bool,
}

#[derive(Args, Debug)]
pub struct ChecksumArgs {
    /// Directory to list
    pub dir: Utf8PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct BuildTestArgs {
    /// Test list to build (quick, common, matter, all)
    #[arg(default_value_t = TestList::All)]
    pub list: TestList,

    /// Folder the sketch paths are relative to
    #[arg(long, default_value = ".")]
    pub sketch_root: Utf8PathBuf,
}

#[derive(Args, Debug)]
pub struct HilArgs {
    /// Board name, or a config file with `<board> <port>` lines
    pub target: String,

    /// Serial port of the board
    pub port: Option<String>,

    /// Folder the HIL sketches live in
    #[arg(long, default_value = ".")]
    pub sketch_root: Utf8PathBuf,
}

#[derive(Args, Debug)]
pub struct BootstrapArgs {
    /// Core API path to replace with a link
    #[arg(long, default_value = "../cores/silabs/api")]
    pub api_path: Utf8PathBuf,
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Also print tool versions
    #[arg(long)]
    pub versions: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_flags() {
        let cli = Cli::try_parse_from([
            "corekit",
            "generate",
            "matter_precomp_all",
            "-k",
            "--mirror",
            "--config",
            "ci.cfg",
        ])
        .unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.name, "matter_precomp_all");
        assert!(args.keep);
        assert!(args.mirror);
        assert!(!args.fail_on_empty);
        assert_eq!(args.config, "ci.cfg");
    }

    #[test]
    fn test_provision_accepts_negative_config() {
        let cli = Cli::try_parse_from(["corekit", "provision", "nano_matter", "-1"]).unwrap();
        let Commands::Provision(args) = cli.command else {
            panic!("expected provision");
        };
        assert_eq!(args.config, "-1");
    }

    #[test]
    fn test_build_test_list() {
        let cli = Cli::try_parse_from(["corekit", "build-test"]).unwrap();
        let Commands::BuildTest(args) = cli.command else {
            panic!("expected build-test");
        };
        assert_eq!(args.list, TestList::All);

        let cli = Cli::try_parse_from(["corekit", "build-test", "matter"]).unwrap();
        let Commands::BuildTest(args) = cli.command else {
            panic!("expected build-test");
        };
        assert_eq!(args.list, TestList::Matter);

        assert!(Cli::try_parse_from(["corekit", "build-test", "nightly"]).is_err());
    }

    #[test]
    fn test_missing_argument_is_an_error() {
        let err = Cli::try_parse_from(["corekit", "provision", "nano_matter"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}

//! # corekit-core
//!
//! Core library for the corekit CLI providing:
//! - Key-value tool configuration parsing (gsdk.cfg)
//! - Platform configuration data model and the built-in registry
//! - Name and group resolution over the registry
//! - Subprocess execution with timeouts behind a mockable runner
//! - Filesystem and tool-detection helpers shared by the pipelines

pub mod config;
pub mod error;
pub mod fs;
pub mod process;
pub mod registry;
pub mod tools;
pub mod types;
pub mod utils;

pub use config::ToolConfig;
pub use error::{exit, Error, Result};
pub use process::{CommandOutcome, CommandRunner, CommandSpec, StepPolicy, SystemRunner};
pub use registry::{EmptyGroupPolicy, Registry, Resolution};
pub use types::{AdditionalFile, MatterConfig, PlatformConfig, ProtocolStack};
pub use utils::get_home_dir;

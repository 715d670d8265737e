//! Tool configuration loading

mod loader;

pub use loader::{ToolConfig, DEFAULT_CONFIG_FILE};

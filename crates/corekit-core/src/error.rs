//! Error types for corekit-core

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using corekit-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit statuses used by the corekit binary
pub mod exit {
    /// Invalid command-line input (unknown name, missing or malformed argument)
    pub const INVALID_INPUT: i32 = -1;
    /// Any failure without a more specific status
    pub const FAILURE: i32 = 1;
    /// The prebuilt archive was not produced by the vendor build
    pub const ARCHIVE_MISSING: i32 = 2;
    /// Interrupted by the user (Ctrl+C)
    pub const INTERRUPTED: i32 = 100;
    /// Build matrix finished with failed builds or builds with warnings
    pub const TESTS_FAILED: i32 = 200;
}

/// Core error types for corekit
#[derive(Error, Debug)]
pub enum Error {
    /// Tool configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// A mandatory configuration key is absent
    #[error("Missing mandatory configuration key '{key}'")]
    MissingConfigKey { key: String },

    /// Malformed configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// No platform or group with this name
    #[error("Platform configuration with the name '{name}' not found!")]
    PlatformNotFound { name: String, available: Vec<String> },

    /// Two registry entries share a name
    #[error("Duplicate platform configuration name '{name}'")]
    DuplicatePlatform { name: String },

    /// A registry entry violates a data-model invariant
    #[error("Invalid platform configuration '{name}': {message}")]
    InvalidPlatform { name: String, message: String },

    /// A group expanded to nothing while empty expansions are rejected
    #[error("Platform group '{group}' did not match any platform configuration")]
    EmptyGroup { group: String },

    /// Invalid command-line input
    #[error("{message}")]
    InvalidArgument { message: String },

    /// Unknown board for provisioning or testing
    #[error("Board with the name '{name}' not found!")]
    UnknownBoard { name: String, available: Vec<String> },

    /// Provisioning config index out of range
    #[error("Selected config does not exist! Valid config numbers are: 0 to {max}")]
    InvalidConfigIndex { max: i64 },

    /// Required external tool is not on PATH
    #[error("Required tool '{tool}' was not found on PATH")]
    ToolNotFound { tool: String },

    /// External command exited unsuccessfully
    #[error("Command '{command}' failed with exit code {}:\n{output}", exit_code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        output: String,
    },

    /// External command exceeded its timeout
    #[error("Command '{command}' timed out after {timeout_secs}s")]
    CommandTimeout { command: String, timeout_secs: u64 },

    /// External command could not be started
    #[error("Failed to start '{command}': {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The prebuilt archive is absent after the build
    #[error("'{}' has not been created - build might've failed", path.display())]
    ArchiveMissing { path: PathBuf },

    /// A generated file the pipeline depends on is absent
    #[error("No '{extension}' file found in {}", dir.display())]
    GeneratedFileMissing { dir: PathBuf, extension: String },

    /// Filesystem operation on a specific path failed
    #[error("Failed to {action} {}: {source}", path.display())]
    FileOperation {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The user's home directory could not be determined
    #[error("Could not determine home directory")]
    HomeDirNotFound,

    /// Serial port error
    #[error("Serial port '{port}': {message}")]
    Serial { port: String, message: String },

    /// Bluetooth adapter or scan error
    #[error("Bluetooth error: {message}")]
    Bluetooth { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create a missing config key error
    pub fn missing_config_key(key: impl Into<String>) -> Self {
        Self::MissingConfigKey { key: key.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid platform error
    pub fn invalid_platform(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPlatform {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a file operation error bound to a path
    pub fn file_operation(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::FileOperation {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create a serial port error
    pub fn serial(port: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serial {
            port: port.into(),
            message: message.into(),
        }
    }

    /// Create a Bluetooth error
    pub fn bluetooth(message: impl Into<String>) -> Self {
        Self::Bluetooth {
            message: message.into(),
        }
    }

    /// Whether this error was caused by invalid user input
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::PlatformNotFound { .. }
                | Self::InvalidArgument { .. }
                | Self::UnknownBoard { .. }
                | Self::InvalidConfigIndex { .. }
        )
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        if self.is_invalid_input() {
            exit::INVALID_INPUT
        } else if matches!(self, Self::ArchiveMissing { .. }) {
            exit::ARCHIVE_MISSING
        } else {
            exit::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_exit_code() {
        let err = Error::InvalidConfigIndex { max: 2 };
        assert_eq!(err.exit_code(), exit::INVALID_INPUT);
        assert_eq!(
            err.to_string(),
            "Selected config does not exist! Valid config numbers are: 0 to 2"
        );
    }

    #[test]
    fn test_archive_missing_has_distinct_exit_code() {
        let err = Error::ArchiveMissing {
            path: PathBuf::from("gen/gsdk.a"),
        };
        assert_eq!(err.exit_code(), exit::ARCHIVE_MISSING);
        assert_ne!(err.exit_code(), exit::FAILURE);
        assert!(err.to_string().contains("gen/gsdk.a"));
    }

    #[test]
    fn test_command_failed_message() {
        let err = Error::CommandFailed {
            command: "slc generate".to_string(),
            exit_code: Some(3),
            output: "boom".to_string(),
        };
        assert!(err.to_string().contains("exit code 3"));
        assert_eq!(err.exit_code(), exit::FAILURE);

        let killed = Error::CommandFailed {
            command: "make".to_string(),
            exit_code: None,
            output: String::new(),
        };
        assert!(killed.to_string().contains("exit code none"));
    }

    #[test]
    fn test_platform_not_found_message() {
        let err = Error::PlatformNotFound {
            name: "bogus".to_string(),
            available: vec!["all".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Platform configuration with the name 'bogus' not found!"
        );
        assert!(err.is_invalid_input());
    }
}

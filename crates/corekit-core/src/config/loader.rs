//! Key-value configuration file parsing

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashMap;
use std::fs;
use tracing::{debug, warn};

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "gsdk.cfg";

const MANDATORY_KEYS: &[&str] = &[
    "gsdk_dir",
    "output_dir",
    "gsdk_version",
    "matter_extension_version",
];

const OPTIONAL_KEYS: &[&str] = &["gen_dir", "variants_dir", "license_file", "make_jobs"];

const DEFAULT_GEN_DIR: &str = "gen/";
const DEFAULT_VARIANTS_DIR: &str = "../variants/";
const DEFAULT_LICENSE_FILE: &str = "gsdk_license";
const DEFAULT_MAKE_JOBS: u32 = 20;

/// Settings for the GSDK generation pipeline
///
/// Parsed once at startup and passed explicitly to every pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Vendor SDK root
    pub gsdk_dir: Utf8PathBuf,

    /// Directory receiving the per-variant `gen_gsdk_<name>/` outputs
    pub output_dir: Utf8PathBuf,

    /// SDK version, names the `gecko_sdk_<ver>` subtree
    pub gsdk_version: String,

    /// Matter extension version, names the `matter_<ver>` subtree
    pub matter_extension_version: String,

    /// Intermediate generation directory
    pub gen_dir: Utf8PathBuf,

    /// Shared variants tree used when mirroring outputs
    pub variants_dir: Utf8PathBuf,

    /// License file copied into every output
    pub license_file: Utf8PathBuf,

    /// Parallel jobs for the vendor build
    pub make_jobs: u32,
}

impl ToolConfig {
    /// Load configuration from the given path, or from `gsdk.cfg` in the
    /// current directory
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Utf8Path::new(DEFAULT_CONFIG_FILE));
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config_not_found(path.as_str())
            } else {
                Error::file_operation("read", path.as_std_path(), e)
            }
        })?;

        debug!("Loaded configuration from {}", path);
        Self::parse(&content)
    }

    /// Parse configuration text
    ///
    /// Lines are `key value` pairs separated by whitespace; `#` starts a
    /// comment line and blank lines are ignored. A repeated key keeps the
    /// last value.
    pub fn parse(content: &str) -> Result<Self> {
        let mut values: HashMap<&str, &str> = HashMap::new();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = match line.split_once(char::is_whitespace) {
                Some((key, value)) => (key, value.trim()),
                None => (line, ""),
            };

            if value.is_empty() {
                return Err(Error::invalid_config(format!(
                    "line {}: key '{}' has no value",
                    index + 1,
                    key
                )));
            }

            if !MANDATORY_KEYS.contains(&key) && !OPTIONAL_KEYS.contains(&key) {
                warn!("Ignoring unknown configuration key '{}'", key);
                continue;
            }

            if values.insert(key, value).is_some() {
                debug!("Configuration key '{}' repeated, keeping last value", key);
            }
        }

        let required = |key: &str| -> Result<String> {
            values
                .get(key)
                .map(|v| v.to_string())
                .ok_or_else(|| Error::missing_config_key(key))
        };

        let make_jobs = match values.get("make_jobs") {
            Some(raw) => raw.parse::<u32>().ok().filter(|jobs| *jobs > 0).ok_or_else(|| {
                Error::invalid_config(format!(
                    "make_jobs must be a positive integer, got '{}'",
                    raw
                ))
            })?,
            None => DEFAULT_MAKE_JOBS,
        };

        let optional = |key: &str, default: &str| -> Utf8PathBuf {
            Utf8PathBuf::from(values.get(key).copied().unwrap_or(default))
        };

        Ok(Self {
            gsdk_dir: Utf8PathBuf::from(required("gsdk_dir")?),
            output_dir: Utf8PathBuf::from(required("output_dir")?),
            gsdk_version: required("gsdk_version")?,
            matter_extension_version: required("matter_extension_version")?,
            gen_dir: optional("gen_dir", DEFAULT_GEN_DIR),
            variants_dir: optional("variants_dir", DEFAULT_VARIANTS_DIR),
            license_file: optional("license_file", DEFAULT_LICENSE_FILE),
            make_jobs,
        })
    }
}

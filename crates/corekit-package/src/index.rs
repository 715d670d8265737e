//! Package index patching

use corekit_core::{Error, Result};
use serde_json::Value;

/// Package index file shipped next to the packaging script
pub const PACKAGE_INDEX_NAME: &str = "package_arduinosilabs_index.json";

/// Download location in the released index, replaced for local installs
pub const RELEASE_URL: &str = "https://github.com/SiliconLabs/arduino/releases/tag/1.0.0";

/// Point the first platform of an index at a locally hosted core zip
///
/// Sets `packages[0].platforms[0].size` and `.checksum`, then replaces every
/// occurrence of [`RELEASE_URL`] with `base_url`.
pub fn patch_index(index: &str, size: u64, sha256: &str, base_url: &str) -> Result<String> {
    let mut data: Value = serde_json::from_str(index)?;

    let platform = data
        .pointer_mut("/packages/0/platforms/0")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| Error::invalid_config("package index has no packages[0].platforms[0]"))?;

    platform.insert("size".to_string(), Value::from(size));
    platform.insert(
        "checksum".to_string(),
        Value::from(format!("SHA-256:{sha256}")),
    );

    let serialized = serde_json::to_string(&data)?;
    Ok(serialized.replace(RELEASE_URL, base_url))
}

//! Platform configuration types
//!
//! A platform configuration describes one buildable variant: a board, the
//! protocol stack it is built for, and the project files staged into the
//! vendor SDK before generation.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Protocol stack a variant is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolStack {
    /// No protocol-specific components
    None,
    /// ArduinoBLE on top of the Silicon Labs HCI link layer
    BleArduino,
    /// Silicon Labs BLE stack
    BleSilabs,
    /// Matter over Thread
    Matter,
    /// Radio disabled
    #[serde(rename = "noradio")]
    NoRadio,
}

impl ProtocolStack {
    /// All stacks in declaration order
    pub const ALL: [ProtocolStack; 5] = [
        Self::None,
        Self::BleArduino,
        Self::BleSilabs,
        Self::Matter,
        Self::NoRadio,
    ];

    /// Identifier used for variant folders and board options
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::BleArduino => "ble_arduino",
            Self::BleSilabs => "ble_silabs",
            Self::Matter => "matter",
            Self::NoRadio => "noradio",
        }
    }
}

impl fmt::Display for ProtocolStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProtocolStack {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stack| stack.as_str() == s)
            .ok_or_else(|| format!("unknown protocol stack '{}'", s))
    }
}

/// A file staged into the vendor tree next to the project descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AdditionalFile {
    /// Staged into the project folder
    Plain(&'static str),
    /// Staged into a subdirectory relative to the vendor SDK root
    Targeted {
        source: &'static str,
        target_dir: &'static str,
    },
}

impl AdditionalFile {
    /// Source path of the file
    pub fn source(&self) -> &'static str {
        match self {
            Self::Plain(source) => source,
            Self::Targeted { source, .. } => source,
        }
    }
}

/// Matter-specific settings of a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatterConfig {
    /// ZAP data-model file staged as the sample app's data model
    pub zap_file: &'static str,

    /// Vendor name written into the device descriptors
    pub vendor_name: &'static str,

    /// Vendor id written into the device descriptors
    pub vendor_id: u16,

    /// Product name written into the device descriptors
    pub product_name: &'static str,
}

/// One buildable variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformConfig {
    /// Unique name (e.g., "nanomatter_matter_precomp")
    pub name: &'static str,

    /// Board folder under the shared variants tree
    pub arduino_variant_name: &'static str,

    /// Board part number passed to the project generator
    pub board_opn: &'static str,

    /// Protocol stack the variant is built for
    pub protocol_stack: ProtocolStack,

    /// Archive-only build instead of full-source output
    pub prebuild: bool,

    /// Bundles the AI/ML components
    pub ai_capable: bool,

    /// Project descriptor staged into the vendor tree
    pub slcp_file: &'static str,

    /// Additional files staged alongside the descriptor
    pub additional_files: &'static [AdditionalFile],

    /// Present iff `protocol_stack` is `Matter`
    pub matter: Option<MatterConfig>,
}

impl PlatformConfig {
    /// Whether this variant builds the Matter sample app
    pub fn is_matter(&self) -> bool {
        self.protocol_stack == ProtocolStack::Matter
    }

    /// Name of the per-variant output folder
    pub fn output_folder_name(&self) -> String {
        format!("gen_gsdk_{}", self.name)
    }

    /// File name of the project descriptor
    pub fn slcp_file_name(&self) -> &'static str {
        self.slcp_file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.slcp_file)
    }
}

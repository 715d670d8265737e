//! Paths inside the vendor SDK, the generation directory and the outputs

use camino::Utf8PathBuf;
use corekit_core::{PlatformConfig, ToolConfig};

/// Project folder used for non-Matter variants
pub const SOC_EMPTY_FOLDER: &str = "app/bluetooth/example/bt_soc_empty";

/// Project folder used for Matter variants
pub const MATTER_APP_FOLDER: &str = "extension/matter_extension/slc/sample-app/lighting-app/efr32";

/// Data-model folder receiving the staged ZAP file
pub const MATTER_ZAP_FOLDER: &str =
    "extension/matter_extension/examples/lighting-app/silabs/efr32/data_model";

/// Name the staged ZAP file is given
pub const MATTER_ZAP_NAME: &str = "lighting-app.zap";

/// BLE HCI link-layer headers shipped with the SDK
pub const BLE_HCI_INCLUDE_FOLDER: &str = "protocol/bluetooth/bgstack/ll/inc";

/// Archive produced by the patched build
pub const ARCHIVE_NAME: &str = "gsdk.a";

/// Linker script copied into prebuilt outputs
pub const LINKER_SCRIPT: &str = "autogen/linkerfile.ld";

/// Resolves every path the pipeline touches from the tool configuration
#[derive(Debug, Clone)]
pub struct GsdkLayout {
    config: ToolConfig,
}

impl GsdkLayout {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Vendor SDK root
    pub fn gsdk_dir(&self) -> &Utf8PathBuf {
        &self.config.gsdk_dir
    }

    /// Intermediate generation directory
    pub fn gen_dir(&self) -> &Utf8PathBuf {
        &self.config.gen_dir
    }

    /// Project folder in the vendor tree the descriptor is staged into
    pub fn project_folder(&self, platform: &PlatformConfig) -> Utf8PathBuf {
        if platform.is_matter() {
            self.config.gsdk_dir.join(MATTER_APP_FOLDER)
        } else {
            self.config.gsdk_dir.join(SOC_EMPTY_FOLDER)
        }
    }

    /// Destination of the staged Matter data model
    pub fn matter_zap_target(&self) -> Utf8PathBuf {
        self.config
            .gsdk_dir
            .join(MATTER_ZAP_FOLDER)
            .join(MATTER_ZAP_NAME)
    }

    /// Directory holding the SDK's BLE HCI headers
    pub fn ble_hci_include_dir(&self) -> Utf8PathBuf {
        self.config.gsdk_dir.join(BLE_HCI_INCLUDE_FOLDER)
    }

    /// `gecko_sdk_<ver>` folder name
    pub fn gecko_sdk_folder(&self) -> String {
        format!("gecko_sdk_{}", self.config.gsdk_version)
    }

    /// `matter_<ver>` folder name
    pub fn matter_folder(&self) -> String {
        format!("matter_{}", self.config.matter_extension_version)
    }

    /// Archive the patched build produces
    pub fn archive(&self) -> Utf8PathBuf {
        self.config.gen_dir.join(ARCHIVE_NAME)
    }

    /// Matter device configuration header in the generated tree
    pub fn chip_device_config(&self) -> Utf8PathBuf {
        self.config
            .gen_dir
            .join(self.matter_folder())
            .join("src/include/platform/CHIPDeviceConfig.h")
    }

    /// ZAP-generated configuration header in the generated tree
    pub fn zap_gen_config(&self) -> Utf8PathBuf {
        self.config.gen_dir.join("autogen/zap-generated/gen_config.h")
    }

    /// Per-variant output directory
    pub fn output_dir(&self, platform: &PlatformConfig) -> Utf8PathBuf {
        self.config.output_dir.join(platform.output_folder_name())
    }

    /// Mirror destination in the shared variants tree
    pub fn mirror_dir(&self, platform: &PlatformConfig) -> Utf8PathBuf {
        self.config
            .variants_dir
            .join(platform.arduino_variant_name)
            .join(platform.protocol_stack.as_str())
    }

    /// License file copied into outputs
    pub fn license_file(&self) -> &Utf8PathBuf {
        &self.config.license_file
    }
}

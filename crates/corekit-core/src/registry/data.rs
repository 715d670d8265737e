//! Built-in platform configurations and groups

use super::{PlatformFilter, PlatformGroup};
use crate::types::{AdditionalFile, MatterConfig, PlatformConfig, ProtocolStack};

// ============================================================================
// Shared staging files
// ============================================================================

const THINGPLUS_FILES: &[AdditionalFile] = &[
    AdditionalFile::Plain("slcp/thingplusmatter_ble/sl_spidrv_eusart_thingplus1_config.h"),
    AdditionalFile::Plain("slcp/thingplusmatter_ble/sl_iostream_eusart_thingplus1_config.h"),
];

const XG27DEVKIT_FILES: &[AdditionalFile] = &[AdditionalFile::Plain(
    "slcp/xg27devkit/sl_iostream_usart_xg27devkit1_config.h",
)];

const XG24EXPLORERKIT_FILES: &[AdditionalFile] = &[
    AdditionalFile::Plain("slcp/xg24explorerkit/sl_spidrv_eusart_xg24explorerkit1_config.h"),
    AdditionalFile::Plain("slcp/xg24explorerkit/sl_iostream_eusart_xg24explorerkit1_config.h"),
];

const XG24DEVKIT_FILES: &[AdditionalFile] = &[AdditionalFile::Plain(
    "slcp/xg24devkit/sl_iostream_eusart_xg24devkit1_config.h",
)];

const XIAO_MG24_FILES: &[AdditionalFile] = &[
    AdditionalFile::Plain("slcp/wio_mg24/sl_spidrv_eusart_wio_mg24_config.h"),
    AdditionalFile::Plain("slcp/wio_mg24/sl_iostream_eusart_wio_mg24_config.h"),
    AdditionalFile::Targeted {
        source: "slcp/wio_mg24/brd2907a.slcc",
        target_dir: "hardware/board/component/",
    },
    AdditionalFile::Targeted {
        source: "slcp/wio_mg24/brd2907a_config.slcc",
        target_dir: "hardware/board/config/component/",
    },
];

const NANOMATTER_FILES: &[AdditionalFile] = &[
    AdditionalFile::Plain("slcp/nanomatter_ble/sl_spidrv_eusart_nanomatter_config.h"),
    AdditionalFile::Plain("slcp/nanomatter_ble/sl_spidrv_eusart_nanomatter1_config.h"),
    AdditionalFile::Plain("slcp/nanomatter_ble/sl_iostream_usart_nanomatter_config.h"),
    AdditionalFile::Plain("slcp/nanomatter_ble/sl_iostream_eusart_nanomatter1_config.h"),
    AdditionalFile::Plain("slcp/nanomatter_ble/sl_i2cspm_nanomatter_config.h"),
    AdditionalFile::Targeted {
        source: "slcp/nanomatter_ble/brd9050a.slcc",
        target_dir: "hardware/board/component/",
    },
    AdditionalFile::Targeted {
        source: "slcp/nanomatter_ble/brd9050a_config.slcc",
        target_dir: "hardware/board/config/component/",
    },
];

// ============================================================================
// Matter device descriptors
// ============================================================================

const MATTER_ZAP_FILE: &str = "slcp/common/arduino_matter.zap";

/// Matter test vendor id
const MATTER_TEST_VENDOR_ID: u16 = 0xFFF1;

const NANOMATTER_MATTER: MatterConfig = MatterConfig {
    zap_file: MATTER_ZAP_FILE,
    vendor_name: "Arduino",
    vendor_id: MATTER_TEST_VENDOR_ID,
    product_name: "Matter device",
};

const THINGPLUS_MATTER: MatterConfig = MatterConfig {
    zap_file: MATTER_ZAP_FILE,
    vendor_name: "SparkFun",
    vendor_id: MATTER_TEST_VENDOR_ID,
    product_name: "Matter device",
};

const SILABS_MATTER: MatterConfig = MatterConfig {
    zap_file: MATTER_ZAP_FILE,
    vendor_name: "Silicon Labs",
    vendor_id: MATTER_TEST_VENDOR_ID,
    product_name: "Matter device",
};

/// Static registry of all buildable platform configurations
pub static PLATFORM_REGISTRY: &[PlatformConfig] = &[
    // ==========================================================================
    // SparkFun Thing Plus Matter
    // ==========================================================================
    PlatformConfig {
        name: "thingplusmatter_ble",
        arduino_variant_name: "thingplusmatter",
        board_opn: "brd2704a",
        protocol_stack: ProtocolStack::BleSilabs,
        prebuild: false,
        ai_capable: false,
        slcp_file: "slcp/thingplusmatter_ble/thingplusmatter_ble.slcp",
        additional_files: THINGPLUS_FILES,
        matter: None,
    },
    PlatformConfig {
        name: "thingplusmatter_ble_precomp",
        arduino_variant_name: "thingplusmatter",
        board_opn: "brd2704a",
        protocol_stack: ProtocolStack::BleSilabs,
        prebuild: true,
        ai_capable: false,
        slcp_file: "slcp/thingplusmatter_ble/thingplusmatter_ble.slcp",
        additional_files: THINGPLUS_FILES,
        matter: None,
    },
    PlatformConfig {
        name: "thingplusmatter_matter",
        arduino_variant_name: "thingplusmatter",
        board_opn: "brd2704a",
        protocol_stack: ProtocolStack::Matter,
        prebuild: false,
        ai_capable: false,
        slcp_file: "slcp/thingplusmatter_matter/thingplusmatter_matter.slcp",
        additional_files: THINGPLUS_FILES,
        matter: Some(THINGPLUS_MATTER),
    },
    PlatformConfig {
        name: "thingplusmatter_matter_precomp",
        arduino_variant_name: "thingplusmatter",
        board_opn: "brd2704a",
        protocol_stack: ProtocolStack::Matter,
        prebuild: true,
        ai_capable: false,
        slcp_file: "slcp/thingplusmatter_matter/thingplusmatter_matter.slcp",
        additional_files: THINGPLUS_FILES,
        matter: Some(THINGPLUS_MATTER),
    },
    // ==========================================================================
    // xG27 Dev Kit
    // ==========================================================================
    PlatformConfig {
        name: "xg27devkit",
        arduino_variant_name: "xg27devkit",
        board_opn: "brd2602a",
        protocol_stack: ProtocolStack::BleSilabs,
        prebuild: false,
        ai_capable: false,
        slcp_file: "slcp/xg27devkit/xg27devkit.slcp",
        additional_files: XG27DEVKIT_FILES,
        matter: None,
    },
    PlatformConfig {
        name: "xg27devkit_precomp",
        arduino_variant_name: "xg27devkit",
        board_opn: "brd2602a",
        protocol_stack: ProtocolStack::BleSilabs,
        prebuild: true,
        ai_capable: false,
        slcp_file: "slcp/xg27devkit/xg27devkit.slcp",
        additional_files: XG27DEVKIT_FILES,
        matter: None,
    },
    PlatformConfig {
        name: "xg27devkit_ble_arduino_precomp",
        arduino_variant_name: "xg27devkit",
        board_opn: "brd2602a",
        protocol_stack: ProtocolStack::BleArduino,
        prebuild: true,
        ai_capable: false,
        slcp_file: "slcp/xg27devkit_ble_arduino/xg27devkit_ble_arduino.slcp",
        additional_files: XG27DEVKIT_FILES,
        matter: None,
    },
    // ==========================================================================
    // xG24 Explorer Kit
    // ==========================================================================
    PlatformConfig {
        name: "xg24explorerkit",
        arduino_variant_name: "xg24explorerkit",
        board_opn: "brd2703a",
        protocol_stack: ProtocolStack::BleSilabs,
        prebuild: false,
        ai_capable: false,
        slcp_file: "slcp/xg24explorerkit/xg24explorerkit.slcp",
        additional_files: XG24EXPLORERKIT_FILES,
        matter: None,
    },
    PlatformConfig {
        name: "xg24explorerkit_precomp",
        arduino_variant_name: "xg24explorerkit",
        board_opn: "brd2703a",
        protocol_stack: ProtocolStack::BleSilabs,
        prebuild: true,
        ai_capable: false,
        slcp_file: "slcp/xg24explorerkit/xg24explorerkit.slcp",
        additional_files: XG24EXPLORERKIT_FILES,
        matter: None,
    },
    PlatformConfig {
        name: "xg24explorerkit_matter",
        arduino_variant_name: "xg24explorerkit",
        board_opn: "brd2703a",
        protocol_stack: ProtocolStack::Matter,
        prebuild: false,
        ai_capable: false,
        slcp_file: "slcp/xg24explorerkit_matter/xg24explorerkit_matter.slcp",
        additional_files: XG24EXPLORERKIT_FILES,
        matter: Some(SILABS_MATTER),
    },
    PlatformConfig {
        name: "xg24explorerkit_matter_precomp",
        arduino_variant_name: "xg24explorerkit",
        board_opn: "brd2703a",
        protocol_stack: ProtocolStack::Matter,
        prebuild: true,
        ai_capable: false,
        slcp_file: "slcp/xg24explorerkit_matter/xg24explorerkit_matter.slcp",
        additional_files: XG24EXPLORERKIT_FILES,
        matter: Some(SILABS_MATTER),
    },
    // ==========================================================================
    // xG24 Dev Kit
    // ==========================================================================
    PlatformConfig {
        name: "xg24devkit_ble_silabs_precomp",
        arduino_variant_name: "xg24devkit",
        board_opn: "brd2601b",
        protocol_stack: ProtocolStack::BleSilabs,
        prebuild: true,
        ai_capable: false,
        slcp_file: "slcp/xg24devkit_ble_silabs/xg24devkit_ble_silabs.slcp",
        additional_files: XG24DEVKIT_FILES,
        matter: None,
    },
    PlatformConfig {
        name: "xg24devkit_matter_precomp",
        arduino_variant_name: "xg24devkit",
        board_opn: "brd2601b",
        protocol_stack: ProtocolStack::Matter,
        prebuild: true,
        ai_capable: false,
        slcp_file: "slcp/xg24devkit_matter/xg24devkit_matter.slcp",
        additional_files: XG24DEVKIT_FILES,
        matter: Some(SILABS_MATTER),
    },
    PlatformConfig {
        name: "xg24devkit_noradio_precomp",
        arduino_variant_name: "xg24devkit",
        board_opn: "brd2601b",
        protocol_stack: ProtocolStack::NoRadio,
        prebuild: true,
        ai_capable: false,
        slcp_file: "slcp/xg24devkit_noradio/xg24devkit_noradio.slcp",
        additional_files: XG24DEVKIT_FILES,
        matter: None,
    },
    // ==========================================================================
    // Seeed Studio XIAO MG24
    // ==========================================================================
    PlatformConfig {
        name: "wio_mg24_ble",
        arduino_variant_name: "xiao_mg24",
        board_opn: "brd2907a",
        protocol_stack: ProtocolStack::BleSilabs,
        prebuild: false,
        ai_capable: false,
        slcp_file: "slcp/wio_mg24/wio_mg24.slcp",
        additional_files: XIAO_MG24_FILES,
        matter: None,
    },
    PlatformConfig {
        name: "wio_mg24_ble_precomp",
        arduino_variant_name: "xiao_mg24",
        board_opn: "brd2907a",
        protocol_stack: ProtocolStack::BleSilabs,
        prebuild: true,
        ai_capable: false,
        slcp_file: "slcp/wio_mg24/wio_mg24.slcp",
        additional_files: XIAO_MG24_FILES,
        matter: None,
    },
    // ==========================================================================
    // BGM220 Explorer Kit
    // ==========================================================================
    PlatformConfig {
        name: "bgm220explorerkit",
        arduino_variant_name: "bgm220explorerkit",
        board_opn: "brd4314a",
        protocol_stack: ProtocolStack::BleSilabs,
        prebuild: false,
        ai_capable: false,
        slcp_file: "slcp/bgm220explorerkit/bgm220explorerkit.slcp",
        additional_files: &[],
        matter: None,
    },
    PlatformConfig {
        name: "bgm220explorerkit_precomp",
        arduino_variant_name: "bgm220explorerkit",
        board_opn: "brd4314a",
        protocol_stack: ProtocolStack::BleSilabs,
        prebuild: true,
        ai_capable: false,
        slcp_file: "slcp/bgm220explorerkit/bgm220explorerkit.slcp",
        additional_files: &[],
        matter: None,
    },
    // ==========================================================================
    // Arduino Nano Matter
    // ==========================================================================
    PlatformConfig {
        name: "nanomatter_ble",
        arduino_variant_name: "nano_matter",
        board_opn: "brd9050a",
        protocol_stack: ProtocolStack::BleSilabs,
        prebuild: false,
        ai_capable: false,
        slcp_file: "slcp/nanomatter_ble/nanomatter_ble.slcp",
        additional_files: NANOMATTER_FILES,
        matter: None,
    },
    PlatformConfig {
        name: "nanomatter_ble_precomp",
        arduino_variant_name: "nano_matter",
        board_opn: "brd9050a",
        protocol_stack: ProtocolStack::BleSilabs,
        prebuild: true,
        ai_capable: false,
        slcp_file: "slcp/nanomatter_ble/nanomatter_ble.slcp",
        additional_files: NANOMATTER_FILES,
        matter: None,
    },
    PlatformConfig {
        name: "nanomatter_ble_arduino_precomp",
        arduino_variant_name: "nano_matter",
        board_opn: "brd9050a",
        protocol_stack: ProtocolStack::BleArduino,
        prebuild: true,
        ai_capable: false,
        slcp_file: "slcp/nanomatter_ble_arduino/nanomatter_ble_arduino.slcp",
        additional_files: NANOMATTER_FILES,
        matter: None,
    },
    PlatformConfig {
        name: "nanomatter_matter",
        arduino_variant_name: "nano_matter",
        board_opn: "brd9050a",
        protocol_stack: ProtocolStack::Matter,
        prebuild: false,
        ai_capable: false,
        slcp_file: "slcp/nanomatter_matter/nanomatter_matter.slcp",
        additional_files: NANOMATTER_FILES,
        matter: Some(NANOMATTER_MATTER),
    },
    PlatformConfig {
        name: "nanomatter_matter_precomp",
        arduino_variant_name: "nano_matter",
        board_opn: "brd9050a",
        protocol_stack: ProtocolStack::Matter,
        prebuild: true,
        ai_capable: false,
        slcp_file: "slcp/nanomatter_matter/nanomatter_matter.slcp",
        additional_files: NANOMATTER_FILES,
        matter: Some(NANOMATTER_MATTER),
    },
    PlatformConfig {
        name: "nanomatter_noradio_precomp",
        arduino_variant_name: "nano_matter",
        board_opn: "brd9050a",
        protocol_stack: ProtocolStack::NoRadio,
        prebuild: true,
        ai_capable: false,
        slcp_file: "slcp/nanomatter_noradio/nanomatter_noradio.slcp",
        additional_files: NANOMATTER_FILES,
        matter: None,
    },
    PlatformConfig {
        name: "nanomatter_noradio_ai_precomp",
        arduino_variant_name: "nano_matter",
        board_opn: "brd9050a",
        protocol_stack: ProtocolStack::NoRadio,
        prebuild: true,
        ai_capable: true,
        slcp_file: "slcp/nanomatter_noradio_ai/nanomatter_noradio_ai.slcp",
        additional_files: NANOMATTER_FILES,
        matter: None,
    },
];

/// Static list of platform groups
pub static PLATFORM_GROUPS: &[PlatformGroup] = &[
    PlatformGroup {
        name: "all",
        description: "Every platform configuration",
        filter: PlatformFilter {
            protocol_stack: None,
            prebuild: None,
            ai_capable: None,
        },
    },
    PlatformGroup {
        name: "precomp_all",
        description: "Every prebuilt platform configuration",
        filter: PlatformFilter {
            protocol_stack: None,
            prebuild: Some(true),
            ai_capable: None,
        },
    },
    PlatformGroup {
        name: "matter_precomp_all",
        description: "Prebuilt Matter platform configurations",
        filter: PlatformFilter {
            protocol_stack: Some(ProtocolStack::Matter),
            prebuild: Some(true),
            ai_capable: None,
        },
    },
    PlatformGroup {
        name: "ble_silabs_precomp_all",
        description: "Prebuilt Silicon Labs BLE platform configurations",
        filter: PlatformFilter {
            protocol_stack: Some(ProtocolStack::BleSilabs),
            prebuild: Some(true),
            ai_capable: None,
        },
    },
    PlatformGroup {
        name: "ble_arduino_precomp_all",
        description: "Prebuilt ArduinoBLE platform configurations",
        filter: PlatformFilter {
            protocol_stack: Some(ProtocolStack::BleArduino),
            prebuild: Some(true),
            ai_capable: None,
        },
    },
    PlatformGroup {
        name: "noradio_precomp_all",
        description: "Prebuilt platform configurations without radio",
        filter: PlatformFilter {
            protocol_stack: Some(ProtocolStack::NoRadio),
            prebuild: Some(true),
            ai_capable: None,
        },
    },
    PlatformGroup {
        name: "ai_precomp_all",
        description: "Prebuilt platform configurations with AI/ML components",
        filter: PlatformFilter {
            protocol_stack: None,
            prebuild: Some(true),
            ai_capable: Some(true),
        },
    },
];

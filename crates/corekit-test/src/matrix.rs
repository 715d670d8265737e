//! Board variants and sketch test lists

use corekit_core::Error;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A board built with one protocol stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub board: &'static str,
    pub stack: &'static str,
}

const fn v(board: &'static str, stack: &'static str) -> Variant {
    Variant { board, stack }
}

impl Variant {
    /// Fully qualified board name including the protocol stack menu option
    pub fn fqbn(&self) -> String {
        format!("{}:protocol_stack={}", board_fqbn(self.board), self.stack)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.board, self.stack)
    }
}

/// Fully qualified board name without menu options
pub fn board_fqbn(board: &str) -> String {
    format!("SiliconLabs:silabs:{board}")
}

pub const ALL_VARIANTS: &[Variant] = &[
    v("nano_matter", "none"),
    v("nano_matter", "ble_arduino"),
    v("nano_matter", "ble_silabs"),
    v("nano_matter", "matter"),
    v("thingplusmatter", "none"),
    v("thingplusmatter", "ble_arduino"),
    v("thingplusmatter", "ble_silabs"),
    v("thingplusmatter", "matter"),
    v("xg24explorerkit", "none"),
    v("xg24explorerkit", "ble_arduino"),
    v("xg24explorerkit", "ble_silabs"),
    v("xg24explorerkit", "matter"),
    v("xg24devkit", "none"),
    v("xg24devkit", "ble_arduino"),
    v("xg24devkit", "ble_silabs"),
    v("xg24devkit", "matter"),
    v("xg27devkit", "none"),
    v("xg27devkit", "ble_arduino"),
    v("xg27devkit", "ble_silabs"),
    v("bgm220explorerkit", "none"),
    v("bgm220explorerkit", "ble_silabs"),
    v("lyra24p20", "none"),
    v("lyra24p20", "ble_arduino"),
    v("lyra24p20", "ble_silabs"),
    v("xiao_mg24", "none"),
    v("xiao_mg24", "ble_arduino"),
    v("xiao_mg24", "ble_silabs"),
    v("xiao_mg24", "matter"),
];

const ALL_BLE_SILABS: &[Variant] = &[
    v("nano_matter", "ble_silabs"),
    v("thingplusmatter", "ble_silabs"),
    v("xg24explorerkit", "ble_silabs"),
    v("xg24devkit", "ble_silabs"),
    v("xg27devkit", "ble_silabs"),
    v("bgm220explorerkit", "ble_silabs"),
    v("lyra24p20", "ble_silabs"),
    v("xiao_mg24", "ble_silabs"),
];

const THINGPLUSMATTER_BLE_SILABS: &[Variant] = &[v("thingplusmatter", "ble_silabs")];
const XG27DEVKIT_BLE_SILABS: &[Variant] = &[v("xg27devkit", "ble_silabs")];
const XIAO_MG24_BLE_SILABS: &[Variant] = &[v("xiao_mg24", "ble_silabs")];

const BOARDS_WITH_PDM: &[Variant] = &[
    v("xg27devkit", "ble_arduino"),
    v("xg27devkit", "ble_silabs"),
    v("xg27devkit", "none"),
];

const BLE_SILABS_BOARDS_WITH_IMU: &[Variant] =
    &[v("xg24devkit", "ble_silabs"), v("xg27devkit", "ble_silabs")];

const BOARDS_WITH_DAC: &[Variant] = &[
    v("nano_matter", "none"),
    v("nano_matter", "ble_arduino"),
    v("nano_matter", "ble_silabs"),
    v("nano_matter", "matter"),
    v("thingplusmatter", "none"),
    v("thingplusmatter", "ble_arduino"),
    v("thingplusmatter", "ble_silabs"),
    v("thingplusmatter", "matter"),
    v("xg24explorerkit", "none"),
    v("xg24explorerkit", "ble_arduino"),
    v("xg24explorerkit", "ble_silabs"),
    v("xg24explorerkit", "matter"),
    v("xg24devkit", "none"),
    v("xg24devkit", "ble_arduino"),
    v("xg24devkit", "ble_silabs"),
    v("xg24devkit", "matter"),
    v("lyra24p20", "none"),
    v("lyra24p20", "ble_arduino"),
    v("lyra24p20", "ble_silabs"),
];

const ALL_MATTER: &[Variant] = &[
    v("nano_matter", "matter"),
    v("thingplusmatter", "matter"),
    v("xg24explorerkit", "matter"),
    v("xg24devkit", "matter"),
    v("xiao_mg24", "matter"),
];

const ALL_AI_ML: &[Variant] = &[v("nano_matter", "none")];
const NANO_MATTER_MATTER: &[Variant] = &[v("nano_matter", "matter")];

/// A sketch and the variants it is built for
pub type TestEntry = (&'static str, &'static [Variant]);

pub const TESTLIST_QUICK: &[TestEntry] = &[("test_sketch/test_sketch.ino", ALL_VARIANTS)];

pub const TESTLIST_COMMON: &[TestEntry] = &[
    ("../../libraries/SiliconLabs/examples/ble_blinky/ble_blinky.ino", ALL_BLE_SILABS),
    ("../../libraries/SiliconLabs/examples/ble_health_thermometer/ble_health_thermometer.ino", ALL_BLE_SILABS),
    ("../../libraries/SiliconLabs/examples/ble_health_thermometer_client/ble_health_thermometer_client.ino", ALL_BLE_SILABS),
    ("../../libraries/SiliconLabs/examples/ble_hid_keyboard/ble_hid_keyboard.ino", ALL_BLE_SILABS),
    ("../../libraries/SiliconLabs/examples/ble_hid_mouse/ble_hid_mouse.ino", BLE_SILABS_BOARDS_WITH_IMU),
    ("../../libraries/SiliconLabs/examples/ble_hid_mouse_xiao_mg24/ble_hid_mouse_xiao_mg24.ino", XIAO_MG24_BLE_SILABS),
    ("../../libraries/SiliconLabs/examples/ble_lightswitch_client/ble_lightswitch_client.ino", ALL_BLE_SILABS),
    ("../../libraries/SiliconLabs/examples/ble_lightswitch_server/ble_lightswitch_server.ino", ALL_BLE_SILABS),
    ("../../libraries/SiliconLabs/examples/ble_minimal/ble_minimal.ino", ALL_BLE_SILABS),
    ("../../libraries/SiliconLabs/examples/ble_scan/ble_scan.ino", ALL_BLE_SILABS),
    ("../../libraries/SiliconLabs/examples/ble_thingplus_battery_gauge/ble_thingplus_battery_gauge.ino", THINGPLUSMATTER_BLE_SILABS),
    ("../../libraries/SiliconLabs/examples/ble_xg27_devkit_sensors/ble_xg27_devkit_sensors.ino", XG27DEVKIT_BLE_SILABS),
    ("../../libraries/SiliconLabs/examples/dac_sawtooth/dac_sawtooth.ino", BOARDS_WITH_DAC),
    ("../../libraries/SiliconLabs/examples/xg27devkit_sensors/xg27devkit_sensors.ino", XG27DEVKIT_BLE_SILABS),
    ("../../libraries/SiliconLabs/examples/thingplusmatter_debug_unix/thingplusmatter_debug_unix.ino", ALL_BLE_SILABS),
    ("../../libraries/SiliconLabs/examples/thingplusmatter_debug_win/thingplusmatter_debug_win.ino", ALL_BLE_SILABS),
    ("../../libraries/ezBLE/examples/ezBLE_callbacks/ezBLE_callbacks.ino", ALL_BLE_SILABS),
    ("../../libraries/ezBLE/examples/ezBLE_send_and_receive/ezBLE_send_and_receive.ino", ALL_BLE_SILABS),
    ("../../libraries/ezBLE/examples/ezBLE_simple_client/ezBLE_simple_client.ino", ALL_BLE_SILABS),
    ("../../libraries/ezBLE/examples/ezBLE_simple_client_callback/ezBLE_simple_client_callback.ino", ALL_BLE_SILABS),
    ("../../libraries/ezBLE/examples/ezBLE_simple_server/ezBLE_simple_server.ino", ALL_BLE_SILABS),
    ("../../libraries/ezWS2812/examples/blink_all/blink_all.ino", ALL_VARIANTS),
    ("../../libraries/ezWS2812/examples/colors/colors.ino", ALL_VARIANTS),
    ("../../libraries/ezWS2812/examples/individual_leds/individual_leds.ino", ALL_VARIANTS),
    ("../../libraries/Si7210_hall/examples/Si7210_hall_measure/Si7210_hall_measure.ino", ALL_VARIANTS),
    ("../../libraries/SilabsMicrophoneAnalog/examples/MicrophoneVolume/MicrophoneVolume.ino", ALL_VARIANTS),
    ("../../libraries/SilabsMicrophonePDM/examples/microphone_sound_level/microphone_sound_level.ino", BOARDS_WITH_PDM),
    ("../../libraries/ArduinoLowPower/examples/DeepSleepExternalOrTimedWakeup/DeepSleepExternalOrTimedWakeup.ino", ALL_VARIANTS),
    ("../../libraries/ArduinoLowPower/examples/DeepSleepExternalWakeup/DeepSleepExternalWakeup.ino", ALL_VARIANTS),
    ("../../libraries/ArduinoLowPower/examples/DeepSleepMemory/DeepSleepMemory.ino", ALL_VARIANTS),
    ("../../libraries/ArduinoLowPower/examples/DeepSleepTimedWakeup/DeepSleepTimedWakeup.ino", ALL_VARIANTS),
    ("../../libraries/ArduinoLowPower/examples/SleepTimedWakeup/SleepTimedWakeup.ino", ALL_VARIANTS),
    ("../../libraries/WatchdogTimer/examples/watchdog_timer_interrupt/watchdog_timer_interrupt.ino", ALL_VARIANTS),
    ("../../libraries/WatchdogTimer/examples/watchdog_timer_reset/watchdog_timer_reset.ino", ALL_VARIANTS),
    ("../../libraries/SilabsTFLiteMicro/examples/imu_capture_nano_matter/imu_capture_nano_matter.ino", ALL_AI_ML),
    ("../../libraries/SilabsTFLiteMicro/examples/magic_wand_nano_matter/magic_wand_nano_matter.ino", ALL_AI_ML),
];

pub const TESTLIST_MATTER: &[TestEntry] = &[
    ("../../libraries/Matter/examples/matter_air_quality_sensor/matter_air_quality_sensor.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_contact_sensor/matter_contact_sensor.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_decommission/matter_decommission.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_door_lock/matter_door_lock.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_fan/matter_fan.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_flow_sensor/matter_flow_sensor.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_humidity_sensor/matter_humidity_sensor.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_illuminance_sensor/matter_illuminance_sensor.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_lightbulb/matter_lightbulb.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_lightbulb_callback/matter_lightbulb_callback.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_lightbulb_color/matter_lightbulb_color.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_lightbulb_custom_name/matter_lightbulb_custom_name.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_lightbulb_dimmable/matter_lightbulb_dimmable.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_lightbulb_dimmable_multiple/matter_lightbulb_dimmable_multiple.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_lightbulb_identify/matter_lightbulb_identify.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_lightbulb_multiple/matter_lightbulb_multiple.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_lightbulb_multiple_color/matter_lightbulb_multiple_color.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_lightbulb_with_button/matter_lightbulb_with_button.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_occupancy_sensor/matter_occupancy_sensor.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_on_off_outlet/matter_on_off_outlet.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_pressure_sensor/matter_pressure_sensor.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_sensor_and_bulb/matter_sensor_and_bulb.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_sensor_multiple/matter_sensor_multiple.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_switch/matter_switch.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_temp_sensor/matter_temp_sensor.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_thermostat/matter_thermostat.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/matter_window_covering/matter_window_covering.ino", ALL_MATTER),
    ("../../libraries/Matter/examples/nano_matter_lightbulb_color/nano_matter_lightbulb_color.ino", NANO_MATTER_MATTER),
];

/// Which sketches a build-matrix run covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TestList {
    Quick,
    Common,
    Matter,
    #[default]
    All,
}

impl TestList {
    /// Sketches and their variants, in build order
    pub fn entries(self) -> Vec<TestEntry> {
        match self {
            Self::Quick => TESTLIST_QUICK.to_vec(),
            Self::Common => TESTLIST_COMMON.to_vec(),
            Self::Matter => TESTLIST_MATTER.to_vec(),
            Self::All => TESTLIST_QUICK
                .iter()
                .chain(TESTLIST_COMMON)
                .chain(TESTLIST_MATTER)
                .copied()
                .collect(),
        }
    }

    /// Total number of builds
    pub fn build_count(self) -> usize {
        self.entries().iter().map(|(_, variants)| variants.len()).sum()
    }
}

impl FromStr for TestList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quick" => Ok(Self::Quick),
            "common" => Ok(Self::Common),
            "matter" => Ok(Self::Matter),
            "all" => Ok(Self::All),
            other => Err(Error::invalid_argument(format!(
                "Unknown test list '{other}', expected one of: quick, common, matter, all"
            ))),
        }
    }
}

impl fmt::Display for TestList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Quick => "quick",
            Self::Common => "common",
            Self::Matter => "matter",
            Self::All => "all",
        };
        write!(f, "{name}")
    }
}

/// Boards known to the test runners, in table order
pub fn boards() -> Vec<&'static str> {
    let mut boards: Vec<&'static str> = Vec::new();
    for variant in ALL_VARIANTS {
        if !boards.contains(&variant.board) {
            boards.push(variant.board);
        }
    }
    boards
}

/// Protocol stacks a board supports
pub fn board_stacks(board: &str) -> Vec<&'static str> {
    ALL_VARIANTS
        .iter()
        .filter(|variant| variant.board == board)
        .map(|variant| variant.stack)
        .collect()
}

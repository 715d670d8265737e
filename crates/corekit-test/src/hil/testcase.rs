//! HIL testcases
//!
//! Every testcase builds and uploads its sketch from `sketches/`, then checks
//! what the board reports over serial or BLE. Testcases that do not apply to
//! a board or stack skip themselves.

use super::io::HilIo;
use crate::matrix::Variant;
use corekit_core::{CommandRunner, CommandSpec, Result};
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Default wait before reading the serial response
const RESPONSE_WAIT: Duration = Duration::from_secs(2);

/// Scan window for BLE advertisements
const BLE_SCAN_TIMEOUT: Duration = Duration::from_secs(2);

/// Highest EEPROM address exercised
const EEPROM_MAX_ADDRESS: u32 = 10_239;

const SENSOR_BOARDS: &[&str] = &["xg27devkit", "xg24devkit"];

/// Result of one testcase run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TestcaseOutcome {
    Passed,
    /// Not applicable to this board or stack; counts as a success
    Skipped,
    Failed { reason: String },
}

impl TestcaseOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}

/// Everything a testcase needs to talk to one board
pub struct TestContext<'a> {
    pub runner: &'a dyn CommandRunner,
    pub io: &'a dyn HilIo,
    /// Folder the `sketches/` paths are relative to
    pub sketch_root: &'a Path,
    pub variant: Variant,
    pub port: &'a str,
    /// Timeout of each compile and upload
    pub timeout: Duration,
}

impl TestContext<'_> {
    /// Compile and upload a sketch; `Ok(false)` when either step failed
    pub async fn build_and_flash(&self, sketch: &str) -> Result<bool> {
        let fqbn = self.variant.fqbn();
        info!("Building '{}' for '{}'", sketch, fqbn);

        let compile = CommandSpec::new("arduino-cli", self.timeout)
            .args(["compile", sketch, "-b", fqbn.as_str(), "--warnings", "all"])
            .current_dir(self.sketch_root);
        let outcome = self.runner.run(&compile).await?;
        if !outcome.success() {
            warn!("Build failed!\n{}", outcome.tail());
            return Ok(false);
        }

        info!("Uploading '{}' to {} on '{}'", sketch, self.variant, self.port);
        let upload = CommandSpec::new("arduino-cli", self.timeout)
            .args(["upload", sketch, "-b", fqbn.as_str(), "-p", self.port])
            .current_dir(self.sketch_root);
        let outcome = self.runner.run(&upload).await?;
        if !outcome.success() {
            warn!("Upload failed!\n{}", outcome.tail());
            return Ok(false);
        }

        Ok(true)
    }

    /// Send `payload` and return the serial response
    pub async fn response(&self, payload: Option<&str>, wait: Duration) -> Result<String> {
        self.io.exchange(self.port, payload, wait).await
    }

    /// Whether the serial response contains `expected`
    pub async fn expect(&self, expected: &str, payload: Option<&str>) -> Result<bool> {
        let response = self.response(payload, RESPONSE_WAIT).await?;
        let matched = response.contains(expected);
        if !matched {
            warn!("Serial response is incorrect, expected '{}'", expected);
        }
        Ok(matched)
    }
}

/// The HIL testcases, in run order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Testcase {
    BasicSmoke,
    SerialEcho,
    Watchdog,
    Eeprom,
    ThingplusBattery,
    ImuSpi,
    Si7021Wire,
    BleSilabsAdvertise,
    BleArduinoAdvertise,
}

impl Testcase {
    pub const ALL: [Testcase; 9] = [
        Self::BasicSmoke,
        Self::SerialEcho,
        Self::Watchdog,
        Self::Eeprom,
        Self::ThingplusBattery,
        Self::ImuSpi,
        Self::Si7021Wire,
        Self::BleSilabsAdvertise,
        Self::BleArduinoAdvertise,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::BasicSmoke => "basic_smoke",
            Self::SerialEcho => "serial_echo",
            Self::Watchdog => "watchdog",
            Self::Eeprom => "eeprom",
            Self::ThingplusBattery => "thingplus_battery",
            Self::ImuSpi => "imu_spi",
            Self::Si7021Wire => "si7021_wire",
            Self::BleSilabsAdvertise => "ble_silabs_advertise",
            Self::BleArduinoAdvertise => "ble_arduino_advertise",
        }
    }

    /// Sketch path relative to the sketch root
    pub fn sketch(self) -> String {
        format!("sketches/hil_{0}/hil_{0}.ino", self.name())
    }

    /// Whether the testcase runs on this variant
    pub fn applies_to(self, variant: &Variant) -> bool {
        match self {
            Self::ThingplusBattery => variant.board == "thingplusmatter",
            Self::ImuSpi | Self::Si7021Wire => SENSOR_BOARDS.contains(&variant.board),
            Self::BleSilabsAdvertise => variant.stack == "ble_silabs",
            Self::BleArduinoAdvertise => variant.stack == "ble_arduino",
            _ => true,
        }
    }

    /// Run the testcase; errors are reported as failures
    pub async fn run(self, ctx: &TestContext<'_>) -> TestcaseOutcome {
        if !self.applies_to(&ctx.variant) {
            return TestcaseOutcome::Skipped;
        }

        match self.build_and_flash(ctx).await {
            Ok(true) => {}
            Ok(false) => return TestcaseOutcome::failed("build or upload failed"),
            Err(e) => return TestcaseOutcome::failed(e.to_string()),
        }

        match self.check(ctx).await {
            Ok(outcome) => outcome,
            Err(e) => TestcaseOutcome::failed(e.to_string()),
        }
    }

    async fn build_and_flash(self, ctx: &TestContext<'_>) -> Result<bool> {
        ctx.build_and_flash(&self.sketch()).await
    }

    async fn check(self, ctx: &TestContext<'_>) -> Result<TestcaseOutcome> {
        let passed = match self {
            Self::BasicSmoke => ctx.expect("Hello, Silabs Arduino!", None).await?,
            Self::SerialEcho => {
                let payload = random_payload(20);
                info!("Serial payload: '{}'", payload);
                ctx.expect(&payload, Some(&payload)).await?
            }
            Self::Watchdog => {
                let response = ctx.response(None, Duration::from_secs(4)).await?;
                watchdog_passed(&response)
            }
            Self::Eeprom => return eeprom(ctx).await,
            Self::ThingplusBattery => {
                let response = ctx.response(None, RESPONSE_WAIT).await?;
                match parse_voltage(&response) {
                    Some(voltage) => {
                        info!("Voltage: {} V", voltage);
                        true
                    }
                    None => false,
                }
            }
            Self::ImuSpi => ctx.expect("IMU WHOAMI: 0x98", None).await?,
            Self::Si7021Wire => {
                let response = ctx.response(None, RESPONSE_WAIT).await?;
                match parse_climate(&response) {
                    Some((temperature, humidity)) => {
                        info!("Temperature: {} C, humidity: {} %", temperature, humidity);
                        true
                    }
                    None => false,
                }
            }
            Self::BleSilabsAdvertise => {
                ctx.io
                    .find_ble_advertiser("Silabs BLE HIL", BLE_SCAN_TIMEOUT)
                    .await?
            }
            Self::BleArduinoAdvertise => {
                ctx.io
                    .find_ble_advertiser("Arduino BLE HIL", BLE_SCAN_TIMEOUT)
                    .await?
            }
        };

        Ok(if passed {
            TestcaseOutcome::Passed
        } else {
            TestcaseOutcome::failed(format!("unexpected response from '{}'", ctx.port))
        })
    }
}

impl fmt::Display for Testcase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Write, read back, reboot and read back again a random EEPROM cell
async fn eeprom(ctx: &TestContext<'_>) -> Result<TestcaseOutcome> {
    let (address, value) = {
        let mut rng = rand::rng();
        (
            rng.random_range(0..=EEPROM_MAX_ADDRESS),
            rng.random_range(0..=u8::MAX),
        )
    };
    info!("EEPROM address: '{}', payload: '{}'", address, value);

    let steps = [
        (format!("a{address}\n"), format!("EEPROM address set to {address}")),
        (format!("w{value}\n"), format!("EEPROM write: {value}")),
        ("r\n".to_string(), format!("EEPROM read: {value}")),
        ("b\n".to_string(), "Rebooting...".to_string()),
        (format!("a{address}\n"), format!("EEPROM address set to {address}")),
        ("r\n".to_string(), format!("EEPROM read: {value}")),
    ];

    for (payload, expected) in &steps {
        if !ctx.expect(expected, Some(payload)).await? {
            return Ok(TestcaseOutcome::failed(format!(
                "expected '{}' after sending '{}'",
                expected,
                payload.trim_end()
            )));
        }
    }
    Ok(TestcaseOutcome::Passed)
}

fn random_payload(len: usize) -> String {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..len)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// Whether the watchdog sketch reported a reset and a restart
pub fn watchdog_passed(response: &str) -> bool {
    [
        "Silicon Labs Watchdog timer test",
        "Watchdog reset imminent at",
        "Device restarted after a watchdog reset",
    ]
    .iter()
    .all(|marker| response.contains(marker))
}

/// First plausible battery voltage line, in volts
pub fn parse_voltage(response: &str) -> Option<f64> {
    response
        .lines()
        .filter_map(|line| line.trim().parse::<f64>().ok())
        .find(|v| *v > 2.0 && *v < 5.5)
}

/// First plausible `<temperature> <humidity>` line
pub fn parse_climate(response: &str) -> Option<(f64, f64)> {
    let plausible = |v: f64| v > 0.0 && v < 100.0;
    response.lines().find_map(|line| {
        let mut fields = line.split(' ');
        let temperature = fields.next()?.trim().parse::<f64>().ok()?;
        let humidity = fields.next()?.trim().parse::<f64>().ok()?;
        (plausible(temperature) && plausible(humidity)).then_some((temperature, humidity))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(board: &'static str, stack: &'static str) -> Variant {
        Variant { board, stack }
    }

    #[test]
    fn test_sketch_paths() {
        assert_eq!(
            Testcase::BasicSmoke.sketch(),
            "sketches/hil_basic_smoke/hil_basic_smoke.ino"
        );
        assert_eq!(
            Testcase::Si7021Wire.sketch(),
            "sketches/hil_si7021_wire/hil_si7021_wire.ino"
        );
    }

    #[test]
    fn test_applicability() {
        let nano_ble = variant("nano_matter", "ble_silabs");
        assert!(Testcase::BasicSmoke.applies_to(&nano_ble));
        assert!(Testcase::BleSilabsAdvertise.applies_to(&nano_ble));
        assert!(!Testcase::BleArduinoAdvertise.applies_to(&nano_ble));
        assert!(!Testcase::ImuSpi.applies_to(&nano_ble));
        assert!(!Testcase::ThingplusBattery.applies_to(&nano_ble));

        assert!(Testcase::Si7021Wire.applies_to(&variant("xg24devkit", "none")));
        assert!(Testcase::ThingplusBattery.applies_to(&variant("thingplusmatter", "matter")));
    }

    #[test]
    fn test_watchdog_markers() {
        let response = "Silicon Labs Watchdog timer test\n\
                        Watchdog reset imminent at 3000 ms\n\
                        Device restarted after a watchdog reset\n";
        assert!(watchdog_passed(response));
        assert!(!watchdog_passed("Silicon Labs Watchdog timer test\n"));
    }

    #[test]
    fn test_parse_voltage() {
        assert_eq!(parse_voltage("MAX17048 ready\n7.1\n3.92\n"), Some(3.92));
        assert_eq!(parse_voltage("0.0\nnan\n"), None);
    }

    #[test]
    fn test_parse_climate() {
        assert_eq!(parse_climate("Si7021 found\n23.5 41.2\n"), Some((23.5, 41.2)));
        assert_eq!(parse_climate("-5.0 40\n20 120\n"), None);
    }

    #[test]
    fn test_random_payload() {
        let payload = random_payload(20);
        assert_eq!(payload.len(), 20);
        assert!(payload
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_outcome_success() {
        assert!(TestcaseOutcome::Passed.is_success());
        assert!(TestcaseOutcome::Skipped.is_success());
        assert!(!TestcaseOutcome::failed("x").is_success());
    }
}

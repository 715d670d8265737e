//! HIL runner against scripted boards

use async_trait::async_trait;
use corekit_core::{exit, CommandOutcome, CommandRunner, CommandSpec, Error, Result};
use corekit_test::{HilIo, HilRunner, HilTarget};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct RecordingRunner {
    calls: Mutex<Vec<CommandSpec>>,
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome> {
        self.calls.lock().unwrap().push(spec.clone());
        Ok(CommandOutcome {
            exit_code: Some(0),
            ..Default::default()
        })
    }
}

/// A board running every HIL sketch correctly; only the Silabs BLE name is advertised
#[derive(Default)]
struct ScriptedBoard {
    eeprom: Mutex<Option<String>>,
}

const IDLE_OUTPUT: &str = "Hello, Silabs Arduino!
IMU WHOAMI: 0x98
23.5 41.2
3.9
Silicon Labs Watchdog timer test
Watchdog reset imminent at 3000 ms
Device restarted after a watchdog reset
";

#[async_trait]
impl HilIo for ScriptedBoard {
    async fn check_port(&self, port: &str) -> Result<()> {
        if port == "/dev/missing" {
            Err(Error::serial(port, "No such file or directory"))
        } else {
            Ok(())
        }
    }

    async fn exchange(&self, _port: &str, payload: Option<&str>, _wait: Duration) -> Result<String> {
        let Some(payload) = payload else {
            return Ok(IDLE_OUTPUT.to_string());
        };
        let Some(command) = payload.strip_suffix('\n') else {
            return Ok(payload.to_string());
        };
        let (op, arg) = command.split_at(1);
        Ok(match op {
            "a" => format!("EEPROM address set to {arg}"),
            "w" => {
                *self.eeprom.lock().unwrap() = Some(arg.to_string());
                format!("EEPROM write: {arg}")
            }
            "r" => format!(
                "EEPROM read: {}",
                self.eeprom.lock().unwrap().clone().unwrap_or_default()
            ),
            "b" => "Rebooting...".to_string(),
            _ => String::new(),
        })
    }

    async fn find_ble_advertiser(&self, name: &str, _timeout: Duration) -> Result<bool> {
        Ok(name == "Silabs BLE HIL")
    }
}

#[tokio::test]
async fn test_hil_run_over_two_boards() {
    let runner = Arc::new(RecordingRunner::default());
    let hil = HilRunner::new(runner.clone(), Arc::new(ScriptedBoard::default()), "test/hil");
    let targets = vec![
        HilTarget::new("xg24devkit", "/dev/ttyACM0").unwrap(),
        HilTarget::new("nano_matter", "/dev/missing").unwrap(),
    ];

    let mut seen = Vec::new();
    let summary = hil.run(&targets, |p| seen.push(p.current)).await;

    assert_eq!(seen.len(), 36);
    assert_eq!(seen.first(), Some(&1));
    assert_eq!(seen.last(), Some(&36));

    let devkit = &summary.boards[0];
    assert_eq!(devkit.completed, 36);
    assert_eq!(devkit.successful, 35);
    assert_eq!(
        devkit.failing,
        vec!["'ble_arduino_advertise' on 'xg24devkit (ble_arduino)'"]
    );

    let nano = &summary.boards[1];
    assert_eq!(nano.completed, 36);
    assert_eq!(nano.successful, 0);
    assert_eq!(nano.failing, vec!["ALL TESTS ON 'nano_matter'"]);

    assert_eq!(summary.completed(), 72);
    assert_eq!(summary.failed(), 37);
    assert_eq!(summary.exit_code(), exit::TESTS_FAILED);

    let calls = runner.calls.lock().unwrap();
    assert_eq!(
        calls[0].args,
        vec![
            "burn-bootloader",
            "--fqbn",
            "SiliconLabs:silabs:xg24devkit",
            "-P",
            "commander",
            "-p",
            "/dev/ttyACM0"
        ]
    );
    assert_eq!(calls.len(), 1 + 26 * 2);
    assert_eq!(calls[1].args[0], "compile");
    assert_eq!(calls[1].args[1], "sketches/hil_basic_smoke/hil_basic_smoke.ino");
    assert_eq!(calls[2].args[0], "upload");
    assert_eq!(calls[2].args.last().unwrap(), "/dev/ttyACM0");
}

#[tokio::test]
async fn test_failed_bootloader_burn_fails_board() {
    struct BurnFails;

    #[async_trait]
    impl CommandRunner for BurnFails {
        async fn run(&self, _spec: &CommandSpec) -> Result<CommandOutcome> {
            Ok(CommandOutcome {
                exit_code: Some(1),
                ..Default::default()
            })
        }
    }

    let hil = HilRunner::new(
        Arc::new(BurnFails),
        Arc::new(ScriptedBoard::default()),
        ".",
    );
    let targets = vec![HilTarget::new("bgm220explorerkit", "/dev/ttyACM1").unwrap()];

    let summary = hil.run(&targets, |_| {}).await;

    assert_eq!(summary.completed(), 18);
    assert_eq!(summary.successful(), 0);
    assert_eq!(
        summary.failing().collect::<Vec<_>>(),
        vec!["ALL TESTS ON 'bgm220explorerkit'"]
    );
}

//! Provisioning flows against a recording runner

use async_trait::async_trait;
use corekit_core::{exit, CommandOutcome, CommandRunner, CommandSpec, Error, Result};
use corekit_provision::{HostOs, Provisioner};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingRunner {
    calls: Mutex<Vec<CommandSpec>>,
    exit_code: i32,
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome> {
        self.calls.lock().unwrap().push(spec.clone());
        Ok(CommandOutcome {
            exit_code: Some(self.exit_code),
            stderr: if self.exit_code == 0 {
                String::new()
            } else {
                "Error: no debug adapter found".to_string()
            },
            ..Default::default()
        })
    }
}

fn provisioner(runner: Arc<RecordingRunner>) -> Provisioner {
    Provisioner::new(runner)
        .with_os(HostOs::Linux)
        .with_tools_dir("/tmp/arduino-tools")
}

#[tokio::test]
async fn test_out_of_range_index_never_invokes_flasher() {
    let runner = Arc::new(RecordingRunner::default());

    let err = provisioner(runner.clone())
        .provision("nano_matter", 5)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidConfigIndex { max: 2 }));
    assert!(err.to_string().contains("Valid config numbers are: 0 to 2"));
    assert_eq!(err.exit_code(), exit::INVALID_INPUT);
    assert!(runner.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_board_never_invokes_flasher() {
    let runner = Arc::new(RecordingRunner::default());

    let err = provisioner(runner.clone())
        .provision("arduino_uno", 0)
        .await
        .unwrap_err();

    assert_eq!(err.exit_code(), exit::INVALID_INPUT);
    assert!(runner.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_successful_flash() {
    let runner = Arc::new(RecordingRunner::default());

    provisioner(runner.clone())
        .provision("thingplus_matter", 2)
        .await
        .unwrap();

    let calls = runner.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].args,
        vec!["flash", "binaries/2_thingplusmatter_nvm3.hex", "-v"]
    );
}

#[tokio::test]
async fn test_flasher_failure_is_fatal() {
    let runner = Arc::new(RecordingRunner {
        exit_code: 1,
        ..Default::default()
    });

    let err = provisioner(runner)
        .provision("nano_matter", 0)
        .await
        .unwrap_err();

    match err {
        Error::CommandFailed { exit_code, output, .. } => {
            assert_eq!(exit_code, Some(1));
            assert!(output.contains("no debug adapter"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

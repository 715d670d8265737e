//! Build matrix against a scripted compiler

use async_trait::async_trait;
use corekit_core::{exit, CommandOutcome, CommandRunner, CommandSpec, Error, Result};
use corekit_test::{BuildMatrix, TestList};
use std::sync::{Arc, Mutex};

/// Fails every lyra24p20 build, warns on Matter builds, times out on xiao_mg24 none
#[derive(Default)]
struct ScriptedCompiler {
    calls: Mutex<Vec<CommandSpec>>,
}

#[async_trait]
impl CommandRunner for ScriptedCompiler {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome> {
        self.calls.lock().unwrap().push(spec.clone());
        let fqbn = &spec.args[3];

        if fqbn.ends_with("xiao_mg24:protocol_stack=none") {
            return Err(Error::CommandTimeout {
                command: spec.display(),
                timeout_secs: spec.timeout.as_secs(),
            });
        }

        let exit_code = if fqbn.contains(":lyra24p20:") { 1 } else { 0 };
        let stderr = if fqbn.ends_with("=matter") {
            "sketch.ino:12:5: warning: unused variable 'x'".to_string()
        } else {
            String::new()
        };
        Ok(CommandOutcome {
            exit_code: Some(exit_code),
            stderr,
            ..Default::default()
        })
    }
}

#[tokio::test]
async fn test_quick_matrix_summary() {
    let compiler = Arc::new(ScriptedCompiler::default());
    let matrix = BuildMatrix::new(compiler.clone(), "test/build");

    let mut progress = Vec::new();
    let summary = matrix
        .run(TestList::Quick, |p| progress.push((p.current, p.total)))
        .await
        .unwrap();

    assert_eq!(summary.total, 28);
    assert_eq!(progress.first(), Some(&(1, 28)));
    assert_eq!(progress.last(), Some(&(28, 28)));

    assert_eq!(summary.failed.len(), 4);
    assert_eq!(summary.successful, 24);
    assert!(summary
        .failed
        .contains(&"test_sketch/test_sketch.ino on 'lyra24p20' with 'ble_silabs'".to_string()));
    assert!(summary
        .failed
        .contains(&"test_sketch/test_sketch.ino on 'xiao_mg24' with 'none'".to_string()));

    assert_eq!(summary.with_warnings.len(), 5);
    assert_eq!(summary.exit_code(), exit::TESTS_FAILED);

    let calls = compiler.calls.lock().unwrap();
    assert_eq!(
        calls[0].args,
        vec![
            "compile",
            "test_sketch/test_sketch.ino",
            "-b",
            "SiliconLabs:silabs:nano_matter:protocol_stack=none",
            "--warnings",
            "all"
        ]
    );
    assert_eq!(calls[0].cwd.as_deref(), Some(std::path::Path::new("test/build")));
}

#[tokio::test]
async fn test_missing_compiler_aborts() {
    struct Missing;

    #[async_trait]
    impl CommandRunner for Missing {
        async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome> {
            Err(Error::CommandSpawn {
                command: spec.program.clone(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }

    let matrix = BuildMatrix::new(Arc::new(Missing), ".");
    let err = matrix.run(TestList::Quick, |_| {}).await.unwrap_err();
    assert!(matches!(err, Error::CommandSpawn { .. }));
}

//! End-to-end pipeline tests with a simulated generator and build

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use corekit_core::{
    exit, AdditionalFile, CommandOutcome, CommandRunner, CommandSpec, Error, MatterConfig,
    PlatformConfig, ProtocolStack, Result, ToolConfig,
};
use corekit_gsdk::license::MIT_LICENSE;
use corekit_gsdk::{GenerateOptions, GsdkGenerator};
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const MAKEFILE: &str = "\
all: $(OUTPUT_DIR)/$(PROJECTNAME).out
\t@echo $(OBJS) > $(OUTPUT_DIR)/linker_objs
\t$(ECHO)$(LD) $(LD_FLAGS) @$(OUTPUT_DIR)/linker_objs $(LIBS) -o $(OUTPUT_DIR)/$(PROJECTNAME).out
\t$(ECHO)$(OBJCOPY) $(OUTPUT_DIR)/$(PROJECTNAME).out -O binary $(OUTPUT_DIR)/$(PROJECTNAME).bin
\t$(ECHO)$(OBJCOPY) $(OUTPUT_DIR)/$(PROJECTNAME).out -O ihex $(OUTPUT_DIR)/$(PROJECTNAME).hex
\t$(ECHO)$(OBJCOPY) $(OUTPUT_DIR)/$(PROJECTNAME).out -O srec $(OUTPUT_DIR)/$(PROJECTNAME).s37
";

const MAK: &str = "\
$(OUTPUT_DIR)/project/main.o: main.c
\t@echo 'Building main.c'
\t@$(MKDIR) $(@D)
\t$(ECHO)$(CC) $(CFLAGS) -c -o $@ main.c
CDEPS += $(OUTPUT_DIR)/project/main.d
OBJS += $(OUTPUT_DIR)/project/main.o
";

/// Simulates `slc` and `make` by writing what they would produce
struct SimulatedRunner {
    calls: Mutex<Vec<CommandSpec>>,
    slc_exit: i32,
    build_produces_archive: bool,
}

impl SimulatedRunner {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            slc_exit: 0,
            build_produces_archive: true,
        }
    }

    fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    fn generate(gen_dir: &Utf8Path) {
        let write = |rel: &str, content: &str| {
            let path = gen_dir.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        };
        write("board.Makefile", MAKEFILE);
        write("board.project.mak", MAK);
        write("autogen/linkerfile.ld", "MEMORY {}\n");
        write("autogen/sl_event_handler.c", "#include \"sl_event_handler.h\"\n");
        write("autogen/sl_event_handler.h", "/*\n * vendor\n */\n");
        write("autogen/zap-generated/gen_config.h",
            "#define EMBER_AF_COLOR_CONTROL_CLUSTER_SERVER_ENDPOINT_COUNT (1)\n");
        write("config/sl_board_config.h", "#pragma once\n");
        write("gecko_sdk_4.4.0/a/dup.h", "A\n");
        write("gecko_sdk_4.4.0/b/dup.h", "B\n");
        write("gecko_sdk_4.4.0/platform/common/inc/sl_status.h", "status\n");
        write("gecko_sdk_4.4.0/platform/common/src/sl_status.c", "int x;\n");
        write(
            "gecko_sdk_4.4.0/util/third_party/mbedtls/include/psa/crypto.h",
            "psa\n",
        );
        write(
            "gecko_sdk_4.4.0/util/third_party/mbedtls/include/mbedtls/ssl.h",
            "mbedtls\n",
        );
        write(
            "matter_2.2.0/src/include/platform/CHIPDeviceConfig.h",
            "#define CHIP_DEVICE_CONFIG_DEVICE_VENDOR_NAME \"TEST_VENDOR\"\n\
             #define CHIP_DEVICE_CONFIG_DYNAMIC_ENDPOINT_COUNT 0\n",
        );
        write("matter_2.2.0/src/app/server/Server.cpp", "void f() {}\n");
        write("matter_2.2.0/src/platform/startup.S", "nop\n");
        write("include/AppConfig.h", "app\n");
    }
}

#[async_trait]
impl CommandRunner for SimulatedRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome> {
        self.calls.lock().unwrap().push(spec.clone());

        let exit_code = match spec.program.as_str() {
            "slc" => {
                if self.slc_exit == 0 {
                    let d = spec.args.iter().position(|a| a == "-d").unwrap();
                    Self::generate(Utf8Path::new(&spec.args[d + 1]));
                }
                self.slc_exit
            }
            "make" => {
                let gen_dir = Utf8PathBuf::from_path_buf(spec.cwd.clone().unwrap()).unwrap();
                if self.build_produces_archive {
                    fs::write(gen_dir.join("gsdk.a"), "!<arch>\n").unwrap();
                    let lib = gen_dir.join("gecko_sdk_4.4.0/protocol/bluetooth/lib/libbt.a");
                    fs::create_dir_all(lib.parent().unwrap()).unwrap();
                    fs::write(lib, "!<arch>\n").unwrap();
                    0
                } else {
                    2
                }
            }
            other => panic!("unexpected program {other}"),
        };

        Ok(CommandOutcome {
            exit_code: Some(exit_code),
            stderr: if exit_code == 0 {
                String::new()
            } else {
                "error: simulated failure".to_string()
            },
            ..Default::default()
        })
    }
}

struct Fixture {
    _temp: TempDir,
    root: Utf8PathBuf,
    config: ToolConfig,
}

fn leak(path: Utf8PathBuf) -> &'static str {
    Box::leak(path.into_string().into_boxed_str())
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();

        for dir in [
            "sdk/app/bluetooth/example/bt_soc_empty",
            "sdk/hardware/board/component",
            "sdk/protocol/bluetooth/bgstack/ll/inc",
            "sdk/extension/matter_extension/slc/sample-app/lighting-app/efr32",
            "sdk/extension/matter_extension/examples/lighting-app/silabs/efr32/data_model",
            "project",
        ] {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
        fs::write(root.join("sdk/hardware/board/component/brd0000a.slcc"), "vendor slcc").unwrap();
        fs::write(
            root.join("sdk/protocol/bluetooth/bgstack/ll/inc/sl_btctrl_hci.h"),
            "hci\n",
        )
        .unwrap();
        fs::write(root.join("project/board.slcp"), "project: board").unwrap();
        fs::write(root.join("project/board_config.h"), "#pragma once").unwrap();
        fs::write(root.join("project/brd0000a.slcc"), "board slcc").unwrap();
        fs::write(root.join("project/arduino_matter.zap"), "{}").unwrap();
        fs::write(root.join("gsdk_license"), "license text").unwrap();

        let config = ToolConfig {
            gsdk_dir: root.join("sdk"),
            output_dir: root.join("out"),
            gsdk_version: "4.4.0".to_string(),
            matter_extension_version: "2.2.0".to_string(),
            gen_dir: root.join("gen"),
            variants_dir: root.join("variants"),
            license_file: root.join("gsdk_license"),
            make_jobs: 20,
        };

        Self {
            _temp: temp,
            root,
            config,
        }
    }

    fn platform(&self, name: &'static str, stack: ProtocolStack, prebuild: bool) -> PlatformConfig {
        let files: &'static [AdditionalFile] = Box::leak(Box::new([
            AdditionalFile::Plain(leak(self.root.join("project/board_config.h"))),
            AdditionalFile::Targeted {
                source: leak(self.root.join("project/brd0000a.slcc")),
                target_dir: "hardware/board/component/",
            },
        ]));

        PlatformConfig {
            name,
            arduino_variant_name: "testboard",
            board_opn: "brd0000a",
            protocol_stack: stack,
            prebuild,
            ai_capable: false,
            slcp_file: leak(self.root.join("project/board.slcp")),
            additional_files: files,
            matter: (stack == ProtocolStack::Matter).then(|| MatterConfig {
                zap_file: leak(self.root.join("project/arduino_matter.zap")),
                vendor_name: "Arduino",
                vendor_id: 0xFFF1,
                product_name: "Matter device",
            }),
        }
    }

    fn assert_vendor_tree_clean(&self) {
        assert!(!self
            .root
            .join("sdk/app/bluetooth/example/bt_soc_empty/board.slcp")
            .exists());
        assert!(!self
            .root
            .join("sdk/app/bluetooth/example/bt_soc_empty/board_config.h")
            .exists());
        assert_eq!(
            fs::read_to_string(self.root.join("sdk/hardware/board/component/brd0000a.slcc"))
                .unwrap(),
            "vendor slcc"
        );
    }
}

#[tokio::test]
async fn test_prebuilt_ble_arduino_variant() {
    let fixture = Fixture::new();
    let runner = Arc::new(SimulatedRunner::new());
    let generator = GsdkGenerator::new(fixture.config.clone(), runner.clone());
    let platform = fixture.platform("testboard_ble_arduino_precomp", ProtocolStack::BleArduino, true);

    let report = generator.generate(&platform).await.unwrap();

    let out = fixture.root.join("out/gen_gsdk_testboard_ble_arduino_precomp");
    assert!(out.join("gsdk.a").is_file());
    assert!(out.join("libbt.a").is_file());
    assert!(out.join("linkerfile.ld").is_file());
    assert_eq!(fs::read_to_string(out.join("LICENSE")).unwrap(), "license text");
    assert_eq!(fs::read_to_string(out.join("include/psa/crypto.h")).unwrap(), "psa\n");
    assert_eq!(fs::read_to_string(out.join("include/mbedtls/ssl.h")).unwrap(), "mbedtls\n");
    assert!(out.join("include/sl_status.h").is_file());
    assert!(out.join("include/sl_btctrl_hci.h").is_file());
    assert!(!out.join("include/crypto.h").exists());
    assert_eq!(fs::read_to_string(out.join("include/dup.h")).unwrap(), "A\n");

    assert_eq!(report.collect.collisions.len(), 1);
    assert!(report.collect.archives.contains(&"gsdk.a".to_string()));

    let rules: Vec<&str> = report.patches.iter().map(|p| p.rule).collect();
    assert_eq!(rules, vec!["archive-objects", "skip-link", "skip-main-c"]);

    let licensed = fs::read_to_string(out.join("include/sl_event_handler.h")).unwrap();
    assert_eq!(licensed, "/*\n * vendor\n */\n");
    assert_eq!(report.license.licensed.len(), 3);
    assert!(report
        .license
        .licensed
        .iter()
        .all(|p| !p.to_string_lossy().contains("gecko_sdk")));

    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].program, "slc");
    assert!(calls[0]
        .args
        .windows(2)
        .any(|w| w[0] == "--with" && w[1] == "brd0000a"));
    assert_eq!(calls[1].program, "make");
    assert_eq!(calls[1].args, vec!["-f", "board.Makefile", "-j", "20"]);

    fixture.assert_vendor_tree_clean();
    assert!(!fixture.root.join("gen").exists());
}

#[tokio::test]
async fn test_missing_archive_fails_with_distinct_status_and_cleans_up() {
    let fixture = Fixture::new();
    let runner = Arc::new(SimulatedRunner {
        build_produces_archive: false,
        ..SimulatedRunner::new()
    });
    let generator = GsdkGenerator::new(fixture.config.clone(), runner);
    let platform = fixture.platform("testboard_precomp", ProtocolStack::BleSilabs, true);

    let err = generator.generate(&platform).await.unwrap_err();

    assert!(matches!(err, Error::ArchiveMissing { .. }));
    assert_eq!(err.exit_code(), exit::ARCHIVE_MISSING);
    assert!(!fixture.root.join("out/gen_gsdk_testboard_precomp").exists());
    fixture.assert_vendor_tree_clean();
    assert!(!fixture.root.join("gen").exists());
}

#[tokio::test]
async fn test_failed_generation_is_fatal_and_cleans_up() {
    let fixture = Fixture::new();
    let runner = Arc::new(SimulatedRunner {
        slc_exit: 1,
        ..SimulatedRunner::new()
    });
    let generator = GsdkGenerator::new(fixture.config.clone(), runner.clone());
    let platform = fixture.platform("testboard_precomp", ProtocolStack::BleSilabs, true);

    let err = generator.generate(&platform).await.unwrap_err();

    assert!(matches!(err, Error::CommandFailed { exit_code: Some(1), .. }));
    assert_eq!(runner.calls().len(), 1);
    fixture.assert_vendor_tree_clean();
}

#[tokio::test]
async fn test_full_source_matter_variant() {
    let fixture = Fixture::new();
    let runner = Arc::new(SimulatedRunner::new());
    let generator = GsdkGenerator::new(fixture.config.clone(), runner.clone());
    let platform = fixture.platform("testboard_matter", ProtocolStack::Matter, false);

    let report = generator.generate(&platform).await.unwrap();

    let out = fixture.root.join("out/gen_gsdk_testboard_matter");
    assert_eq!(
        fs::read_to_string(out.join("gecko_sdk_4.4.0/LICENSE")).unwrap(),
        "license text"
    );
    assert!(out.join("include/AppConfig.h").is_file());
    assert!(out.join("matter_2.2.0/src/app/server/Server.cpp").is_file());

    let device_config =
        fs::read_to_string(out.join("matter_2.2.0/src/include/platform/CHIPDeviceConfig.h"))
            .unwrap();
    assert!(device_config.contains("#define CHIP_DEVICE_CONFIG_DEVICE_VENDOR_NAME \"Arduino\""));
    assert!(device_config.contains("#define CHIP_DEVICE_CONFIG_DYNAMIC_ENDPOINT_COUNT 16"));

    let gen_config =
        fs::read_to_string(out.join("autogen/zap-generated/gen_config.h")).unwrap();
    assert!(gen_config.starts_with(MIT_LICENSE));
    assert!(gen_config.contains("ENDPOINT_COUNT (16)"));

    assert!(report.patches.iter().all(|p| !p.rule.starts_with("skip-")));
    assert!(!fixture
        .root
        .join("sdk/extension/matter_extension/examples/lighting-app/silabs/efr32/data_model/lighting-app.zap")
        .exists());
    assert!(!fixture
        .root
        .join("sdk/extension/matter_extension/slc/sample-app/lighting-app/efr32/board.slcp")
        .exists());
}

#[tokio::test]
async fn test_prebuilt_matter_strips_sources() {
    let fixture = Fixture::new();
    let runner = Arc::new(SimulatedRunner::new());
    let generator = GsdkGenerator::new(fixture.config.clone(), runner);
    let platform = fixture.platform("testboard_matter_precomp", ProtocolStack::Matter, true);

    let report = generator.generate(&platform).await.unwrap();

    let out = fixture.root.join("out/gen_gsdk_testboard_matter_precomp");
    assert!(out.join("gsdk.a").is_file());
    assert!(out.join("matter_2.2.0/src/include/platform/CHIPDeviceConfig.h").is_file());
    assert!(!out.join("matter_2.2.0/src/app/server/Server.cpp").exists());
    assert!(!out.join("matter_2.2.0/src/platform/startup.S").exists());
    assert!(!out.join("autogen/sl_event_handler.c").exists());
    assert!(!out.join("gecko_sdk_4.4.0/platform/common/src/sl_status.c").exists());
    assert!(out.join("linkerfile.ld").is_file());
    assert!(out.join("LICENSE").is_file());
    assert_eq!(report.collect.stripped, 4);
}

#[tokio::test]
async fn test_group_run_with_keep_and_mirror() {
    let fixture = Fixture::new();
    let runner = Arc::new(SimulatedRunner::new());
    let generator = GsdkGenerator::new(fixture.config.clone(), runner.clone()).with_options(
        GenerateOptions {
            keep: true,
            mirror: true,
        },
    );
    let first = fixture.platform("testboard_precomp", ProtocolStack::BleSilabs, true);
    let second = fixture.platform("testboard_noradio_precomp", ProtocolStack::NoRadio, true);

    fs::create_dir_all(fixture.root.join("variants/testboard/noradio")).unwrap();
    fs::write(fixture.root.join("variants/testboard/noradio/stale.a"), "old").unwrap();

    let reports = generator.generate_all(&[&first, &second]).await.unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(runner.calls().len(), 4);
    assert!(fixture.root.join("gen/gsdk.a").is_file());
    assert!(fixture
        .root
        .join("variants/testboard/ble_silabs/gsdk.a")
        .is_file());
    assert!(fixture
        .root
        .join("variants/testboard/noradio/include/psa/crypto.h")
        .is_file());
    assert!(!fixture
        .root
        .join("variants/testboard/noradio/stale.a")
        .exists());
    fixture.assert_vendor_tree_clean();
}

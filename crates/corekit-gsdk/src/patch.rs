//! Post-generation patch rules
//!
//! The generated makefiles and Matter headers are patched by an explicit
//! list of named rules. Matching is plain substring containment against
//! each line; the rules are applied to text in memory and the file layer
//! only reads and rewrites.
//!
//! These rules are coupled to the exact output of the vendor generator. A
//! rule that no longer matches is not an error, it simply reports nothing.

use camino::Utf8Path;
use corekit_core::{Error, MatterConfig, Result};
use std::fs;
use tracing::{debug, info};

/// Edit applied to a matching line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchAction {
    /// Insert a line after the match
    InsertAfter(String),
    /// Prefix the match and the given number of following lines with `#`
    CommentOut { following: usize },
    /// Replace the whole matching line
    ReplaceLine(String),
}

/// A named `(pattern, action)` rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRule {
    pub name: &'static str,
    pub pattern: &'static str,
    pub action: PatchAction,
}

impl PatchRule {
    pub fn new(name: &'static str, pattern: &'static str, action: PatchAction) -> Self {
        Self {
            name,
            pattern,
            action,
        }
    }
}

/// A rule application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedPatch {
    pub rule: &'static str,
    /// 1-based line number of the match in the input
    pub line: usize,
}

/// Apply rules to text in a single pass
///
/// Each line is tested against the rules in order and the first matching
/// rule wins. Lines consumed by a comment-out window are not matched again,
/// so matches never overlap; the window is truncated at end of input.
pub fn apply_rules(text: &str, rules: &[PatchRule]) -> (String, Vec<AppliedPatch>) {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let mut out = String::with_capacity(text.len() + 128);
    let mut applied = Vec::new();
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];
        let Some(rule) = rules.iter().find(|r| line.contains(r.pattern)) else {
            out.push_str(line);
            index += 1;
            continue;
        };

        applied.push(AppliedPatch {
            rule: rule.name,
            line: index + 1,
        });

        match &rule.action {
            PatchAction::InsertAfter(inserted) => {
                push_line(&mut out, line);
                out.push_str(inserted);
                out.push('\n');
                index += 1;
            }
            PatchAction::CommentOut { following } => {
                let end = (index + following + 1).min(lines.len());
                for commented in &lines[index..end] {
                    out.push('#');
                    out.push_str(commented);
                }
                index = end;
            }
            PatchAction::ReplaceLine(replacement) => {
                out.push_str(replacement);
                if line.ends_with('\n') {
                    out.push('\n');
                }
                index += 1;
            }
        }
    }

    (out, applied)
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    if !line.ends_with('\n') {
        out.push('\n');
    }
}

/// Read a file, apply rules and write it back
pub fn patch_file(path: &Utf8Path, rules: &[PatchRule]) -> Result<Vec<AppliedPatch>> {
    let text = fs::read_to_string(path)
        .map_err(|e| Error::file_operation("read", path.as_std_path(), e))?;
    let (patched, applied) = apply_rules(&text, rules);

    if applied.is_empty() {
        debug!("No patch rule matched in {}", path);
        return Ok(applied);
    }

    fs::write(path, patched).map_err(|e| Error::file_operation("write", path.as_std_path(), e))?;
    for patch in &applied {
        info!("Patched {}:{} ({})", path, patch.line, patch.rule);
    }
    Ok(applied)
}

/// Rules turning the primary makefile's link step into an archive step
pub fn makefile_rules() -> Vec<PatchRule> {
    vec![
        PatchRule::new(
            "archive-objects",
            "@echo $(OBJS) > $(OUTPUT_DIR)/linker_objs",
            PatchAction::InsertAfter("\t$(ECHO)$(AR) rcs gsdk.a $(OBJS)".to_string()),
        ),
        PatchRule::new(
            "skip-link",
            "$(ECHO)$(LD) $(LD_FLAGS) @$(OUTPUT_DIR)/linker_objs $(LIBS) -o $(OUTPUT_DIR)/$(PROJECTNAME).out",
            PatchAction::CommentOut { following: 3 },
        ),
    ]
}

/// Application sources excluded from the archive
const APPLICATION_RECIPES: &[(&str, &str)] = &[
    ("skip-main-c", "$(OUTPUT_DIR)/project/main.o: main.c"),
    ("skip-app-c", "$(OUTPUT_DIR)/project/app.o: app.c"),
    ("skip-main-cpp", "$(OUTPUT_DIR)/project/src/main.o: src/main.cpp"),
    ("skip-app-task", "$(OUTPUT_DIR)/project/src/AppTask.o: src/AppTask.cpp"),
    (
        "skip-lighting-manager",
        "$(OUTPUT_DIR)/project/src/LightingManager.o: src/LightingManager.cpp",
    ),
    (
        "skip-zcl-callbacks",
        "$(OUTPUT_DIR)/project/src/ZclCallbacks.o: src/ZclCallbacks.cpp",
    ),
];

/// Rules dropping the application object recipes from the sub-makefile
pub fn mak_rules() -> Vec<PatchRule> {
    APPLICATION_RECIPES
        .iter()
        .map(|&(name, pattern)| {
            PatchRule::new(name, pattern, PatchAction::CommentOut { following: 5 })
        })
        .collect()
}

/// Dynamic endpoints allowed by the patched Matter configuration
pub const MATTER_ENDPOINT_COUNT: u32 = 16;

fn define(name: &str, value: impl std::fmt::Display) -> String {
    format!("#define {} {}", name, value)
}

/// Rules rewriting the Matter device configuration header
pub fn chip_device_config_rules(matter: &MatterConfig) -> Vec<PatchRule> {
    vec![
        PatchRule::new(
            "dynamic-endpoint-count",
            "#define CHIP_DEVICE_CONFIG_DYNAMIC_ENDPOINT_COUNT",
            PatchAction::ReplaceLine(define(
                "CHIP_DEVICE_CONFIG_DYNAMIC_ENDPOINT_COUNT",
                MATTER_ENDPOINT_COUNT,
            )),
        ),
        PatchRule::new(
            "vendor-name",
            "#define CHIP_DEVICE_CONFIG_DEVICE_VENDOR_NAME",
            PatchAction::ReplaceLine(define(
                "CHIP_DEVICE_CONFIG_DEVICE_VENDOR_NAME",
                format!("\"{}\"", matter.vendor_name),
            )),
        ),
        PatchRule::new(
            "vendor-id",
            "#define CHIP_DEVICE_CONFIG_DEVICE_VENDOR_ID",
            PatchAction::ReplaceLine(define(
                "CHIP_DEVICE_CONFIG_DEVICE_VENDOR_ID",
                format!("0x{:04X}", matter.vendor_id),
            )),
        ),
        PatchRule::new(
            "product-name",
            "#define CHIP_DEVICE_CONFIG_DEVICE_PRODUCT_NAME",
            PatchAction::ReplaceLine(define(
                "CHIP_DEVICE_CONFIG_DEVICE_PRODUCT_NAME",
                format!("\"{}\"", matter.product_name),
            )),
        ),
        PatchRule::new(
            "hardware-version-string",
            "#define CHIP_DEVICE_CONFIG_DEFAULT_DEVICE_HARDWARE_VERSION_STRING",
            PatchAction::ReplaceLine(define(
                "CHIP_DEVICE_CONFIG_DEFAULT_DEVICE_HARDWARE_VERSION_STRING",
                "\"v1.0\"",
            )),
        ),
        PatchRule::new(
            "test-serial-number",
            "#define CHIP_DEVICE_CONFIG_TEST_SERIAL_NUMBER",
            PatchAction::ReplaceLine(define(
                "CHIP_DEVICE_CONFIG_TEST_SERIAL_NUMBER",
                "\"42069\"",
            )),
        ),
    ]
}

/// Rules rewriting the ZAP-generated configuration header
pub fn zap_gen_config_rules() -> Vec<PatchRule> {
    vec![PatchRule::new(
        "color-control-endpoint-count",
        "#define EMBER_AF_COLOR_CONTROL_CLUSTER_SERVER_ENDPOINT_COUNT",
        PatchAction::ReplaceLine(define(
            "EMBER_AF_COLOR_CONTROL_CLUSTER_SERVER_ENDPOINT_COUNT",
            format!("({})", MATTER_ENDPOINT_COUNT),
        )),
    )]
}

//! # corekit-test
//!
//! Regression runners for the Arduino core:
//! - Build matrix: compiles example sketches for every supported
//!   `(board, protocol_stack)` variant with `arduino-cli`
//! - Hardware-in-loop: burns the bootloader, uploads test sketches and checks
//!   the serial or BLE behaviour of attached boards
//!
//! BLE advertisement scanning requires the `ble` feature.

#[cfg(feature = "ble")]
pub mod ble;
pub mod build;
pub mod hil;
pub mod matrix;

pub use build::{BuildMatrix, BuildOutcome, BuildProgress, BuildSummary, BUILD_TIMEOUT};
pub use hil::{parse_targets, HardwareIo, HilIo, HilRunner, HilSummary, HilTarget};
pub use matrix::{TestList, Variant, ALL_VARIANTS};

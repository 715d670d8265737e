//! Hardware-in-loop test runner
//!
//! Boards are taken from the command line or a config file, each board gets
//! its bootloader burned and then runs every testcase for every protocol
//! stack it supports.

pub mod io;
pub mod runner;
pub mod testcase;

pub use io::{HardwareIo, HilIo, SERIAL_BAUD_RATE};
pub use runner::{BoardReport, HilProgress, HilRunner, HilSummary, HIL_COMMAND_TIMEOUT};
pub use testcase::{TestContext, Testcase, TestcaseOutcome};

use crate::matrix::{board_stacks, boards};
use corekit_core::{Error, Result};
use serde::Serialize;

/// A board attached to a serial port
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HilTarget {
    pub board: String,
    pub port: String,
}

impl HilTarget {
    /// Create a target, rejecting boards without HIL variants
    pub fn new(board: impl Into<String>, port: impl Into<String>) -> Result<Self> {
        let board = board.into();
        if board_stacks(&board).is_empty() {
            return Err(Error::UnknownBoard {
                name: board,
                available: boards().into_iter().map(String::from).collect(),
            });
        }
        Ok(Self {
            board,
            port: port.into(),
        })
    }
}

/// Parse a HIL config file
///
/// Each non-comment line holds `<board> <port>`; lines starting with `#`
/// and blank lines are ignored.
pub fn parse_targets(text: &str) -> Result<Vec<HilTarget>> {
    let mut targets = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(board), Some(port)) = (fields.next(), fields.next()) else {
            return Err(Error::invalid_config(format!(
                "line {}: expected '<board> <port>', got '{}'",
                number + 1,
                line
            )));
        };
        targets.push(HilTarget::new(board, port)?);
    }
    Ok(targets)
}

/// Number of testcase runs for a set of targets
pub fn count_tests(targets: &[HilTarget]) -> usize {
    targets
        .iter()
        .map(|t| board_stacks(&t.board).len() * Testcase::ALL.len())
        .sum()
}

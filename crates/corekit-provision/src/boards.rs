//! Boards that accept provisioning data

use corekit_core::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Flasher used to write provisioning images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlasherTool {
    /// OpenOCD over CMSIS-DAP
    OpenOcd,
    /// Simplicity Commander
    SimplicityCommander,
}

impl fmt::Display for FlasherTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenOcd => write!(f, "openocd"),
            Self::SimplicityCommander => write!(f, "simplicitycommander"),
        }
    }
}

/// A board and its ordered provisioning images
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProvisionBoard {
    pub name: &'static str,
    pub flasher: FlasherTool,
    /// Image file names under the binaries folder; index 0 is the empty NVM3
    pub configs: &'static [&'static str],
}

impl ProvisionBoard {
    /// Image for a config number
    ///
    /// Negative and out-of-range numbers fail with
    /// [`Error::InvalidConfigIndex`] naming the highest valid number.
    pub fn config_file(&self, index: i64) -> Result<&'static str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.configs.get(i).copied())
            .ok_or(Error::InvalidConfigIndex {
                max: self.configs.len() as i64 - 1,
            })
    }
}

/// Supported boards
pub const PROVISION_BOARDS: &[ProvisionBoard] = &[
    ProvisionBoard {
        name: "nano_matter",
        flasher: FlasherTool::OpenOcd,
        configs: &[
            "0_nanomatter_nvm3.hex",
            "1_nanomatter_nvm3.hex",
            "2_nanomatter_nvm3.hex",
        ],
    },
    ProvisionBoard {
        name: "thingplus_matter",
        flasher: FlasherTool::SimplicityCommander,
        configs: &[
            "0_thingplusmatter_nvm3.hex",
            "1_thingplusmatter_nvm3.hex",
            "2_thingplusmatter_nvm3.hex",
        ],
    },
    ProvisionBoard {
        name: "xg24explorerkit",
        flasher: FlasherTool::SimplicityCommander,
        configs: &[
            "0_xg24explorerkit_nvm3.hex",
            "1_xg24explorerkit_nvm3.hex",
            "2_xg24explorerkit_nvm3.hex",
        ],
    },
    ProvisionBoard {
        name: "xg24devkit",
        flasher: FlasherTool::SimplicityCommander,
        configs: &[
            "0_xg24devkit_nvm3.hex",
            "1_xg24devkit_nvm3.hex",
            "2_xg24devkit_nvm3.hex",
        ],
    },
];

/// Look up a board by name
pub fn find_board(name: &str) -> Result<&'static ProvisionBoard> {
    PROVISION_BOARDS
        .iter()
        .find(|board| board.name == name)
        .ok_or_else(|| Error::UnknownBoard {
            name: name.to_string(),
            available: PROVISION_BOARDS.iter().map(|b| b.name.to_string()).collect(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_board() {
        let board = find_board("nano_matter").unwrap();
        assert_eq!(board.flasher, FlasherTool::OpenOcd);
        assert_eq!(board.configs.len(), 3);
    }

    #[test]
    fn test_unknown_board_lists_supported() {
        match find_board("uno").unwrap_err() {
            Error::UnknownBoard { name, available } => {
                assert_eq!(name, "uno");
                assert_eq!(
                    available,
                    vec!["nano_matter", "thingplus_matter", "xg24explorerkit", "xg24devkit"]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_config_file_bounds() {
        let board = find_board("xg24devkit").unwrap();
        assert_eq!(board.config_file(0).unwrap(), "0_xg24devkit_nvm3.hex");
        assert_eq!(board.config_file(2).unwrap(), "2_xg24devkit_nvm3.hex");

        for index in [3, 5, -1, i64::MIN] {
            let err = board.config_file(index).unwrap_err();
            assert!(matches!(err, Error::InvalidConfigIndex { max: 2 }), "{index}");
        }
    }

    #[test]
    fn test_every_board_has_a_default_image() {
        for board in PROVISION_BOARDS {
            assert!(board.configs[0].starts_with("0_"), "{}", board.name);
            assert!(board.configs.iter().all(|c| c.ends_with("_nvm3.hex")));
        }
    }
}

//! # corekit-provision
//!
//! Flashes pre-generated Matter provisioning data (NVM3 images) onto
//! supported boards using the flasher tool shipped with the installed
//! Arduino core.

pub mod boards;
pub mod flasher;

pub use boards::{find_board, FlasherTool, ProvisionBoard, PROVISION_BOARDS};
pub use flasher::{parse_config_index, tools_dir, HostOs, Provisioner, FLASH_TIMEOUT};

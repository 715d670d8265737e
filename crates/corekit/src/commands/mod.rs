//! CLI command implementations
//!
//! Every command returns the process exit status on success; errors are
//! mapped to a status in `main`.

pub mod bootstrap;
pub mod checksum;
pub mod doctor;
pub mod generate;
pub mod hil;
pub mod host;
pub mod list;
pub mod provision;

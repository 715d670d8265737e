//! Type definitions for platform configurations

mod platform;

pub use platform::*;

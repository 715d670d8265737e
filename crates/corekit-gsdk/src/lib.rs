//! # corekit-gsdk
//!
//! Generates the Gecko SDK (GSDK) payload of the Arduino core for one
//! platform configuration or a whole group of them.
//!
//! # Features
//!
//! - **Staging**: copies project descriptors and board files into the vendor
//!   SDK, restoring anything they overwrote afterwards
//! - **Generation**: drives `slc generate` and `make` through a mockable runner
//! - **Patch rules**: named substring rules turning the link step into an
//!   archive step and rewriting Matter device descriptors
//! - **Licensing**: prepends the MIT header to unlicensed generated sources
//! - **Collection**: full-source trees, or archives plus a flattened header
//!   tree for prebuilt variants, optionally mirrored into the variants folder

pub mod collect;
pub mod layout;
pub mod license;
pub mod patch;
pub mod pipeline;
pub mod stage;

pub use collect::{route_header, CollectReport, Collision};
pub use layout::GsdkLayout;
pub use license::{apply_license, LicenseReport};
pub use patch::{apply_rules, AppliedPatch, PatchAction, PatchRule};
pub use pipeline::{GenerateOptions, GsdkGenerator, VariantReport};
pub use stage::{Staging, StagedFile};

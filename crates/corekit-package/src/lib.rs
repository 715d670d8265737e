//! # corekit-package
//!
//! Packaging helpers for the Arduino core:
//! - File size and SHA-256 digests, per file or per directory
//! - Package index patching (size, checksum, download URL)
//! - Local install hosting: package the core, patch the index, serve it
//!   over HTTP on the local network

pub mod digest;
pub mod host;
pub mod index;
pub mod server;

pub use digest::{digest_directory, digest_file, FileDigest};
pub use host::{base_url, local_ip, HostOptions, HostedPackage, LocalInstallHost};
pub use index::{patch_index, PACKAGE_INDEX_NAME, RELEASE_URL};
pub use server::{serve_directory, serve_listener};

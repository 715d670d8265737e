//! Local install hosting
//!
//! Packages a fresh core zip and prepares a host directory whose package
//! index points at this machine, so the Arduino IDE can install the core
//! over the local network.

use crate::digest::{digest_file, FileDigest};
use crate::index::{patch_index, PACKAGE_INDEX_NAME};
use corekit_core::process::run_step;
use corekit_core::{CommandRunner, CommandSpec, Error, Result, StepPolicy};
use std::fs;
use std::io;
use std::net::{IpAddr, UdpSocket};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Timeout of the packaging script
pub const PACKAGE_TIMEOUT: Duration = Duration::from_secs(180);

/// Where and what to host
#[derive(Debug, Clone)]
pub struct HostOptions {
    /// Folder holding `package_core.sh` and the package index
    pub package_dir: PathBuf,
    /// Host folder name inside `package_dir`
    pub host_dir: String,
    /// Core version embedded in the zip name
    pub core_version: String,
    /// HTTP port
    pub port: u16,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            package_dir: PathBuf::from("."),
            host_dir: "install_host".to_string(),
            core_version: "1.0.0".to_string(),
            port: 80,
        }
    }
}

impl HostOptions {
    /// File name of the packaged core
    pub fn zip_name(&self) -> String {
        format!("silabs_arduino_core-{}.zip", self.core_version)
    }

    pub fn host_path(&self) -> PathBuf {
        self.package_dir.join(&self.host_dir)
    }
}

/// A host directory ready to be served
#[derive(Debug, Clone)]
pub struct HostedPackage {
    pub host_dir: PathBuf,
    pub core: FileDigest,
    pub index_path: PathBuf,
    /// URL to enter as an additional boards manager URL
    pub index_url: String,
}

/// `http://<ip>` with the port appended unless it is 80
pub fn base_url(ip: IpAddr, port: u16) -> String {
    let host = match ip {
        IpAddr::V4(v4) => v4.to_string(),
        IpAddr::V6(v6) => format!("[{v6}]"),
    };
    if port == 80 {
        format!("http://{host}")
    } else {
        format!("http://{host}:{port}")
    }
}

/// Address of the interface used for outbound traffic
///
/// Connecting a UDP socket sends nothing; it only selects a route.
pub fn local_ip() -> Result<IpAddr> {
    let socket = UdpSocket::bind(("0.0.0.0", 0))?;
    socket.connect(("8.8.8.8", 80))?;
    Ok(socket.local_addr()?.ip())
}

fn move_file(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(Error::file_operation("move", from, e))
        }
        Err(_) => {
            debug!("Rename failed, copying {} instead", from.display());
            fs::copy(from, to).map_err(|e| Error::file_operation("copy", from, e))?;
            fs::remove_file(from).map_err(|e| Error::file_operation("remove", from, e))
        }
    }
}

/// Prepares the local install host directory
pub struct LocalInstallHost {
    runner: Arc<dyn CommandRunner>,
    options: HostOptions,
    timeout: Duration,
}

impl LocalInstallHost {
    pub fn new(runner: Arc<dyn CommandRunner>, options: HostOptions) -> Self {
        Self {
            runner,
            options,
            timeout: PACKAGE_TIMEOUT,
        }
    }

    pub fn options(&self) -> &HostOptions {
        &self.options
    }

    /// Package the core and write the patched index into the host directory
    pub async fn prepare(&self, ip: IpAddr) -> Result<HostedPackage> {
        let opts = &self.options;
        let host_dir = opts.host_path();
        let zip_name = opts.zip_name();
        let hosted_zip = host_dir.join(&zip_name);

        fs::create_dir_all(&host_dir)
            .map_err(|e| Error::file_operation("create directory", &host_dir, e))?;
        if hosted_zip.exists() {
            fs::remove_file(&hosted_zip)
                .map_err(|e| Error::file_operation("remove", &hosted_zip, e))?;
        }

        info!("Packaging the core...");
        let spec = CommandSpec::new("sh", self.timeout)
            .arg("package_core.sh")
            .current_dir(&opts.package_dir);
        run_step(self.runner.as_ref(), &spec, StepPolicy::Fatal).await?;

        move_file(&opts.package_dir.join("..").join(&zip_name), &hosted_zip)?;

        let core = digest_file(&hosted_zip)?;
        info!("Core size: {} bytes", core.size);
        info!("Core SHA256: {}", core.sha256);

        let source_index = opts.package_dir.join(PACKAGE_INDEX_NAME);
        let index = fs::read_to_string(&source_index)
            .map_err(|e| Error::file_operation("read", &source_index, e))?;

        let base = base_url(ip, opts.port);
        let patched = patch_index(&index, core.size, &core.sha256, &base)?;
        let index_path = host_dir.join(PACKAGE_INDEX_NAME);
        fs::write(&index_path, patched)
            .map_err(|e| Error::file_operation("write", &index_path, e))?;

        Ok(HostedPackage {
            host_dir,
            core,
            index_path,
            index_url: format!("{base}/{PACKAGE_INDEX_NAME}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_base_url() {
        let ip = IpAddr::V4(Ipv4Addr::new(192, 168, 0, 7));
        assert_eq!(base_url(ip, 80), "http://192.168.0.7");
        assert_eq!(base_url(ip, 8080), "http://192.168.0.7:8080");
        assert_eq!(base_url(IpAddr::V6(Ipv6Addr::LOCALHOST), 81), "http://[::1]:81");
    }

    #[test]
    fn test_default_options() {
        let options = HostOptions::default();
        assert_eq!(options.zip_name(), "silabs_arduino_core-1.0.0.zip");
        assert_eq!(options.host_path(), PathBuf::from("./install_host"));
        assert_eq!(options.port, 80);
    }
}

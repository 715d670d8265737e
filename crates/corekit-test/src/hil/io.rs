//! Serial and BLE access used by the testcases

use async_trait::async_trait;
use corekit_core::{Error, Result};
use std::io::{Read, Write};
use std::time::Duration;
use tracing::debug;

/// Baud rate of every HIL sketch
pub const SERIAL_BAUD_RATE: u32 = 115_200;

const SERIAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Device access of a HIL run
///
/// Tests substitute a scripted implementation.
#[async_trait]
pub trait HilIo: Send + Sync {
    /// Check that the port can be opened
    async fn check_port(&self, port: &str) -> Result<()>;

    /// Send an optional payload, wait, and return everything received
    async fn exchange(&self, port: &str, payload: Option<&str>, wait: Duration) -> Result<String>;

    /// Scan for a BLE advertiser with the given local name
    async fn find_ble_advertiser(&self, name: &str, timeout: Duration) -> Result<bool>;
}

/// [`HilIo`] backed by real serial ports and the host Bluetooth adapter
#[derive(Debug, Clone, Copy, Default)]
pub struct HardwareIo;

fn open(port: &str) -> Result<Box<dyn serialport::SerialPort>> {
    serialport::new(port, SERIAL_BAUD_RATE)
        .timeout(SERIAL_TIMEOUT)
        .open()
        .map_err(|e| Error::serial(port, e.to_string()))
}

fn exchange_blocking(port: &str, payload: Option<&str>, wait: Duration) -> Result<String> {
    let mut serial = open(port)?;
    if let Some(payload) = payload {
        serial
            .write_all(payload.as_bytes())
            .map_err(|e| Error::serial(port, e.to_string()))?;
    }

    std::thread::sleep(wait);

    let available = serial
        .bytes_to_read()
        .map_err(|e| Error::serial(port, e.to_string()))? as usize;
    let mut buffer = vec![0u8; available];
    serial
        .read_exact(&mut buffer)
        .map_err(|e| Error::serial(port, e.to_string()))?;

    let response = String::from_utf8_lossy(&buffer).into_owned();
    debug!("Serial response on '{}':\n{}", port, response);
    Ok(response)
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))?
}

#[async_trait]
impl HilIo for HardwareIo {
    async fn check_port(&self, port: &str) -> Result<()> {
        let port = port.to_string();
        blocking(move || open(&port).map(|_| ())).await
    }

    async fn exchange(&self, port: &str, payload: Option<&str>, wait: Duration) -> Result<String> {
        let port = port.to_string();
        let payload = payload.map(str::to_string);
        blocking(move || exchange_blocking(&port, payload.as_deref(), wait)).await
    }

    #[cfg(feature = "ble")]
    async fn find_ble_advertiser(&self, name: &str, timeout: Duration) -> Result<bool> {
        crate::ble::find_advertiser(name, timeout).await
    }

    #[cfg(not(feature = "ble"))]
    async fn find_ble_advertiser(&self, name: &str, _timeout: Duration) -> Result<bool> {
        Err(Error::bluetooth(format!(
            "cannot scan for '{name}', corekit was built without the 'ble' feature"
        )))
    }
}

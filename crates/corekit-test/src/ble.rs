//! BLE advertisement scanning

use btleplug::api::{Central, CentralEvent, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::Manager;
use corekit_core::{Error, Result};
use futures::StreamExt;
use std::time::Duration;
use tracing::{debug, info};

fn ble_error(e: btleplug::Error) -> Error {
    Error::bluetooth(e.to_string())
}

/// Scan on the first adapter until a device advertising `name` shows up
pub async fn find_advertiser(name: &str, timeout: Duration) -> Result<bool> {
    info!("Checking for advertising BLE device '{}'", name);

    let manager = Manager::new().await.map_err(ble_error)?;
    let central = manager
        .adapters()
        .await
        .map_err(ble_error)?
        .into_iter()
        .next()
        .ok_or_else(|| Error::bluetooth("no Bluetooth adapters found"))?;

    let mut events = central.events().await.map_err(ble_error)?;
    central
        .start_scan(ScanFilter::default())
        .await
        .map_err(ble_error)?;

    let scan = async {
        while let Some(event) = events.next().await {
            let id = match event {
                CentralEvent::DeviceDiscovered(id) | CentralEvent::DeviceUpdated(id) => id,
                _ => continue,
            };
            let peripheral = central.peripheral(&id).await?;
            let local_name = peripheral
                .properties()
                .await?
                .and_then(|p| p.local_name)
                .unwrap_or_default();
            debug!("Advertiser {:?}: '{}'", id, local_name);
            if local_name == name {
                return Ok(true);
            }
        }
        Ok::<bool, btleplug::Error>(false)
    };
    let found = tokio::time::timeout(timeout, scan).await;

    central.stop_scan().await.map_err(ble_error)?;

    match found {
        Ok(result) => result.map_err(ble_error),
        Err(_) => {
            info!("BLE device '{}' not found", name);
            Ok(false)
        }
    }
}

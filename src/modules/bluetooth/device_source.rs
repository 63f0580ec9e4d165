use std::fmt;

use async_trait::async_trait;
use btleplug::api::{Central, Manager as _, Peripheral as _};
use btleplug::platform::Manager;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::UpdateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Headset,
    Mouse,
    Keyboard,
    Unknown,
}

impl DeviceKind {
    /// Nerd Font glyph shown in the bar.
    pub fn glyph(self) -> &'static str {
        match self {
            DeviceKind::Headset => "\u{f025}",
            DeviceKind::Mouse => "\u{f037d}",
            DeviceKind::Keyboard => "\u{f11c}",
            DeviceKind::Unknown => "\u{f293}",
        }
    }

    /// Classify from the Bluetooth class of device, falling back to the name.
    pub fn classify(class: Option<u32>, name: &str) -> Self {
        if let Some(class) = class {
            let major = (class >> 8) & 0x1f;
            let minor = (class >> 2) & 0x3f;

            match major {
                0x04 => return DeviceKind::Headset,
                0x05 if minor & 0x10 != 0 => return DeviceKind::Keyboard,
                0x05 if minor & 0x20 != 0 => return DeviceKind::Mouse,
                _ => {}
            }
        }

        if name.to_lowercase().contains("keyboard") {
            DeviceKind::Keyboard
        } else {
            DeviceKind::Unknown
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedDevice {
    pub name: String,
    pub kind: DeviceKind,
}

/// Where the bluetooth module learns which devices are connected.
#[async_trait]
pub trait DeviceSource: Send + Sync + fmt::Debug {
    async fn connected_devices(&self) -> Result<Vec<ConnectedDevice>, UpdateError>;
}

/// BlueZ (via btleplug) backed source. The manager is created on first use.
#[derive(Default)]
pub struct BluezDeviceSource {
    manager: OnceCell<Manager>,
}

impl BluezDeviceSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for BluezDeviceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BluezDeviceSource")
            .field("initialized", &self.manager.initialized())
            .finish()
    }
}

#[async_trait]
impl DeviceSource for BluezDeviceSource {
    async fn connected_devices(&self) -> Result<Vec<ConnectedDevice>, UpdateError> {
        let manager = self.manager.get_or_try_init(Manager::new).await?;
        let mut devices = Vec::new();

        for adapter in manager.adapters().await? {
            for peripheral in adapter.peripherals().await? {
                if !peripheral.is_connected().await? {
                    continue;
                }

                let properties = peripheral.properties().await?;
                let name = properties
                    .as_ref()
                    .and_then(|p| p.local_name.clone())
                    .unwrap_or_default();
                let class = properties.as_ref().and_then(|p| p.class);
                let kind = DeviceKind::classify(class, &name);

                debug!("🔵 Connected: {} ({:?})", name, kind);
                devices.push(ConnectedDevice { name, kind });
            }
        }

        Ok(devices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_class_of_device() {
        // Audio/Video, wearable headset
        assert_eq!(DeviceKind::classify(Some(0x240404), ""), DeviceKind::Headset);
        // Peripheral, keyboard
        assert_eq!(DeviceKind::classify(Some(0x002540), ""), DeviceKind::Keyboard);
        // Peripheral, pointing device
        assert_eq!(DeviceKind::classify(Some(0x002580), ""), DeviceKind::Mouse);
    }

    #[test]
    fn test_classify_falls_back_to_name() {
        assert_eq!(DeviceKind::classify(None, "Logitech K380 Keyboard"), DeviceKind::Keyboard);
        assert_eq!(DeviceKind::classify(Some(0x000100), "KEYBOARD"), DeviceKind::Keyboard);
        assert_eq!(DeviceKind::classify(None, "Pixel 7"), DeviceKind::Unknown);
    }
}

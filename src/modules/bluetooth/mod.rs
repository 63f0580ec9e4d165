//! Connected Bluetooth devices, one glyph each. Left click opens the
//! configured device manager.

mod device_source;

use std::time::Duration;

use async_trait::async_trait;

use crate::{
    error::{ConfigError, UpdateError},
    input::{InputAction, InputBinding, MouseButton},
    module::{ModuleDescriptor, ModuleParams, StatusModule, WidgetRender},
};

pub use device_source::{BluezDeviceSource, ConnectedDevice, DeviceKind, DeviceSource};

pub const MODULE_TYPE: &str = "bluetooth";

const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
const DEFAULT_MANAGER: &str = "blueman-manager";

#[derive(Debug)]
pub struct BluetoothModule {
    name: String,
    interval: Duration,
    manager: String,
    source: Box<dyn DeviceSource>,
    status: Option<String>,
}

impl BluetoothModule {
    pub fn new(name: impl Into<String>, manager: impl Into<String>, source: Box<dyn DeviceSource>) -> Self {
        Self {
            name: name.into(),
            interval: DEFAULT_INTERVAL,
            manager: manager.into(),
            source,
            status: None,
        }
    }

    pub fn from_params(params: &ModuleParams, interval: Option<Duration>) -> Result<Self, ConfigError> {
        let manager = params.get_or("manager", DEFAULT_MANAGER);
        if manager.trim().is_empty() {
            return Err(ConfigError::InvalidParameter {
                module: params.module().to_string(),
                parameter: "manager".to_string(),
                reason: "must name a program".to_string(),
            });
        }

        let module = Self::new(params.module(), manager, Box::new(BluezDeviceSource::new()));
        Ok(match interval {
            Some(interval) => module.with_interval(interval),
            None => module,
        })
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

#[async_trait]
impl StatusModule for BluetoothModule {
    fn descriptor(&self) -> ModuleDescriptor {
        ModuleDescriptor::new(self.name.clone(), self.interval)
    }

    async fn update(&mut self) -> Result<(), UpdateError> {
        let devices = self.source.connected_devices().await?;

        self.status = if devices.is_empty() {
            None
        } else {
            Some(
                devices
                    .iter()
                    .map(|device| device.kind.glyph())
                    .collect::<Vec<_>>()
                    .join(" "),
            )
        };

        Ok(())
    }

    fn render(&self, _widget_id: &str) -> WidgetRender {
        match &self.status {
            Some(status) => WidgetRender::shown(status.clone()).with_tag("ON"),
            None => WidgetRender::hidden(),
        }
    }

    fn bindings(&self) -> Vec<InputBinding> {
        vec![InputBinding::new(
            self.name.clone(),
            MouseButton::Left,
            InputAction::Command(self.manager.clone()),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Debug)]
    struct StaticDevices(Vec<ConnectedDevice>);

    #[async_trait]
    impl DeviceSource for StaticDevices {
        async fn connected_devices(&self) -> Result<Vec<ConnectedDevice>, UpdateError> {
            Ok(self.0.clone())
        }
    }

    fn device(name: &str, kind: DeviceKind) -> ConnectedDevice {
        ConnectedDevice {
            name: name.to_string(),
            kind,
        }
    }

    #[tokio::test]
    async fn test_one_glyph_per_connected_device() {
        let mut module = BluetoothModule::new(
            "bluetooth",
            DEFAULT_MANAGER,
            Box::new(StaticDevices(vec![
                device("WH-1000XM4", DeviceKind::Headset),
                device("MX Keys", DeviceKind::Keyboard),
            ])),
        );

        module.update().await.unwrap();
        let render = module.render("bluetooth");

        assert!(render.visible);
        assert_eq!(
            render.text,
            format!("{} {}", DeviceKind::Headset.glyph(), DeviceKind::Keyboard.glyph())
        );
        assert_eq!(render.tags, vec!["ON".to_string()]);
    }

    #[tokio::test]
    async fn test_hidden_without_devices() {
        let mut module =
            BluetoothModule::new("bluetooth", DEFAULT_MANAGER, Box::new(StaticDevices(vec![])));
        module.update().await.unwrap();
        assert!(!module.render("bluetooth").visible);
    }

    #[test]
    fn test_left_click_launches_manager() {
        let params = ModuleParams::new(
            "bt",
            HashMap::from([("manager".to_string(), "blueberry".to_string())]),
        );
        let module = BluetoothModule::from_params(&params, Some(Duration::from_secs(10))).unwrap();

        let bindings = module.bindings();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].module, "bt");
        assert_eq!(bindings[0].button, MouseButton::Left);
        assert!(!bindings[0].wait);
        assert!(matches!(&bindings[0].action, InputAction::Command(c) if c == "blueberry"));
        assert_eq!(module.descriptor().interval, Duration::from_secs(10));
    }

    #[test]
    fn test_blank_manager_is_rejected() {
        let params = ModuleParams::new(
            "bt",
            HashMap::from([("manager".to_string(), "  ".to_string())]),
        );
        assert!(matches!(
            BluetoothModule::from_params(&params, None),
            Err(ConfigError::InvalidParameter { .. })
        ));
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Adapter state as shown in the panel header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BluetoothStatus {
    /// No status has been fetched yet.
    #[default]
    Loading,
    On,
    Discoverable,
    Off,
    NoAdapter,
    /// Fallback for output the parser does not recognise.
    Unknown,
}

impl BluetoothStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Loading => "LOADING",
            Self::On => "ON",
            Self::Discoverable => "DISCOVERABLE",
            Self::Off => "OFF",
            Self::NoAdapter => "NO ADAPTER",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn is_powered(self) -> bool {
        matches!(self, Self::On | Self::Discoverable)
    }
}

impl fmt::Display for BluetoothStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A paired Bluetooth peripheral.
///
/// The address is fixed at construction; every other field is refreshed
/// from the backend on each cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    mac: String,
    pub name: String,
    pub connected: bool,
    pub trusted: Option<bool>,
    pub paired: bool,
}

impl Device {
    /// A device as known from the paired list alone.
    pub fn new(mac: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            mac: mac.into(),
            name: name.into(),
            connected: false,
            trusted: None,
            paired: true,
        }
    }

    pub fn mac(&self) -> &str {
        &self.mac
    }

    /// Name to show in the panel, falling back to the address.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.mac
        } else {
            &self.name
        }
    }
}

/// Paired devices in backend-reported order.
pub type DeviceList = Vec<Device>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_device_uses_paired_defaults() {
        let device = Device::new("AA:BB:CC:DD:EE:FF", "Pad");
        assert_eq!(device.mac(), "AA:BB:CC:DD:EE:FF");
        assert!(!device.connected);
        assert_eq!(device.trusted, None);
        assert!(device.paired);
    }

    #[test]
    fn display_name_falls_back_to_mac() {
        let device = Device::new("AA:BB:CC:DD:EE:FF", "");
        assert_eq!(device.display_name(), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn status_labels() {
        assert_eq!(BluetoothStatus::default().to_string(), "LOADING");
        assert_eq!(BluetoothStatus::NoAdapter.label(), "NO ADAPTER");
        assert!(BluetoothStatus::Discoverable.is_powered());
        assert!(!BluetoothStatus::Unknown.is_powered());
    }
}

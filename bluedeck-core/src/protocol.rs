/*!
 * BLUEDECK Wire Protocol
 * Newline-delimited JSON between the panel and bluedeckd
 */

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    GetBluetoothStatus,
    GetPairedDevices,
    GetDeviceInfo { device: String },
    ToggleDeviceConnection { device: String, connected: bool },
    ForgetDevice { device: String },
}

impl Request {
    /// Method name used in logs.
    pub fn method(&self) -> &'static str {
        match self {
            Self::GetBluetoothStatus => "get_bluetooth_status",
            Self::GetPairedDevices => "get_paired_devices",
            Self::GetDeviceInfo { .. } => "get_device_info",
            Self::ToggleDeviceConnection { .. } => "toggle_device_connection",
            Self::ForgetDevice { .. } => "forget_device",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    /// Raw backend output.
    Output { result: String },
    Error { message: String },
}

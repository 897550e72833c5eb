use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize)]
pub struct DaemonConfig {
    pub socket_path: String,
    #[serde(default)]
    pub bluetooth: BluetoothConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BluetoothConfig {
    /// bluetoothctl binary, looked up on PATH unless absolute.
    pub bluetoothctl: String,
    pub command_timeout_secs: u64,
}

impl Default for BluetoothConfig {
    fn default() -> Self {
        Self {
            bluetoothctl: "bluetoothctl".to_string(),
            command_timeout_secs: 10,
        }
    }
}

impl BluetoothConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            socket_path: "/run/bluedeck/bluedeck.sock".to_string(),
            bluetooth: BluetoothConfig::default(),
        }
    }
}

impl DaemonConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(_) => {
                // Create default config if not found
                let config = Self::default();
                if let Err(e) = fs::write(path, toml::to_string_pretty(&config)?) {
                    tracing::debug!("Could not write default config to {}: {}", path.display(), e);
                }
                Ok(config)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bluedeckd.toml");

        let config = DaemonConfig::load(&path).unwrap();

        assert_eq!(config.socket_path, "/run/bluedeck/bluedeck.sock");
        assert_eq!(config.bluetooth.command_timeout(), Duration::from_secs(10));
        let written: DaemonConfig = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.bluetooth.bluetoothctl, "bluetoothctl");
    }

    #[test]
    fn bluetooth_section_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bluedeckd.toml");
        fs::write(&path, "socket_path = \"/tmp/bd.sock\"\n").unwrap();

        let config = DaemonConfig::load(&path).unwrap();

        assert_eq!(config.socket_path, "/tmp/bd.sock");
        assert_eq!(config.bluetooth.command_timeout_secs, 10);
    }

    #[test]
    fn reads_custom_bluetooth_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bluedeckd.toml");
        fs::write(
            &path,
            "socket_path = \"/tmp/bd.sock\"\n\n[bluetooth]\nbluetoothctl = \"/usr/local/bin/bluetoothctl\"\ncommand_timeout_secs = 3\n",
        )
        .unwrap();

        let config = DaemonConfig::load(&path).unwrap();

        assert_eq!(config.bluetooth.bluetoothctl, "/usr/local/bin/bluetoothctl");
        assert_eq!(config.bluetooth.command_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bluedeckd.toml");
        fs::write(&path, "socket_path = [").unwrap();

        assert!(DaemonConfig::load(&path).is_err());
    }
}

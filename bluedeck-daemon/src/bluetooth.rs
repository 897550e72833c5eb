/*!
 * Bluetooth Device Management
 * Adapter and paired-device queries via bluetoothctl
 */

use async_trait::async_trait;
use bluedeck_core::parser::is_mac_address;
use bluedeck_core::{Backend, Error, Result};
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::OnceCell;

use crate::config::BluetoothConfig;

/// First BlueZ release that dropped `paired-devices` for `devices Paired`.
const DEVICES_FILTER_VERSION: (u32, u32) = (5, 66);

pub struct BluetoothManager {
    program: String,
    timeout: Duration,
    filtered_listing: OnceCell<bool>,
}

impl BluetoothManager {
    pub fn new(config: &BluetoothConfig) -> Self {
        Self {
            program: config.bluetoothctl.clone(),
            timeout: config.command_timeout(),
            filtered_listing: OnceCell::new(),
        }
    }

    /// Run one bluetoothctl command and return its stdout, whatever the exit status.
    async fn bluetoothctl(&self, args: &[&str]) -> Result<String> {
        let command_line = format!("{} {}", self.program, args.join(" "));
        tracing::debug!("Running: {}", command_line);

        let output = tokio::time::timeout(
            self.timeout,
            Command::new(&self.program).args(args).kill_on_drop(true).output(),
        )
        .await
        .map_err(|_| Error::Timeout(command_line.clone()))??;

        if !output.status.success() {
            tracing::debug!(
                "{} exited with {}: {}",
                command_line,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn paired_listing_args(&self) -> Result<&'static [&'static str]> {
        let filtered = self
            .filtered_listing
            .get_or_try_init(|| async {
                let raw = self.bluetoothctl(&["version"]).await?;
                let version = parse_version(&raw);
                tracing::info!("Detected bluetoothctl version: {:?}", version);
                Ok::<_, Error>(version.is_some_and(|v| v >= DEVICES_FILTER_VERSION))
            })
            .await?;

        Ok(if *filtered {
            &["devices", "Paired"]
        } else {
            &["paired-devices"]
        })
    }
}

fn checked_address(mac: &str) -> Result<&str> {
    if is_mac_address(mac) {
        Ok(mac)
    } else {
        Err(Error::InvalidAddress(mac.to_string()))
    }
}

/// Extract `(major, minor)` from `bluetoothctl version` output such as `Version 5.66`.
pub fn parse_version(raw: &str) -> Option<(u32, u32)> {
    raw.split_whitespace().find_map(|token| {
        let (major, minor) = token.split_once('.')?;
        let minor: String = minor.chars().take_while(char::is_ascii_digit).collect();
        Some((major.parse().ok()?, minor.parse().ok()?))
    })
}

#[async_trait]
impl Backend for BluetoothManager {
    async fn get_bluetooth_status(&self) -> Result<String> {
        self.bluetoothctl(&["show"]).await
    }

    async fn get_paired_devices(&self) -> Result<String> {
        let args = self.paired_listing_args().await?;
        self.bluetoothctl(args).await
    }

    async fn get_device_info(&self, mac: &str) -> Result<String> {
        self.bluetoothctl(&["info", checked_address(mac)?]).await
    }

    async fn toggle_device_connection(&self, mac: &str, connected: bool) -> Result<String> {
        let mac = checked_address(mac)?;
        let verb = if connected { "disconnect" } else { "connect" };
        tracing::info!("{} device: {}", verb, mac);
        self.bluetoothctl(&[verb, mac]).await
    }

    async fn forget_device(&self, mac: &str) -> Result<String> {
        let mac = checked_address(mac)?;
        tracing::info!("Removing device: {}", mac);
        self.bluetoothctl(&["remove", mac]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    /// `echo` stands in for bluetoothctl so the arguments come back as output.
    fn echo_manager() -> BluetoothManager {
        BluetoothManager::new(&BluetoothConfig {
            bluetoothctl: "echo".to_string(),
            command_timeout_secs: 5,
        })
    }

    #[test]
    fn parses_version_strings() {
        assert_eq!(parse_version("Version 5.66\n"), Some((5, 66)));
        assert_eq!(parse_version("bluetoothctl: 5.72-1"), Some((5, 72)));
        assert_eq!(parse_version("5.9"), Some((5, 9)));
        assert_eq!(parse_version("no version here"), None);
        assert_eq!(parse_version(""), None);
    }

    /// Install a shell script as bluetoothctl.
    fn stub_manager(dir: &Path, body: &str, command_timeout_secs: u64) -> BluetoothManager {
        let path = dir.join("bluetoothctl");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        BluetoothManager::new(&BluetoothConfig {
            bluetoothctl: path.to_string_lossy().into_owned(),
            command_timeout_secs,
        })
    }

    /// Stub that reports `version` and echoes every other command.
    async fn paired_listing_for(version: &str) -> String {
        let dir = TempDir::new().unwrap();
        let body = format!(
            "if [ \"$1\" = version ]; then echo \"Version {version}\"; else echo \"$@\"; fi"
        );
        let manager = stub_manager(dir.path(), &body, 5);
        manager.get_paired_devices().await.unwrap().trim().to_string()
    }

    #[tokio::test]
    async fn recent_bluez_uses_filtered_listing() {
        assert_eq!(paired_listing_for("5.66").await, "devices Paired");
        assert_eq!(paired_listing_for("6.0").await, "devices Paired");
    }

    #[tokio::test]
    async fn older_bluez_uses_legacy_listing() {
        assert_eq!(paired_listing_for("5.65").await, "paired-devices");
    }

    #[tokio::test]
    async fn version_is_detected_once() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("calls");
        let body = format!(
            "echo \"$@\" >> {log}\nif [ \"$1\" = version ]; then echo \"Version 5.72\"; else echo \"$@\"; fi",
            log = log.display()
        );
        let manager = stub_manager(dir.path(), &body, 5);

        manager.get_paired_devices().await.unwrap();
        manager.get_paired_devices().await.unwrap();

        let calls = fs::read_to_string(&log).unwrap();
        assert_eq!(calls.lines().filter(|l| *l == "version").count(), 1);
    }

    #[tokio::test]
    async fn hung_command_times_out() {
        let dir = TempDir::new().unwrap();
        let manager = stub_manager(dir.path(), "sleep 30", 1);

        let err = manager.get_bluetooth_status().await.unwrap_err();
        assert!(matches!(err, Error::Timeout(ref command) if command.ends_with("show")));
    }

    #[tokio::test]
    async fn passes_device_address_through() {
        let output = echo_manager()
            .get_device_info("AA:BB:CC:DD:EE:FF")
            .await
            .unwrap();
        assert_eq!(output.trim(), "info AA:BB:CC:DD:EE:FF");
    }

    #[tokio::test]
    async fn toggle_picks_verb_from_current_state() {
        let manager = echo_manager();
        let disconnect = manager
            .toggle_device_connection("AA:BB:CC:DD:EE:FF", true)
            .await
            .unwrap();
        let connect = manager
            .toggle_device_connection("AA:BB:CC:DD:EE:FF", false)
            .await
            .unwrap();

        assert_eq!(disconnect.trim(), "disconnect AA:BB:CC:DD:EE:FF");
        assert_eq!(connect.trim(), "connect AA:BB:CC:DD:EE:FF");
    }

    #[tokio::test]
    async fn unknown_version_uses_legacy_listing() {
        // `echo version` prints no number
        let output = echo_manager().get_paired_devices().await.unwrap();
        assert_eq!(output.trim(), "paired-devices");
    }

    #[tokio::test]
    async fn rejects_malformed_address() {
        let err = echo_manager().forget_device("AA:BB; reboot").await.unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(_)));
    }

    #[tokio::test]
    async fn missing_binary_is_io_error() {
        let manager = BluetoothManager::new(&BluetoothConfig {
            bluetoothctl: "/nonexistent/bluetoothctl".to_string(),
            command_timeout_secs: 5,
        });
        assert!(matches!(
            manager.get_bluetooth_status().await.unwrap_err(),
            Error::Io(_)
        ));
    }
}

use async_trait::async_trait;

use crate::error::Result;

/// Remote-call surface of the Bluetooth backend.
///
/// Every call answers with the backend's raw text output; interpreting it is
/// left to [`crate::parser`].
#[async_trait]
pub trait Backend: Send + Sync {
    async fn get_bluetooth_status(&self) -> Result<String>;

    async fn get_paired_devices(&self) -> Result<String>;

    async fn get_device_info(&self, mac: &str) -> Result<String>;

    /// Disconnect when `connected` is true, connect otherwise.
    async fn toggle_device_connection(&self, mac: &str, connected: bool) -> Result<String>;

    /// Remove the pairing.
    async fn forget_device(&self, mac: &str) -> Result<String>;
}

/*!
 * BLUEDECK Daemon Client
 * JSON IPC communication with bluedeckd
 */

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::protocol::{Request, Response};

/// Backend reached over the daemon's Unix socket, one connection per call.
#[derive(Debug, Clone)]
pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub async fn send_request(&self, request: Request) -> Result<Response> {
        tracing::debug!(method = request.method(), "Sending request");

        let stream = UnixStream::connect(&self.socket_path).await?;
        let (reader, mut writer) = stream.into_split();

        let request_json = serde_json::to_string(&request)?;
        writer.write_all(request_json.as_bytes()).await?;
        writer.write_all(b"\n").await?;

        let mut line = String::new();
        if BufReader::new(reader).read_line(&mut line).await? == 0 {
            return Err(Error::Disconnected);
        }

        Ok(serde_json::from_str(line.trim())?)
    }

    async fn call(&self, request: Request) -> Result<String> {
        match self.send_request(request).await? {
            Response::Output { result } => Ok(result),
            Response::Error { message } => Err(Error::Remote(message)),
        }
    }
}

#[async_trait]
impl Backend for DaemonClient {
    async fn get_bluetooth_status(&self) -> Result<String> {
        self.call(Request::GetBluetoothStatus).await
    }

    async fn get_paired_devices(&self) -> Result<String> {
        self.call(Request::GetPairedDevices).await
    }

    async fn get_device_info(&self, mac: &str) -> Result<String> {
        self.call(Request::GetDeviceInfo {
            device: mac.to_string(),
        })
        .await
    }

    async fn toggle_device_connection(&self, mac: &str, connected: bool) -> Result<String> {
        self.call(Request::ToggleDeviceConnection {
            device: mac.to_string(),
            connected,
        })
        .await
    }

    async fn forget_device(&self, mac: &str) -> Result<String> {
        self.call(Request::ForgetDevice {
            device: mac.to_string(),
        })
        .await
    }
}

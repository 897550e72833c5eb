/*!
 * IPC Server for BLUEDECK Daemon
 * JSON protocol over Unix socket
 */

use anyhow::Result;
use bluedeck_core::protocol::{Request, Response};
use bluedeck_core::Backend;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tracing::Instrument;
use uuid::Uuid;

pub struct IpcServer<B> {
    listener: UnixListener,
    backend: Arc<B>,
}

impl<B: Backend + 'static> IpcServer<B> {
    pub fn new(listener: UnixListener, backend: B) -> Self {
        Self {
            listener,
            backend: Arc::new(backend),
        }
    }

    pub async fn run(self) -> Result<()> {
        tracing::info!("IPC server listening for connections...");

        loop {
            match self.listener.accept().await {
                Ok((stream, _)) => {
                    let client = Uuid::new_v4();
                    tracing::debug!(%client, "New client connected");
                    let backend = Arc::clone(&self.backend);

                    tokio::spawn(
                        async move {
                            if let Err(e) = handle_client(stream, backend.as_ref()).await {
                                tracing::error!("Client error: {}", e);
                            }
                        }
                        .instrument(tracing::debug_span!("client", %client)),
                    );
                }
                Err(e) => {
                    tracing::error!("Failed to accept connection: {}", e);
                }
            }
        }
    }
}

async fn handle_client<B: Backend + ?Sized>(stream: UnixStream, backend: &B) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    while reader.read_line(&mut line).await? > 0 {
        let request = line.trim();
        tracing::debug!("Received request: {}", request);

        let response = match serde_json::from_str::<Request>(request) {
            Ok(request) => handle_request(backend, request).await,
            Err(e) => Response::Error {
                message: format!("Malformed request: {e}"),
            },
        };

        writer.write_all(serde_json::to_string(&response)?.as_bytes()).await?;
        writer.write_all(b"\n").await?;

        line.clear();
    }

    Ok(())
}

pub async fn handle_request<B: Backend + ?Sized>(backend: &B, request: Request) -> Response {
    let method = request.method();
    let result = match request {
        Request::GetBluetoothStatus => backend.get_bluetooth_status().await,
        Request::GetPairedDevices => backend.get_paired_devices().await,
        Request::GetDeviceInfo { device } => backend.get_device_info(&device).await,
        Request::ToggleDeviceConnection { device, connected } => {
            backend.toggle_device_connection(&device, connected).await
        }
        Request::ForgetDevice { device } => backend.forget_device(&device).await,
    };

    match result {
        Ok(result) => Response::Output { result },
        Err(e) => {
            tracing::warn!("{} failed: {}", method, e);
            Response::Error {
                message: e.to_string(),
            }
        }
    }
}

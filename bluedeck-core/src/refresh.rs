/*!
 * Refresh Orchestration
 * Status, paired list and per-device info in one cycle
 */

use futures_util::future::try_join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

use crate::backend::Backend;
use crate::error::Result;
use crate::parser::{merge_all, parse_bluetooth_status, parse_devices, parse_devices_info};
use crate::store::{PanelAction, PanelStore, Snapshot};

/// Delay used for manual refreshes so the spinner does not just blink.
pub const MANUAL_REFRESH_DELAY: Duration = Duration::from_millis(300);

pub struct Refresher<B> {
    backend: Arc<B>,
}

impl<B> Clone for Refresher<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: Backend> Refresher<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run one full cycle and return what it found, waiting `delay` before
    /// handing the result back.
    ///
    /// Any backend failure aborts the cycle. Nothing is retried.
    pub async fn refresh(&self, delay: Duration) -> Result<Snapshot> {
        let cycle = Uuid::new_v4();
        self.refresh_inner(delay)
            .instrument(tracing::info_span!("refresh", %cycle))
            .await
    }

    async fn refresh_inner(&self, delay: Duration) -> Result<Snapshot> {
        let status_raw = self.backend.get_bluetooth_status().await?;

        let paired_raw = self.backend.get_paired_devices().await?;
        let partials = parse_devices(&paired_raw);
        tracing::debug!(count = partials.len(), "Paired devices listed");

        // Issued together; try_join_all yields replies in request order
        let info_raws = try_join_all(
            partials
                .iter()
                .map(|device| self.backend.get_device_info(device.mac())),
        )
        .await?;
        let devices = merge_all(partials, &parse_devices_info(&info_raws));

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let status = parse_bluetooth_status(&status_raw);
        tracing::info!(%status, devices = devices.len(), "Refresh complete");

        Ok(Snapshot { status, devices })
    }

    /// Refresh and turn the outcome into the action that publishes it.
    pub async fn cycle(&self, delay: Duration) -> PanelAction {
        match self.refresh(delay).await {
            Ok(snapshot) => PanelAction::RefreshCompleted(snapshot),
            Err(e) => {
                tracing::warn!("Refresh failed: {}", e);
                PanelAction::RefreshFailed(e.to_string())
            }
        }
    }

    /// Drive a whole cycle against a store the caller owns.
    pub async fn run(&self, store: &mut PanelStore, delay: Duration) {
        store.apply(PanelAction::RefreshStarted);
        let action = self.cycle(delay).await;
        store.apply(action);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::backend::Backend;
    use crate::error::{Error, Result};

    /// In-memory backend with canned replies and call accounting.
    #[derive(Default)]
    pub struct ScriptedBackend {
        pub status: String,
        pub paired: String,
        pub infos: HashMap<String, String>,
        /// Per-device latency, used to resolve info calls out of order.
        pub latency: HashMap<String, Duration>,
        pub fail_status: bool,
        pub fail_info: bool,
        pub info_calls: Mutex<Vec<String>>,
        pub status_calls: AtomicUsize,
    }

    impl ScriptedBackend {
        pub fn info_call_count(&self) -> usize {
            self.info_calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Backend for ScriptedBackend {
        async fn get_bluetooth_status(&self) -> Result<String> {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_status {
                return Err(Error::Remote("adapter unavailable".to_string()));
            }
            Ok(self.status.clone())
        }

        async fn get_paired_devices(&self) -> Result<String> {
            Ok(self.paired.clone())
        }

        async fn get_device_info(&self, mac: &str) -> Result<String> {
            self.info_calls.lock().unwrap().push(mac.to_string());
            if let Some(latency) = self.latency.get(mac) {
                tokio::time::sleep(*latency).await;
            }
            if self.fail_info {
                return Err(Error::Remote(format!("no info for {mac}")));
            }
            Ok(self.infos.get(mac).cloned().unwrap_or_default())
        }

        async fn toggle_device_connection(&self, _mac: &str, _connected: bool) -> Result<String> {
            Ok(String::new())
        }

        async fn forget_device(&self, _mac: &str) -> Result<String> {
            Ok(String::new())
        }
    }
}

use bluedeck_core::{Backend, Device, PanelAction, PanelStore, Refresher};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub struct App<B> {
    pub store: PanelStore,
    pub selected: usize,
    pub spinner_frame: usize,
    refresher: Refresher<B>,
    manual_delay: Duration,
    actions_tx: mpsc::UnboundedSender<PanelAction>,
    actions_rx: mpsc::UnboundedReceiver<PanelAction>,
}

impl<B: Backend + 'static> App<B> {
    /// Build the panel and kick off the first refresh in the background, so
    /// the first frame shows the loading state instead of blocking on the daemon.
    pub fn new(backend: B, manual_delay: Duration) -> Self {
        let (actions_tx, actions_rx) = mpsc::unbounded_channel();
        let mut app = Self {
            store: PanelStore::new(),
            selected: 0,
            spinner_frame: 0,
            refresher: Refresher::new(Arc::new(backend)),
            manual_delay,
            actions_tx,
            actions_rx,
        };

        app.start_refresh(Duration::ZERO);
        app
    }

    pub fn devices(&self) -> &[Device] {
        &self.store.state().devices
    }

    pub fn selected_device(&self) -> Option<&Device> {
        self.devices().get(self.selected)
    }

    pub fn previous_device(&mut self) {
        let count = self.devices().len();
        if count > 0 {
            self.selected = if self.selected == 0 {
                count - 1
            } else {
                self.selected - 1
            };
        }
    }

    pub fn next_device(&mut self) {
        let count = self.devices().len();
        if count > 0 {
            self.selected = (self.selected + 1) % count;
        }
    }

    /// Manual refresh from the keyboard.
    pub fn refresh(&mut self) {
        self.start_refresh(self.manual_delay);
    }

    /// Background refresh, e.g. from the poll timer.
    pub fn poll(&mut self) {
        self.start_refresh(Duration::ZERO);
    }

    fn start_refresh(&mut self, delay: Duration) {
        self.store.apply(PanelAction::RefreshStarted);

        let refresher = self.refresher.clone();
        let tx = self.actions_tx.clone();
        tokio::spawn(async move {
            if tx.send(refresher.cycle(delay).await).is_err() {
                tracing::debug!("Panel closed before refresh finished");
            }
        });
    }

    pub fn toggle_connection(&mut self) {
        if let Some(device) = self.selected_device() {
            let command = DeviceCommand::Toggle {
                mac: device.mac().to_string(),
                connected: device.connected,
            };
            self.run_device_command(command);
        }
    }

    pub fn forget_device(&mut self) {
        if let Some(device) = self.selected_device() {
            let command = DeviceCommand::Forget {
                mac: device.mac().to_string(),
            };
            self.run_device_command(command);
        }
    }

    /// Mark the panel busy, run a device command, then refresh straight away.
    fn run_device_command(&mut self, command: DeviceCommand) {
        self.store.apply(PanelAction::RefreshStarted);

        let refresher = self.refresher.clone();
        let tx = self.actions_tx.clone();
        tokio::spawn(async move {
            let backend = refresher.backend();
            let result = match &command {
                DeviceCommand::Toggle { mac, connected } => {
                    backend.toggle_device_connection(mac, *connected).await
                }
                DeviceCommand::Forget { mac } => backend.forget_device(mac).await,
            };

            let action = match result {
                Ok(output) => {
                    tracing::debug!("{:?}: {}", command, output.trim());
                    refresher.cycle(Duration::ZERO).await
                }
                Err(e) => {
                    tracing::warn!("{:?} failed: {}", command, e);
                    PanelAction::RefreshFailed(e.to_string())
                }
            };
            if tx.send(action).is_err() {
                tracing::debug!("Panel closed before {:?} finished", command);
            }
        });
    }

    /// Apply results from finished background work. Returns whether the
    /// panel needs to be redrawn.
    pub fn drain_actions(&mut self) -> bool {
        let mut changed = false;
        while let Ok(action) = self.actions_rx.try_recv() {
            changed |= self.apply(action);
        }
        changed
    }

    pub fn tick(&mut self) {
        if self.store.state().loading {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    fn apply(&mut self, action: PanelAction) -> bool {
        let selected_mac = self.selected_device().map(|d| d.mac().to_string());
        let before = Arc::clone(&self.store.state().devices);

        let changed = self.store.apply(action);

        // Keep the cursor on the same device when the list was replaced
        if !Arc::ptr_eq(&before, &self.store.state().devices) {
            let devices = self.devices();
            let selected = selected_mac
                .and_then(|mac| devices.iter().position(|d| d.mac() == mac))
                .unwrap_or_else(|| self.selected.min(devices.len().saturating_sub(1)));
            self.selected = selected;
        }

        changed
    }

    /// Wait for the next background result and apply it.
    #[cfg(test)]
    pub(crate) async fn settle(&mut self) {
        if let Some(action) = self.actions_rx.recv().await {
            self.apply(action);
        }
    }
}

#[derive(Debug)]
enum DeviceCommand {
    Toggle { mac: String, connected: bool },
    Forget { mac: String },
}

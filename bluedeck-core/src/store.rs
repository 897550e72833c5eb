/*!
 * Panel State Store
 * Single owner of status, devices and the loading flag
 */

use chrono::{DateTime, Local};
use std::sync::Arc;

use crate::device::{BluetoothStatus, DeviceList};
use crate::reconcile::reconcile;

/// Everything one refresh cycle learned from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub status: BluetoothStatus,
    pub devices: DeviceList,
}

#[derive(Debug)]
pub enum PanelAction {
    RefreshStarted,
    RefreshCompleted(Snapshot),
    RefreshFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    pub status: BluetoothStatus,
    pub devices: Arc<DeviceList>,
    pub loading: bool,
    pub last_updated: Option<DateTime<Local>>,
    pub last_error: Option<String>,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            status: BluetoothStatus::Loading,
            devices: Arc::new(DeviceList::new()),
            loading: false,
            last_updated: None,
            last_error: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct PanelStore {
    state: PanelState,
    revision: u64,
}

impl PanelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    /// Bumped only when `apply` changed something.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply an action. Returns whether the state changed.
    pub fn apply(&mut self, action: PanelAction) -> bool {
        let mut next = self.state.clone();

        match action {
            PanelAction::RefreshStarted => {
                next.loading = true;
            }
            PanelAction::RefreshCompleted(snapshot) => {
                next.status = snapshot.status;
                next.devices = reconcile(&self.state.devices, snapshot.devices);
                next.loading = false;
                next.last_updated = Some(Local::now());
                next.last_error = None;
            }
            PanelAction::RefreshFailed(message) => {
                // Status and devices keep whatever was shown before
                next.loading = false;
                next.last_error = Some(message);
            }
        }

        if next == self.state {
            return false;
        }

        self.state = next;
        self.revision += 1;
        true
    }
}

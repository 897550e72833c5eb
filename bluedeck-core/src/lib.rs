/*!
 * BLUEDECK Core
 * Bluetooth quick access panel: backend calls, response parsing and panel state
 */

pub mod backend;
pub mod client;
pub mod device;
pub mod error;
pub mod parser;
pub mod protocol;
pub mod reconcile;
pub mod refresh;
pub mod store;

pub use backend::Backend;
pub use client::DaemonClient;
pub use device::{BluetoothStatus, Device, DeviceList};
pub use error::{Error, Result};
pub use refresh::{Refresher, MANUAL_REFRESH_DELAY};
pub use store::{PanelAction, PanelState, PanelStore, Snapshot};

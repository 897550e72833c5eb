/*!
 * Backend Response Parsing
 * Turns raw bluetoothctl text into status and device records
 *
 * Nothing in here fails: unrecognised lines are skipped and missing fields
 * fall back to defaults, so the backend's output format can drift without
 * breaking a refresh.
 */

use crate::device::{BluetoothStatus, Device, DeviceList};

/// Keys whose value runs to the end of the line when written bluetoothctl
/// style, as the line's only field (`Name: Foo Bar`).
const TEXT_KEYS: [&str; 2] = ["name", "alias"];

const NO_CONTROLLER_MARKER: &str = "no default controller available";

/// Fields recovered from one `get_device_info` reply. `None` means the
/// reply did not mention the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    pub name: Option<String>,
    pub alias: Option<String>,
    pub connected: Option<bool>,
    pub trusted: Option<bool>,
    pub paired: Option<bool>,
}

pub fn parse_bluetooth_status(raw: &str) -> BluetoothStatus {
    let mut powered = None;
    let mut discoverable = None;

    for line in raw.lines() {
        if line.to_ascii_lowercase().contains(NO_CONTROLLER_MARKER) {
            return BluetoothStatus::NoAdapter;
        }

        // First controller wins when several are listed
        for (key, value) in fields(line) {
            match key.as_str() {
                "powered" if powered.is_none() => powered = parse_flag(value),
                "discoverable" if discoverable.is_none() => discoverable = parse_flag(value),
                _ => {}
            }
        }
    }

    match (powered, discoverable) {
        (Some(true), Some(true)) => BluetoothStatus::Discoverable,
        (Some(true), _) => BluetoothStatus::On,
        (Some(false), _) => BluetoothStatus::Off,
        (None, _) => BluetoothStatus::Unknown,
    }
}

/// Parse a paired-device listing into devices carrying only address and name.
///
/// Accepts both `Device <mac> <name>` (bluetoothctl) and bare `<mac> <name>`
/// lines. Anything that does not start with an address is ignored.
pub fn parse_devices(raw: &str) -> DeviceList {
    raw.lines().filter_map(parse_device_line).collect()
}

fn parse_device_line(line: &str) -> Option<Device> {
    let line = line.trim();
    let line = line
        .strip_prefix("Device")
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .map_or(line, str::trim_start);

    let (mac, name) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    if !is_mac_address(mac) {
        return None;
    }

    Some(Device::new(mac, name.trim()))
}

/// Parse one info reply. The first usable value of each field wins.
pub fn parse_device_info(raw: &str) -> DeviceInfo {
    let mut info = DeviceInfo::default();

    for line in raw.lines() {
        for (key, value) in fields(line) {
            match key.as_str() {
                "name" if info.name.is_none() && !value.is_empty() => {
                    info.name = Some(value.to_string());
                }
                "alias" if info.alias.is_none() && !value.is_empty() => {
                    info.alias = Some(value.to_string());
                }
                "connected" if info.connected.is_none() => info.connected = parse_flag(value),
                "trusted" if info.trusted.is_none() => info.trusted = parse_flag(value),
                "paired" if info.paired.is_none() => info.paired = parse_flag(value),
                _ => {}
            }
        }
    }

    info
}

/// Parse info replies, keeping them aligned with the order they were requested in.
pub fn parse_devices_info<S: AsRef<str>>(raws: &[S]) -> Vec<DeviceInfo> {
    raws.iter().map(|raw| parse_device_info(raw.as_ref())).collect()
}

/// Fold an info reply into the device it was requested for.
pub fn merge(partial: Device, info: &DeviceInfo) -> Device {
    let mut device = partial;

    if let Some(name) = info.alias.as_ref().or(info.name.as_ref()) {
        device.name = name.clone();
    }
    if let Some(connected) = info.connected {
        device.connected = connected;
    }
    if info.trusted.is_some() {
        device.trusted = info.trusted;
    }
    if let Some(paired) = info.paired {
        device.paired = paired;
    }

    device
}

/// Merge positionally. Devices without a matching reply keep their defaults.
pub fn merge_all(partials: DeviceList, infos: &[DeviceInfo]) -> DeviceList {
    partials
        .into_iter()
        .enumerate()
        .map(|(i, partial)| match infos.get(i) {
            Some(info) => merge(partial, info),
            None => partial,
        })
        .collect()
}

/// Six colon-separated hex octets.
pub fn is_mac_address(candidate: &str) -> bool {
    let octets: Vec<&str> = candidate.split(':').collect();
    octets.len() == 6
        && octets
            .iter()
            .all(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "true" | "on" | "1" => Some(true),
        "no" | "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Split a line into `key: value` pairs.
///
/// Handles one field per line (`Connected: yes`) as well as several on a
/// single line (`name:Pad connected:true`). Keys come back lowercased.
fn fields(line: &str) -> Vec<(String, &str)> {
    let mut pairs = Vec::new();
    let mut rest = line.trim();
    let mut leading = true;

    while let Some((key, tail)) = rest.split_once(':') {
        let key = key.trim().to_ascii_lowercase();

        if leading && tail.starts_with(' ') && TEXT_KEYS.contains(&key.as_str()) {
            pairs.push((key, tail.trim()));
            break;
        }
        leading = false;

        let tail = tail.trim_start();

        let (value, remainder) = tail.split_once(char::is_whitespace).unwrap_or((tail, ""));
        pairs.push((key, value));
        rest = remainder.trim_start();
    }

    pairs
}

use std::sync::Arc;

use crate::device::DeviceList;

/// Keep the displayed list when a refresh brings back identical data.
///
/// Comparison is order-sensitive and covers every field of every device.
/// When nothing changed the returned `Arc` points at the same allocation as
/// `previous`, so views can skip work with `Arc::ptr_eq`.
pub fn reconcile(previous: &Arc<DeviceList>, next: DeviceList) -> Arc<DeviceList> {
    if **previous == next {
        Arc::clone(previous)
    } else {
        Arc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Device;

    fn device(mac: &str, name: &str, connected: bool) -> Device {
        let mut device = Device::new(mac, name);
        device.connected = connected;
        device
    }

    fn sample() -> DeviceList {
        vec![
            device("AA:BB:CC:DD:EE:01", "One", true),
            device("AA:BB:CC:DD:EE:02", "Two", false),
        ]
    }

    #[test]
    fn identical_data_keeps_previous_allocation() {
        let previous = Arc::new(sample());
        let result = reconcile(&previous, sample());
        assert!(Arc::ptr_eq(&previous, &result));
    }

    #[test]
    fn empty_lists_are_equal() {
        let previous = Arc::new(DeviceList::new());
        assert!(Arc::ptr_eq(&previous, &reconcile(&previous, Vec::new())));
    }

    #[test]
    fn field_change_replaces_list() {
        let previous = Arc::new(sample());
        let mut next = sample();
        next[1].trusted = Some(true);

        let result = reconcile(&previous, next.clone());

        assert!(!Arc::ptr_eq(&previous, &result));
        assert_eq!(*result, next);
    }

    #[test]
    fn reordering_replaces_list() {
        let previous = Arc::new(sample());
        let mut next = sample();
        next.reverse();

        let result = reconcile(&previous, next);

        assert!(!Arc::ptr_eq(&previous, &result));
        assert_eq!(result[0].mac(), "AA:BB:CC:DD:EE:02");
    }

    #[test]
    fn added_device_replaces_list() {
        let previous = Arc::new(sample());
        let mut next = sample();
        next.push(device("AA:BB:CC:DD:EE:03", "Three", false));

        assert_eq!(reconcile(&previous, next).len(), 3);
    }
}

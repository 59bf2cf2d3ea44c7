//! # Device Registry Module
//!
//! Owns the mapping from backend-native device handles to device records,
//! assigns device IDs, and sequences the attach/detach lifecycle.
//!
//! ## Lifecycle
//!
//! A record moves through three states: attached, disconnected, removed.
//! [`DeviceRegistry::mark_disconnected`] is phase one and may be requested
//! from any source (native removal notification, read error); it only
//! flips a flag. [`DeviceRegistry::take_disconnected`] is phase two, run by
//! the dispatch pass, which removes flagged records so detach handlers fire
//! exactly once and only from the dispatch context. There is no way back:
//! a reconnected physical device is a new logical device with a new ID.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::axis::AxisCalibration;
use super::device::{
    CapabilityScan, Device, DeviceId, ElementId, RawHandle, UNKNOWN_DESCRIPTION,
};

/// Logical slot an element resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Logical button index.
    Button(usize),
    /// Logical axis index.
    Axis(usize),
}

/// Per-device state owned exclusively by the registry.
#[derive(Debug)]
pub struct DeviceRecord {
    /// The client-visible device model.
    pub device: Device,
    /// Set by phase one of detach; cleared never.
    pub disconnected: bool,
    /// Backend-native element identifier to logical slot. Built once at
    /// attach time, immutable thereafter.
    element_map: HashMap<ElementId, Slot>,
    /// Axis calibrations, index-aligned with `device.axes`.
    axis_calibrations: Vec<AxisCalibration>,
}

impl DeviceRecord {
    /// Resolves a native element identifier to its logical slot.
    ///
    /// Unmapped identifiers return `None`; devices routinely expose
    /// elements the capability scan intentionally excluded.
    #[must_use]
    pub fn resolve_element(&self, element: ElementId) -> Option<Slot> {
        self.element_map.get(&element).copied()
    }

    /// Mutable access to the calibration backing one logical axis.
    pub fn axis_calibration_mut(&mut self, axis_id: usize) -> Option<&mut AxisCalibration> {
        self.axis_calibrations.get_mut(axis_id)
    }
}

/// Maps backend-native device handles to device records and assigns IDs.
///
/// Lookup is a hash map in both directions of the hot path: handle to
/// record, and per-record element to slot, so resolving an incoming sample
/// never scans.
#[derive(Debug)]
pub struct DeviceRegistry {
    devices: HashMap<RawHandle, DeviceRecord>,
    next_device_id: u32,
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceRegistry {
    /// Creates an empty registry. IDs start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            devices: HashMap::new(),
            next_device_id: 1,
        }
    }

    /// Registers a device from a capability scan and assigns the next ID.
    ///
    /// Returns the assigned ID, or `None` when the scan is malformed
    /// (zero buttons and zero axes) or the handle is already registered.
    /// Failures are logged and must not corrupt the registry; no handler
    /// fires for a rejected device.
    pub fn attach(&mut self, handle: RawHandle, scan: CapabilityScan) -> Option<DeviceId> {
        if scan.is_empty() {
            warn!(
                "Ignoring device with no buttons or axes (vendor=0x{:04x} product=0x{:04x})",
                scan.vendor_id, scan.product_id
            );
            return None;
        }
        if self.devices.contains_key(&handle) {
            warn!("Ignoring duplicate attach for handle {:?}", handle);
            return None;
        }

        let mut element_map = HashMap::with_capacity(scan.buttons.len() + scan.axes.len());
        for (button_id, element) in scan.buttons.iter().enumerate() {
            element_map.insert(*element, Slot::Button(button_id));
        }

        let mut axis_calibrations = Vec::with_capacity(scan.axes.len());
        for (axis_id, spec) in scan.axes.iter().enumerate() {
            element_map.insert(spec.element, Slot::Axis(axis_id));
            axis_calibrations.push(AxisCalibration::new(
                spec.minimum,
                spec.maximum,
                spec.flat,
                spec.fuzz,
            ));
        }

        let description = if scan.description.is_empty() {
            UNKNOWN_DESCRIPTION.to_string()
        } else {
            scan.description
        };

        let device_id = DeviceId(self.next_device_id);
        self.next_device_id += 1;

        let device = Device::new(
            device_id,
            scan.vendor_id,
            scan.product_id,
            description,
            scan.axes.len(),
            scan.buttons.len(),
        );
        debug!(
            "Registered device {} ({}) with {} buttons, {} axes",
            device_id,
            device.description,
            device.buttons.len(),
            device.axes.len()
        );

        self.devices.insert(
            handle,
            DeviceRecord {
                device,
                disconnected: false,
                element_map,
                axis_calibrations,
            },
        );
        Some(device_id)
    }

    /// Phase one of detach: flags the record for removal.
    ///
    /// Idempotent; an unknown handle is a no-op. Returns whether a record
    /// was newly flagged.
    pub fn mark_disconnected(&mut self, handle: RawHandle) -> bool {
        match self.devices.get_mut(&handle) {
            Some(record) if !record.disconnected => {
                record.disconnected = true;
                true
            }
            Some(_) => false,
            None => {
                debug!("Detach for unknown handle {:?}, ignoring", handle);
                false
            }
        }
    }

    /// Phase two of detach: removes every flagged record.
    ///
    /// Called only from the dispatch pass, which fires the detach handler
    /// for each returned record exactly once.
    pub fn take_disconnected(&mut self) -> Vec<DeviceRecord> {
        let handles: Vec<RawHandle> = self
            .devices
            .iter()
            .filter(|(_, record)| record.disconnected)
            .map(|(handle, _)| *handle)
            .collect();

        handles
            .into_iter()
            .filter_map(|handle| self.devices.remove(&handle))
            .collect()
    }

    /// Resolves a native handle to its record.
    #[must_use]
    pub fn resolve(&self, handle: RawHandle) -> Option<&DeviceRecord> {
        self.devices.get(&handle)
    }

    /// Mutable variant of [`DeviceRegistry::resolve`] for the dispatch pass.
    pub fn resolve_mut(&mut self, handle: RawHandle) -> Option<&mut DeviceRecord> {
        self.devices.get_mut(&handle)
    }

    /// Looks a device up by its assigned ID.
    #[must_use]
    pub fn device(&self, device_id: DeviceId) -> Option<&Device> {
        self.devices
            .values()
            .map(|record| &record.device)
            .find(|device| device.device_id == device_id)
    }

    /// Iterates over all attached devices.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values().map(|record| &record.device)
    }

    /// Number of attached devices, flagged records included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// True when no devices are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

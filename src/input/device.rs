//! # Device Model Module
//!
//! The uniform device model exposed to clients, plus the value types that
//! cross the backend boundary.
//!
//! ## Identity
//!
//! Backends address devices by an opaque [`RawHandle`] (a file descriptor
//! index, HID device pointer, or similar). The engine assigns each attached
//! device a process-unique [`DeviceId`] that stays stable for the device's
//! lifetime and is never reused within a run. A physically reconnected
//! device is a new logical device with a new ID.
//!
//! ## Elements
//!
//! Individual buttons and axes are addressed by an opaque [`ElementId`]
//! (an evdev event code, a HID element cookie). The capability scan maps
//! each element to a contiguous logical index at attach time; samples for
//! elements the scan did not report are silently ignored.

/// Sentinel description used when the backend cannot read a device name.
pub const UNKNOWN_DESCRIPTION: &str = "<Unknown>";

/// Process-unique device identifier, assigned monotonically at attach time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub u32);

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque backend-native device handle.
///
/// Only the backend that issued a handle can interpret it; the engine uses
/// it purely as a lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawHandle(pub u64);

/// Opaque backend-native identifier for one button or axis on a device.
///
/// Backends must guarantee uniqueness within a device across buttons and
/// axes combined (the evdev backend tags key and absolute-axis codes into
/// disjoint ranges for this reason).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u32);

/// One physical input device as seen by a client.
///
/// Handlers receive a non-owning reference to this record, valid only for
/// the duration of the callback. The `axes` and `buttons` vectors are sized
/// once at attach time from the capability scan and never resized.
///
/// # Examples
///
/// ```
/// use padhub::input::device::{Device, DeviceId};
///
/// let device = Device::new(DeviceId(1), 0x054c, 0x0ce6, "Wireless Controller".into(), 6, 14);
/// assert_eq!(device.axes.len(), 6);
/// assert_eq!(device.buttons.len(), 14);
/// assert!(device.axes.iter().all(|&v| v == 0.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    /// Process-unique ID, stable for the device's lifetime.
    pub device_id: DeviceId,
    /// USB vendor ID as reported by the backend. Informational only.
    pub vendor_id: u16,
    /// USB product ID as reported by the backend. Informational only.
    pub product_id: u16,
    /// Human-readable name, or [`UNKNOWN_DESCRIPTION`].
    pub description: String,
    /// Normalized axis values in [-1, 1], one per logical axis.
    pub axes: Vec<f32>,
    /// Button states, one per logical button.
    pub buttons: Vec<bool>,
}

impl Device {
    /// Creates a device record with centered axes and released buttons.
    #[must_use]
    pub fn new(
        device_id: DeviceId,
        vendor_id: u16,
        product_id: u16,
        description: String,
        num_axes: usize,
        num_buttons: usize,
    ) -> Self {
        Self {
            device_id,
            vendor_id,
            product_id,
            description,
            axes: vec![0.0; num_axes],
            buttons: vec![false; num_buttons],
        }
    }
}

/// Per-axis raw calibration reported by a capability scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSpec {
    /// Backend-native element identifier for this axis.
    pub element: ElementId,
    /// Raw sample lower bound.
    pub minimum: i32,
    /// Raw sample upper bound.
    pub maximum: i32,
    /// Deadzone half-width in raw units.
    pub flat: i32,
    /// Backend-reported noise threshold in raw units. May be 0.
    pub fuzz: i32,
}

/// One-time capability scan supplied by a backend at attach time.
///
/// Logical indices are assigned 0..N in the order the backend lists
/// elements here, and stay stable for the device's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityScan {
    pub vendor_id: u16,
    pub product_id: u16,
    /// Device name; empty means unknown.
    pub description: String,
    /// Button elements, in logical index order.
    pub buttons: Vec<ElementId>,
    /// Axis elements with raw calibration, in logical index order.
    pub axes: Vec<AxisSpec>,
}

impl CapabilityScan {
    /// True when the scan reports no usable elements at all.
    ///
    /// Such a device is malformed from the engine's point of view and is
    /// never registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty() && self.axes.is_empty()
    }
}

/// Value-typed raw event crossing the backend boundary.
///
/// This is the only type producer threads ever hand to the dispatch side;
/// it carries no references into device records, so a queued event for a
/// device that has since been removed simply fails to resolve.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEvent {
    /// A new physical device appeared; carries its capability scan.
    Attached {
        handle: RawHandle,
        scan: CapabilityScan,
    },
    /// A raw integer sample for one element (button or axis).
    Sample {
        handle: RawHandle,
        element: ElementId,
        value: i32,
    },
    /// The backend reported removal or an unrecoverable read error.
    Detached { handle: RawHandle },
}

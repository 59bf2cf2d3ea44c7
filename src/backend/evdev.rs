//! # Evdev Backend Module
//!
//! Linux gamepad/joystick backend using the evdev interface, running in
//! the single-threaded poll scheduling shape: every call to
//! [`Backend::poll_events`] reads pending kernel events inline.
//!
//! ## Device detection
//!
//! [`EvdevBackend::rescan`] walks `/dev/input/event*` (sorted, for
//! deterministic ordering) and opens any node advertising gamepad or
//! joystick buttons. Nodes that cannot be opened — permissions, races with
//! udev — are skipped and retried on the next rescan. The capability scan
//! is built from the kernel's absinfo (min/max/fuzz/flat per axis) and the
//! supported key set.
//!
//! ## Element identifiers
//!
//! Kernel key codes and absolute-axis codes live in overlapping numeric
//! ranges, so they are tagged into disjoint [`ElementId`] ranges before
//! crossing the backend boundary.
//!
//! ## Errors
//!
//! A failed read on an open device is indistinguishable from unplugging as
//! far as the engine cares: the backend emits a `Detached` event and
//! forgets the node, so a replug attaches as a new logical device.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use evdev::{Device, InputEvent, InputEventKind, Key};
use tracing::{debug, info};

use crate::backend::Backend;
use crate::error::{PadHubError, Result};
use crate::input::device::{AxisSpec, CapabilityScan, ElementId, RawEvent, RawHandle};

/// Default directory scanned for event devices.
pub const DEFAULT_INPUT_DIR: &str = "/dev/input";

/// Tag added to kernel key codes to form element identifiers.
const KEY_ELEMENT_BASE: u32 = 0x1_0000;
/// Tag added to kernel absolute-axis codes to form element identifiers.
const ABS_ELEMENT_BASE: u32 = 0x2_0000;

/// Element identifier for a kernel key code.
#[must_use]
pub fn key_element(code: u16) -> ElementId {
    ElementId(KEY_ELEMENT_BASE | u32::from(code))
}

/// Element identifier for a kernel absolute-axis code.
#[must_use]
pub fn abs_element(code: u16) -> ElementId {
    ElementId(ABS_ELEMENT_BASE | u32::from(code))
}

/// One open event device.
struct OpenDevice {
    handle: RawHandle,
    path: PathBuf,
    device: Device,
    /// Set when a read failed; the device is reported detached and dropped.
    failed: bool,
}

/// Linux evdev backend (single-threaded poll model).
pub struct EvdevBackend {
    input_dir: PathBuf,
    devices: Vec<OpenDevice>,
    /// Nodes currently attached, keyed by path.
    open_paths: HashSet<PathBuf>,
    /// Nodes probed and found to not be game controllers.
    ignored_paths: HashSet<PathBuf>,
    /// When set, only this node is ever opened.
    pinned: Option<PathBuf>,
    next_handle: u64,
}

impl EvdevBackend {
    /// Creates a backend over the default input directory.
    ///
    /// # Errors
    ///
    /// Returns `Backend` error when `/dev/input` does not exist.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use padhub::backend::evdev::EvdevBackend;
    ///
    /// let backend = EvdevBackend::open()?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open() -> Result<Self> {
        Self::with_input_dir(DEFAULT_INPUT_DIR)
    }

    /// Creates a backend over a specific input directory.
    pub fn with_input_dir(input_dir: impl Into<PathBuf>) -> Result<Self> {
        let input_dir = input_dir.into();
        if !input_dir.exists() {
            return Err(PadHubError::Backend(format!(
                "{} directory not found",
                input_dir.display()
            )));
        }
        Ok(Self {
            input_dir,
            devices: Vec::new(),
            open_paths: HashSet::new(),
            ignored_paths: HashSet::new(),
            pinned: None,
            next_handle: 1,
        })
    }

    /// Restricts the backend to a single device node, disabling scanning
    /// of the rest of the input directory.
    #[must_use]
    pub fn pinned_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.pinned = Some(path.into());
        self
    }

    /// Scans the input directory for new game controllers.
    ///
    /// Returns an `Attached` event for every newly opened device. Nodes
    /// already open, previously classified as something else, or not yet
    /// readable are skipped.
    pub fn rescan(&mut self) -> Vec<RawEvent> {
        let mut entries: Vec<PathBuf> = if let Some(pinned) = &self.pinned {
            vec![pinned.clone()]
        } else {
            match std::fs::read_dir(&self.input_dir) {
                Ok(entries) => entries
                    .filter_map(|entry| entry.ok())
                    .map(|entry| entry.path())
                    .collect(),
                Err(e) => {
                    debug!("Failed to read {}: {}", self.input_dir.display(), e);
                    return Vec::new();
                }
            }
        };

        // Sort for deterministic device ordering across rescans.
        entries.sort();

        let mut events = Vec::new();
        for path in entries {
            if !is_event_node(&path)
                || self.open_paths.contains(&path)
                || self.ignored_paths.contains(&path)
            {
                continue;
            }

            let device = match Device::open(&path) {
                Ok(device) => device,
                Err(e) => {
                    // Permission denied or a udev race; retry next rescan.
                    debug!("Could not open {}: {}", path.display(), e);
                    continue;
                }
            };

            if !is_game_controller(&device) {
                debug!("Ignoring non-controller device at {}", path.display());
                self.ignored_paths.insert(path);
                continue;
            }

            let scan = match capability_scan(&device) {
                Ok(scan) => scan,
                Err(e) => {
                    debug!("Could not read absinfo for {}: {}", path.display(), e);
                    self.ignored_paths.insert(path);
                    continue;
                }
            };

            let handle = RawHandle(self.next_handle);
            self.next_handle += 1;

            info!(
                "Found controller \"{}\" at {} (vendor=0x{:04x} product=0x{:04x})",
                scan.description,
                path.display(),
                scan.vendor_id,
                scan.product_id
            );

            self.open_paths.insert(path.clone());
            self.devices.push(OpenDevice {
                handle,
                path,
                device,
                failed: false,
            });
            events.push(RawEvent::Attached { handle, scan });
        }
        events
    }

    /// Number of currently open devices.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    fn read_device_events(open: &mut OpenDevice, events: &mut Vec<RawEvent>) {
        match open.device.fetch_events() {
            Ok(pending) => {
                for event in pending {
                    if let Some((element, value)) = translate_event(&event) {
                        events.push(RawEvent::Sample {
                            handle: open.handle,
                            element,
                            value,
                        });
                    }
                }
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                // Nothing pending this cycle.
            }
            Err(e) => {
                info!("Read error on {} ({}), detaching", open.path.display(), e);
                open.failed = true;
                events.push(RawEvent::Detached {
                    handle: open.handle,
                });
            }
        }
    }
}

impl Backend for EvdevBackend {
    fn poll_events(&mut self) -> Vec<RawEvent> {
        let mut events = Vec::new();
        for open in &mut self.devices {
            Self::read_device_events(open, &mut events);
        }

        // Drop failed devices; a replugged node attaches as a new device.
        if self.devices.iter().any(|open| open.failed) {
            let open_paths = &mut self.open_paths;
            self.devices.retain(|open| {
                if open.failed {
                    open_paths.remove(&open.path);
                }
                !open.failed
            });
        }
        events
    }
}

/// True for `/dev/input/event*` nodes.
fn is_event_node(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with("event"))
        .unwrap_or(false)
}

/// True when the device advertises gamepad or joystick buttons.
fn is_game_controller(device: &Device) -> bool {
    device
        .supported_keys()
        .map(|keys| keys.contains(Key::BTN_SOUTH) || keys.contains(Key::BTN_TRIGGER))
        .unwrap_or(false)
}

/// Builds the one-time capability scan for a freshly opened device.
fn capability_scan(device: &Device) -> io::Result<CapabilityScan> {
    let buttons: Vec<ElementId> = device
        .supported_keys()
        .map(|keys| keys.iter().map(|key| key_element(key.code())).collect())
        .unwrap_or_default();

    let mut axes = Vec::new();
    if let Some(supported) = device.supported_absolute_axes() {
        // One raw absinfo slot per possible axis code; only the supported
        // codes carry meaningful calibration.
        let abs_state = device.get_abs_state()?;
        for axis in supported.iter() {
            let info = abs_state[axis.0 as usize];
            axes.push(AxisSpec {
                element: abs_element(axis.0),
                minimum: info.minimum,
                maximum: info.maximum,
                flat: info.flat,
                fuzz: info.fuzz,
            });
        }
    }

    let id = device.input_id();
    Ok(CapabilityScan {
        vendor_id: id.vendor(),
        product_id: id.product(),
        description: device.name().unwrap_or_default().to_string(),
        buttons,
        axes,
    })
}

/// Translates one kernel event into an element sample.
///
/// Synchronization reports and anything that is neither a key nor an
/// absolute axis are dropped here; elements the capability scan excluded
/// are dropped later by the engine's cookie map.
fn translate_event(event: &InputEvent) -> Option<(ElementId, i32)> {
    match event.kind() {
        InputEventKind::Key(key) => Some((key_element(key.code()), event.value())),
        InputEventKind::AbsAxis(axis) => Some((abs_element(axis.0), event.value())),
        _ => None,
    }
}

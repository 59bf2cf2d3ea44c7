//! # Input Engine Module
//!
//! The dispatch-side pump: resolves raw events against the registry,
//! normalizes samples, updates device records, and fires client handlers.
//!
//! The engine is single-threaded by construction. Producer threads never
//! touch it; they hand over value-typed [`RawEvent`]s (through a
//! [`crate::queue::EventQueue`] or directly from a polling backend) and all
//! registry mutation and handler invocation happens here, on whichever
//! thread drives [`InputEngine::process_batch`].
//!
//! ## Usage
//!
//! ```
//! use padhub::input::engine::InputEngine;
//!
//! let mut engine = InputEngine::new();
//! engine.on_attach(|device| {
//!     println!("Attached: {} ({} buttons)", device.description, device.buttons.len());
//! });
//! engine.on_axis_move(|device, axis_id, value, _last| {
//!     println!("Device {} axis {} -> {:.3}", device.device_id, axis_id, value);
//! });
//! ```

use super::button::transition;
use super::device::{Device, DeviceId, ElementId, RawEvent, RawHandle};
use super::dispatch::EventDispatcher;
use super::registry::{DeviceRegistry, Slot};

/// Normalization, state-tracking, and lifecycle engine.
#[derive(Debug, Default)]
pub struct InputEngine {
    registry: DeviceRegistry,
    dispatcher: EventDispatcher,
}

impl InputEngine {
    /// Creates an engine with an empty registry and no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: DeviceRegistry::new(),
            dispatcher: EventDispatcher::new(),
        }
    }

    /// Registers the attach handler, replacing any previous one.
    pub fn on_attach(&mut self, handler: impl FnMut(&Device) + 'static) {
        self.dispatcher.on_attach(handler);
    }

    /// Registers the detach handler, replacing any previous one.
    pub fn on_detach(&mut self, handler: impl FnMut(&Device) + 'static) {
        self.dispatcher.on_detach(handler);
    }

    /// Registers the button-down handler, replacing any previous one.
    pub fn on_button_down(&mut self, handler: impl FnMut(&Device, usize) + 'static) {
        self.dispatcher.on_button_down(handler);
    }

    /// Registers the button-up handler, replacing any previous one.
    pub fn on_button_up(&mut self, handler: impl FnMut(&Device, usize) + 'static) {
        self.dispatcher.on_button_up(handler);
    }

    /// Registers the axis-move handler, replacing any previous one.
    pub fn on_axis_move(&mut self, handler: impl FnMut(&Device, usize, f32, f32) + 'static) {
        self.dispatcher.on_axis_move(handler);
    }

    /// Processes one raw event.
    ///
    /// Attach failures (malformed scans) are absorbed; samples for unknown
    /// handles or unmapped elements are silently ignored; detach only flags
    /// the record — removal and the detach handler happen in
    /// [`InputEngine::sweep`].
    pub fn process(&mut self, event: RawEvent) {
        match event {
            RawEvent::Attached { handle, scan } => {
                if let Some(device_id) = self.registry.attach(handle, scan) {
                    let Self {
                        registry,
                        dispatcher,
                    } = self;
                    if let Some(device) = registry.device(device_id) {
                        dispatcher.fire_attach(device);
                    }
                }
            }
            RawEvent::Sample {
                handle,
                element,
                value,
            } => self.process_sample(handle, element, value),
            RawEvent::Detached { handle } => {
                self.registry.mark_disconnected(handle);
            }
        }
    }

    /// Processes a batch of raw events in order, then sweeps disconnected
    /// devices.
    pub fn process_batch(&mut self, events: Vec<RawEvent>) {
        for event in events {
            self.process(event);
        }
        self.sweep();
    }

    /// Removes records flagged as disconnected and fires their detach
    /// handler exactly once each.
    pub fn sweep(&mut self) {
        for record in self.registry.take_disconnected() {
            self.dispatcher.fire_detach(&record.device);
        }
    }

    fn process_sample(&mut self, handle: RawHandle, element: ElementId, value: i32) {
        let Self {
            registry,
            dispatcher,
        } = self;

        let Some(record) = registry.resolve_mut(handle) else {
            return;
        };
        // A flagged record is logically gone; late samples are dropped.
        if record.disconnected {
            return;
        }
        let Some(slot) = record.resolve_element(element) else {
            return;
        };

        match slot {
            Slot::Button(button_id) => {
                let Some(state) = record.device.buttons.get_mut(button_id) else {
                    return;
                };
                let (is_down, edge) = transition(*state, value);
                *state = is_down;
                if let Some(edge) = edge {
                    dispatcher.fire_button(&record.device, button_id, edge);
                }
            }
            Slot::Axis(axis_id) => {
                let last_value;
                let accepted;
                {
                    let Some(calibration) = record.axis_calibration_mut(axis_id) else {
                        return;
                    };
                    last_value = calibration.last_value();
                    accepted = calibration.normalize(value);
                }
                if let Some(new_value) = accepted {
                    if let Some(slot_value) = record.device.axes.get_mut(axis_id) {
                        *slot_value = new_value;
                    }
                    dispatcher.fire_axis(&record.device, axis_id, new_value, last_value);
                }
            }
        }
    }

    /// Looks a device up by its assigned ID.
    #[must_use]
    pub fn device(&self, device_id: DeviceId) -> Option<&Device> {
        self.registry.device(device_id)
    }

    /// Iterates over all attached devices.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.registry.devices()
    }
}

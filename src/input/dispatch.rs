//! # Event Dispatch Module
//!
//! Stateless fan-out of normalized events to registered client handlers.
//!
//! One handler slot exists per event kind (attach, detach, button-down,
//! button-up, axis-move). Registering replaces the previous handler; an
//! unregistered handler is a no-op, never an error. Handlers run
//! synchronously on the dispatch context and receive a device reference
//! valid only for the duration of the call.

use super::button::ButtonEdge;
use super::device::Device;

/// Handler for device attach and detach events.
pub type DeviceHandler = Box<dyn FnMut(&Device)>;

/// Handler for button edges: `(device, button_id)`.
pub type ButtonHandler = Box<dyn FnMut(&Device, usize)>;

/// Handler for axis changes: `(device, axis_id, value, last_value)`.
pub type AxisHandler = Box<dyn FnMut(&Device, usize, f32, f32)>;

/// Registered client callbacks.
///
/// # Examples
///
/// ```
/// use padhub::input::dispatch::EventDispatcher;
///
/// let mut dispatcher = EventDispatcher::new();
/// dispatcher.on_attach(|device| {
///     println!("Attached: {}", device.description);
/// });
/// ```
#[derive(Default)]
pub struct EventDispatcher {
    attach: Option<DeviceHandler>,
    detach: Option<DeviceHandler>,
    button_down: Option<ButtonHandler>,
    button_up: Option<ButtonHandler>,
    axis_move: Option<AxisHandler>,
}

impl EventDispatcher {
    /// Creates a dispatcher with no handlers registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the attach handler, replacing any previous one.
    pub fn on_attach(&mut self, handler: impl FnMut(&Device) + 'static) {
        self.attach = Some(Box::new(handler));
    }

    /// Registers the detach handler, replacing any previous one.
    pub fn on_detach(&mut self, handler: impl FnMut(&Device) + 'static) {
        self.detach = Some(Box::new(handler));
    }

    /// Registers the button-down handler, replacing any previous one.
    pub fn on_button_down(&mut self, handler: impl FnMut(&Device, usize) + 'static) {
        self.button_down = Some(Box::new(handler));
    }

    /// Registers the button-up handler, replacing any previous one.
    pub fn on_button_up(&mut self, handler: impl FnMut(&Device, usize) + 'static) {
        self.button_up = Some(Box::new(handler));
    }

    /// Registers the axis-move handler, replacing any previous one.
    pub fn on_axis_move(&mut self, handler: impl FnMut(&Device, usize, f32, f32) + 'static) {
        self.axis_move = Some(Box::new(handler));
    }

    /// Fires the attach handler, if registered.
    pub fn fire_attach(&mut self, device: &Device) {
        if let Some(handler) = self.attach.as_mut() {
            handler(device);
        }
    }

    /// Fires the detach handler, if registered.
    pub fn fire_detach(&mut self, device: &Device) {
        if let Some(handler) = self.detach.as_mut() {
            handler(device);
        }
    }

    /// Fires exactly one of the button handlers for the given edge.
    pub fn fire_button(&mut self, device: &Device, button_id: usize, edge: ButtonEdge) {
        let handler = match edge {
            ButtonEdge::Down => self.button_down.as_mut(),
            ButtonEdge::Up => self.button_up.as_mut(),
        };
        if let Some(handler) = handler {
            handler(device, button_id);
        }
    }

    /// Fires the axis-move handler, if registered.
    pub fn fire_axis(&mut self, device: &Device, axis_id: usize, value: f32, last_value: f32) {
        if let Some(handler) = self.axis_move.as_mut() {
            handler(device, axis_id, value, last_value);
        }
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("attach", &self.attach.is_some())
            .field("detach", &self.detach.is_some())
            .field("button_down", &self.button_down.is_some())
            .field("button_up", &self.button_up.is_some())
            .field("axis_move", &self.axis_move.is_some())
            .finish()
    }
}

//! # Backend Module
//!
//! Platform seam between native input APIs and the core engine.
//!
//! Every platform backend — however it receives input natively — presents
//! the same capability set to the engine: attach notifications carrying a
//! one-time capability scan, raw integer samples per element, and detach
//! notifications, all expressed as [`crate::input::device::RawEvent`]s.
//! The core never branches on platform.
//!
//! Two scheduling shapes are supported:
//!
//! - **Single-threaded poll** ([`evdev::EvdevBackend`]): `poll_events`
//!   reads the native API inline; no locking anywhere.
//! - **Producer thread** ([`crate::pump::EventPump`]): a dedicated thread
//!   feeds a bounded [`crate::queue::EventQueue`] and `poll_events` drains
//!   it. The pump implements [`Backend`] too, so the engine drives both
//!   shapes identically.

use crate::input::device::RawEvent;

#[cfg(target_os = "linux")]
pub mod evdev;

/// A source of raw input events for the engine.
///
/// Implementations absorb native-level failures into lifecycle events: a
/// read error on an attached device surfaces as a `Detached` event, never
/// as an `Err` the engine would have to interpret.
pub trait Backend {
    /// Returns every event that arrived since the last call, in order.
    ///
    /// Never blocks waiting for input; an empty vector means nothing
    /// happened.
    fn poll_events(&mut self) -> Vec<RawEvent>;
}

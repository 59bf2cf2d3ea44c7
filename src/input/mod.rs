//! # Input Module
//!
//! Device-independent gamepad input handling.
//!
//! This module handles:
//! - Tracking attached devices and their logical identities
//! - Normalizing raw axis values to [-1.0, 1.0] with deadzone and noise filtering
//! - Turning raw button samples into down/up edges
//! - Dispatching callbacks for attach, detach, button, and axis events
//!
//! The [`engine::InputEngine`] ties the pieces together: backends feed it
//! [`device::RawEvent`]s and it keeps per-device state current while firing
//! the registered handlers.

pub mod axis;
pub mod button;
pub mod device;
pub mod dispatch;
pub mod engine;
pub mod registry;

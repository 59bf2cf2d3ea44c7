//! # PadHub Library
//!
//! Normalize gamepad input from platform backends into a uniform event model.
//!
//! This library tracks attached controllers, converts raw axis and button
//! samples into calibrated, deduplicated events, and dispatches them through
//! user-registered callbacks. Backends may run inline (polled each cycle) or
//! on a producer thread feeding a bounded event queue.

pub mod backend;
pub mod config;
pub mod error;
pub mod input;
pub mod pump;
pub mod queue;

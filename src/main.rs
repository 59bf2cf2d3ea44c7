//! # PadHub
//!
//! Gamepad input hub: watches for controllers, normalizes their raw input,
//! and reports attach/detach, button, and axis events.

use anyhow::Result;
use tokio::time::{interval, Duration};
use tracing::{debug, info, warn};
use tracing_subscriber;

use padhub::backend::evdev::EvdevBackend;
use padhub::backend::Backend;
use padhub::config::Config;
use padhub::input::engine::InputEngine;

/// Default configuration file path
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Seconds between periodic status log messages
const STATUS_INTERVAL_SECS: u64 = 10;

/// Main entry point for PadHub
///
/// Initializes the application and runs the main loop that polls connected
/// controllers for input and periodically rescans for hotplugged devices.
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber
///    - Load configuration (falls back to defaults when no file exists)
///    - Open the evdev backend and register event handlers
///
/// 2. **Main Loop**
///    - Poll open devices for raw events every `poll_interval_ms`
///    - Rescan for newly connected controllers every `rescan_interval_ms`
///    - Log a status line every 10 seconds
///    - Handle Ctrl+C for graceful shutdown
///
/// 3. **Graceful Shutdown**
///    - Stop polling
///    - Log total event count
///    - Clean exit
///
/// # Errors
///
/// Returns error if:
/// - An explicitly given configuration file cannot be loaded
/// - The input directory does not exist
///
/// # Examples
///
/// Run the application:
/// ```bash
/// cargo run --release
/// ```
///
/// Expected output:
/// ```text
/// INFO padhub: PadHub v0.1.0 starting...
/// INFO padhub::backend::evdev: Found controller "Wireless Controller" at /dev/input/event7 (vendor=0x054c product=0x0ce6)
/// INFO padhub: Attached: "Wireless Controller" (device 1, 8 axes, 17 buttons)
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("PadHub v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration; an explicit path on the command line must exist,
    // the default path may not.
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path)?,
        None => match Config::load(DEFAULT_CONFIG_PATH) {
            Ok(config) => config,
            Err(e) => {
                debug!("No config at {} ({}), using defaults", DEFAULT_CONFIG_PATH, e);
                Config::default()
            }
        },
    };

    // Open the input backend
    let mut backend = EvdevBackend::open()?;
    if !config.input.device_path.is_empty() {
        info!("Pinned to device {}", config.input.device_path);
        backend = backend.pinned_to(&config.input.device_path);
    }

    // Register event handlers
    let mut engine = InputEngine::new();
    engine.on_attach(|device| {
        info!(
            "Attached: \"{}\" (device {}, {} axes, {} buttons)",
            device.description,
            device.device_id,
            device.axes.len(),
            device.buttons.len()
        );
    });
    engine.on_detach(|device| {
        info!("Detached: \"{}\" (device {})", device.description, device.device_id);
    });
    engine.on_button_down(|device, button| {
        info!("Device {} button {} down", device.device_id, button);
    });
    engine.on_button_up(|device, button| {
        info!("Device {} button {} up", device.device_id, button);
    });
    engine.on_axis_move(|device, axis, value, last_value| {
        debug!(
            "Device {} axis {} moved to {:.3} (was {:.3})",
            device.device_id, axis, value, last_value
        );
    });

    let mut poll_interval = interval(Duration::from_millis(config.input.poll_interval_ms));
    let mut rescan_interval = interval(Duration::from_millis(config.input.rescan_interval_ms));
    let mut status_interval = interval(Duration::from_secs(STATUS_INTERVAL_SECS));

    info!(
        "Watching for controllers (poll {}ms, rescan {}ms)",
        config.input.poll_interval_ms, config.input.rescan_interval_ms
    );
    info!("Press Ctrl+C to exit");

    let mut event_count: u64 = 0;
    let mut reported_empty = false;

    // Main loop
    loop {
        tokio::select! {
            // Read pending input from open devices
            _ = poll_interval.tick() => {
                let events = backend.poll_events();
                event_count += events.len() as u64;
                engine.process_batch(events);
            }

            // Look for hotplugged controllers
            _ = rescan_interval.tick() => {
                let events = backend.rescan();
                if !events.is_empty() {
                    engine.process_batch(events);
                }
                if backend.device_count() == 0 {
                    if !reported_empty {
                        warn!("No controllers connected");
                        reported_empty = true;
                    }
                } else {
                    reported_empty = false;
                }
            }

            // Periodic status line
            _ = status_interval.tick() => {
                info!(
                    "{} device(s) connected, {} raw events processed",
                    backend.device_count(), event_count
                );
            }

            // Handle Ctrl+C for graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                info!("Total raw events processed: {}", event_count);
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_interval_constant() {
        // Status lines should be infrequent relative to polling
        assert_eq!(STATUS_INTERVAL_SECS, 10);
    }

    #[test]
    fn test_default_config_path() {
        assert_eq!(DEFAULT_CONFIG_PATH, "config/default.toml");
    }
}

//! # Event Pump Module
//!
//! Producer-thread scheduling shape for backends whose native APIs deliver
//! input on a thread the client does not control (HID manager callbacks
//! and the like).
//!
//! A dedicated producer thread pulls events from an [`EventSource`] and
//! pushes them into a bounded [`EventQueue`]; the dispatch side drains the
//! queue through the regular [`Backend`] interface. The producer never
//! touches device records — it only moves value-typed [`RawEvent`]s — so
//! all registry mutation stays on the dispatch thread by construction.
//!
//! Teardown joins the producer before the pump is gone: once
//! [`EventPump::stop`] (or drop) returns, no producer effect can outlive
//! the records the drained events referred to.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, warn};

use crate::backend::Backend;
use crate::input::device::RawEvent;
use crate::queue::EventQueue;

/// Idle pause between polls when the source has nothing to report.
const IDLE_BACKOFF: Duration = Duration::from_millis(1);

/// Native-side event source driven by the producer thread.
///
/// `next_event` may block briefly inside the native API but must return
/// `None` rather than wait indefinitely, so the producer can observe the
/// stop flag.
#[cfg_attr(test, mockall::automock)]
pub trait EventSource: Send + 'static {
    /// Returns the next raw event, or `None` when nothing is pending.
    fn next_event(&mut self) -> Option<RawEvent>;
}

/// Owns the producer thread and the queue it feeds.
#[derive(Debug)]
pub struct EventPump {
    queue: EventQueue,
    stop: Arc<AtomicBool>,
    producer: Option<JoinHandle<()>>,
}

impl EventPump {
    /// Spawns the producer thread over `source`, feeding `queue`.
    ///
    /// The queue handle is cloned; the caller may keep one for inspection,
    /// but draining normally goes through [`Backend::poll_events`].
    pub fn spawn(mut source: impl EventSource, queue: EventQueue) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let producer_stop = Arc::clone(&stop);
        let producer_queue = queue.clone();

        let producer = std::thread::Builder::new()
            .name("padhub-producer".to_string())
            .spawn(move || {
                debug!("Producer thread started");
                while !producer_stop.load(Ordering::Relaxed) {
                    match source.next_event() {
                        Some(event) => producer_queue.push(event),
                        None => std::thread::sleep(IDLE_BACKOFF),
                    }
                }
                debug!("Producer thread stopping");
            });

        let producer = match producer {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Failed to spawn producer thread: {}", e);
                None
            }
        };

        Self {
            queue,
            stop,
            producer,
        }
    }

    /// Signals the producer thread and joins it.
    ///
    /// Events already queued remain drainable afterwards.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.producer.take() {
            if handle.join().is_err() {
                warn!("Producer thread panicked during shutdown");
            }
        }
    }

    /// Whether the producer thread is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.producer.is_some()
    }
}

impl Backend for EventPump {
    fn poll_events(&mut self) -> Vec<RawEvent> {
        self.queue.drain_all()
    }
}

impl Drop for EventPump {
    fn drop(&mut self) {
        self.stop();
    }
}

//! # Bounded Event Queue Module
//!
//! Mutual-exclusion-guarded FIFO of raw events, decoupling producer
//! threads from the dispatch thread on backends that deliver input
//! asynchronously.
//!
//! The lock is held only for the enqueue/drain manipulation itself. The
//! consumer drains everything in one move and processes the returned batch
//! without the lock, so slow handler execution can never stall a producer.
//!
//! ## Overflow
//!
//! When production outpaces consumption past a size threshold, the queue
//! compresses instead of growing without bound: samples are coalesced down
//! to the latest one per `(handle, element)` while attach/detach events and
//! relative order are preserved. Stale intermediate positions of a stick
//! are worthless to a consumer that far behind; lifecycle events never
//! are, so they always survive.
//!
//! ## Usage
//!
//! ```
//! use padhub::queue::EventQueue;
//! use padhub::input::device::{ElementId, RawEvent, RawHandle};
//!
//! let queue = EventQueue::new(1024);
//! let producer = queue.clone();
//!
//! producer.push(RawEvent::Sample {
//!     handle: RawHandle(1),
//!     element: ElementId(0),
//!     value: 200,
//! });
//!
//! let events = queue.drain_all();
//! assert_eq!(events.len(), 1);
//! ```

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::input::device::{ElementId, RawEvent, RawHandle};

/// Default compression threshold, in events.
pub const DEFAULT_COMPRESS_THRESHOLD: usize = 1024;

/// Cloneable handle to a shared, bounded raw-event queue.
#[derive(Debug, Clone)]
pub struct EventQueue {
    inner: Arc<Mutex<VecDeque<RawEvent>>>,
    compress_threshold: usize,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new(DEFAULT_COMPRESS_THRESHOLD)
    }
}

impl EventQueue {
    /// Creates a queue that compresses once it grows past `compress_threshold`.
    #[must_use]
    pub fn new(compress_threshold: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::new())),
            compress_threshold,
        }
    }

    /// Appends an event. Producer-side; never blocks beyond the lock.
    ///
    /// Triggers compression when the queue grows past the threshold, so
    /// memory stays bounded even when nothing drains.
    pub fn push(&self, event: RawEvent) {
        let mut queue = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        queue.push_back(event);
        if queue.len() > self.compress_threshold {
            let before = queue.len();
            compress(&mut queue);
            debug!("Event queue compressed from {} to {} events", before, queue.len());
        }
    }

    /// Drains and returns every queued event, in push order.
    ///
    /// Consumer-side; the returned batch is processed without the lock.
    #[must_use]
    pub fn drain_all(&self) -> Vec<RawEvent> {
        let mut queue = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        queue.drain(..).collect()
    }

    /// Current queue length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True when no events are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Coalesces samples down to the latest one per `(handle, element)`.
///
/// Attach and detach events always survive, and surviving events keep
/// their relative order. The result is bounded by the number of distinct
/// elements plus the number of lifecycle events.
fn compress(queue: &mut VecDeque<RawEvent>) {
    let mut seen: HashSet<(RawHandle, ElementId)> = HashSet::new();
    let mut kept: Vec<RawEvent> = Vec::new();

    // Walk newest to oldest so the first sample kept per slot is the latest.
    while let Some(event) = queue.pop_back() {
        match &event {
            RawEvent::Sample {
                handle, element, ..
            } => {
                if seen.insert((*handle, *element)) {
                    kept.push(event);
                }
            }
            RawEvent::Attached { .. } | RawEvent::Detached { .. } => kept.push(event),
        }
    }

    queue.extend(kept.into_iter().rev());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::device::CapabilityScan;

    fn sample(handle: u64, element: u32, value: i32) -> RawEvent {
        RawEvent::Sample {
            handle: RawHandle(handle),
            element: ElementId(element),
            value,
        }
    }

    fn detached(handle: u64) -> RawEvent {
        RawEvent::Detached {
            handle: RawHandle(handle),
        }
    }

    fn attached(handle: u64) -> RawEvent {
        RawEvent::Attached {
            handle: RawHandle(handle),
            scan: CapabilityScan {
                vendor_id: 0,
                product_id: 0,
                description: "pad".to_string(),
                buttons: vec![ElementId(0x130)],
                axes: vec![],
            },
        }
    }

    // ==================== FIFO Tests ====================

    #[test]
    fn test_drain_returns_push_order() {
        let queue = EventQueue::new(1024);
        queue.push(sample(1, 0, 10));
        queue.push(sample(1, 0, 20));
        queue.push(sample(1, 1, 30));

        let events = queue.drain_all();
        assert_eq!(
            events,
            vec![sample(1, 0, 10), sample(1, 0, 20), sample(1, 1, 30)]
        );
    }

    #[test]
    fn test_drain_empties_queue() {
        let queue = EventQueue::new(1024);
        queue.push(sample(1, 0, 10));

        assert_eq!(queue.drain_all().len(), 1);
        assert!(queue.is_empty());
        assert!(queue.drain_all().is_empty());
    }

    #[test]
    fn test_clone_shares_storage() {
        let queue = EventQueue::new(1024);
        let producer = queue.clone();
        producer.push(sample(1, 0, 10));

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.drain_all().len(), 1);
        assert!(producer.is_empty());
    }

    // ==================== Compression Tests ====================

    #[test]
    fn test_overflow_stays_bounded_and_nonempty() {
        let queue = EventQueue::new(64);
        // Two elements flooded well past the threshold.
        for i in 0..500 {
            queue.push(sample(1, i % 2, i as i32));
        }

        let len = queue.len();
        assert!(len > 0, "compression must keep the latest samples");
        assert!(len <= 64, "queue must stay bounded, got {}", len);
    }

    #[test]
    fn test_compression_keeps_latest_per_element() {
        let queue = EventQueue::new(4);
        queue.push(sample(1, 0, 1));
        queue.push(sample(1, 1, 2));
        queue.push(sample(1, 0, 3));
        queue.push(sample(1, 1, 4));
        queue.push(sample(1, 0, 5)); // crosses the threshold

        let events = queue.drain_all();
        assert_eq!(events, vec![sample(1, 1, 4), sample(1, 0, 5)]);
    }

    #[test]
    fn test_compression_preserves_lifecycle_events() {
        let queue = EventQueue::new(4);
        queue.push(attached(1));
        queue.push(sample(1, 0, 1));
        queue.push(sample(1, 0, 2));
        queue.push(sample(1, 0, 3));
        queue.push(detached(1));

        let events = queue.drain_all();
        assert_eq!(events, vec![attached(1), sample(1, 0, 3), detached(1)]);
    }

    #[test]
    fn test_compression_separates_devices() {
        let queue = EventQueue::new(4);
        queue.push(sample(1, 0, 1));
        queue.push(sample(2, 0, 2));
        queue.push(sample(1, 0, 3));
        queue.push(sample(2, 0, 4));
        queue.push(sample(1, 0, 5));

        // Same element id on different devices coalesces independently.
        let events = queue.drain_all();
        assert_eq!(events, vec![sample(2, 0, 4), sample(1, 0, 5)]);
    }

    #[test]
    fn test_below_threshold_never_compresses() {
        let queue = EventQueue::new(16);
        for i in 0..16 {
            queue.push(sample(1, 0, i));
        }
        assert_eq!(queue.len(), 16);
    }

    // ==================== Threading Tests ====================

    #[test]
    fn test_concurrent_producers() {
        let queue = EventQueue::new(100_000);
        let mut handles = Vec::new();

        for t in 0..4 {
            let producer = queue.clone();
            handles.push(std::thread::spawn(move || {
                for i in 0..1000 {
                    producer.push(sample(t, i % 8, i as i32));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(queue.drain_all().len(), 4000);
    }

    #[test]
    fn test_producer_consumer_interleaving() {
        // Threshold high enough that every event survives to be counted.
        let queue = EventQueue::new(100_000);
        let producer = queue.clone();

        let worker = std::thread::spawn(move || {
            for i in 0..2000 {
                producer.push(sample(1, 0, i));
            }
        });

        let mut total = 0;
        while total < 2000 {
            let batch = queue.drain_all();
            // Values within one batch must be monotonically increasing.
            for window in batch.windows(2) {
                if let (
                    RawEvent::Sample { value: a, .. },
                    RawEvent::Sample { value: b, .. },
                ) = (&window[0], &window[1])
                {
                    assert!(a < b);
                }
            }
            total += batch.len();
        }
        worker.join().unwrap();
    }
}

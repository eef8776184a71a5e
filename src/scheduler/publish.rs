//! Snapshot publication.
//!
//! The worker stores each finished snapshot with a single atomic swap;
//! readers load whatever is current without locking. Hosts that need to
//! see a particular cycle block on a condition variable instead of polling,
//! or subscribe to receive every snapshot as it is published.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use parking_lot::{Condvar, Mutex};

use crate::ide::{Analysis, Snapshot};

pub struct Publisher {
    current: ArcSwap<Snapshot>,
    /// Generation of `current`, guarded for waiters.
    generation: Mutex<u64>,
    published: Condvar,
    subscribers: Mutex<Vec<Sender<Analysis>>>,
}

impl Default for Publisher {
    fn default() -> Self {
        Self::new()
    }
}

impl Publisher {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(Snapshot::empty()),
            generation: Mutex::new(0),
            published: Condvar::new(),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Make `snapshot` current, wake every waiter and notify subscribers.
    pub fn publish(&self, snapshot: Snapshot) {
        let generation = snapshot.generation;
        let snapshot = Arc::new(snapshot);
        self.current.store(snapshot.clone());
        *self.generation.lock() = generation;
        self.published.notify_all();

        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| tx.send(Analysis::new(snapshot.clone())).is_ok());
        tracing::trace!(
            "[PUBLISH] generation {generation}, {} subscribers",
            subscribers.len()
        );
    }

    /// Receive every snapshot published from now on. Dropping the receiver
    /// unsubscribes.
    pub fn subscribe(&self) -> Receiver<Analysis> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.lock().push(tx);
        rx
    }

    pub fn load(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    pub fn generation(&self) -> u64 {
        *self.generation.lock()
    }

    /// Block until a snapshot of at least `generation` is current.
    ///
    /// Returns `false` if `timeout` elapsed first.
    pub fn wait_for_generation(&self, generation: u64, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut current = self.generation.lock();
        while *current < generation {
            if self.published.wait_until(&mut current, deadline).timed_out() {
                return *current >= generation;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn snapshot(generation: u64) -> Snapshot {
        Snapshot {
            generation,
            ..Snapshot::empty()
        }
    }

    #[test]
    fn test_publish_replaces_current() {
        let publisher = Publisher::new();
        let before = publisher.load();
        publisher.publish(snapshot(1));
        assert_eq!(before.generation, 0);
        assert_eq!(publisher.load().generation, 1);
        assert_eq!(publisher.generation(), 1);
    }

    #[test]
    fn test_waiter_wakes_on_publish() {
        let publisher = Arc::new(Publisher::new());
        let waiter = {
            let publisher = publisher.clone();
            thread::spawn(move || publisher.wait_for_generation(2, Duration::from_secs(5)))
        };
        publisher.publish(snapshot(1));
        publisher.publish(snapshot(2));
        assert!(waiter.join().unwrap());
    }

    #[test]
    fn test_subscribers_see_every_publish() {
        let publisher = Publisher::new();
        let events = publisher.subscribe();
        let dropped = publisher.subscribe();
        drop(dropped);

        publisher.publish(snapshot(1));
        publisher.publish(snapshot(2));
        let seen: Vec<u64> = events.try_iter().map(|a| a.generation()).collect();
        assert_eq!(seen, vec![1, 2]);
        assert_eq!(publisher.subscribers.lock().len(), 1);
    }

    #[test]
    fn test_wait_times_out() {
        let publisher = Publisher::new();
        assert!(!publisher.wait_for_generation(1, Duration::from_millis(10)));
        assert!(publisher.wait_for_generation(0, Duration::ZERO));
    }
}

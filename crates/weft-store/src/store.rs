//! Snapshot store
//!
//! Producers publish whole snapshots; observers read the latest one or
//! subscribe to be told about new ones. Reading never re-runs the producer.

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type Listener<S> = Arc<dyn Fn(&Arc<S>) + Send + Sync>;

/// Handle returned by [`Store::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct Store<S> {
    /// Latest published snapshot
    snapshot: Arc<RwLock<Arc<S>>>,
    /// Registered listeners, in subscription order
    listeners: Arc<Mutex<Vec<(SubscriptionId, Listener<S>)>>>,
    next_id: Arc<AtomicU64>,
}

impl<S: PartialEq> Store<S> {
    pub fn new(initial: S) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Arc::new(initial))),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Get the latest snapshot
    pub fn snapshot(&self) -> Arc<S> {
        Arc::clone(&self.snapshot.read())
    }

    /// Register a listener called with every newly published snapshot
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Arc<S>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(listener)));
        tracing::trace!(subscription = id.0, "Store subscriber added");
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Replace the snapshot and notify listeners.
    ///
    /// A snapshot equal to the current one is dropped so the current `Arc`
    /// keeps its identity. Returns true if listeners were notified.
    pub fn publish(&self, next: S) -> bool {
        let published = {
            let mut current = self.snapshot.write();
            if **current == next {
                return false;
            }
            *current = Arc::new(next);
            Arc::clone(&current)
        };

        // Listeners run outside both locks so they may read or unsubscribe.
        let listeners: Vec<Listener<S>> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(&published);
        }

        true
    }
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            snapshot: Arc::clone(&self.snapshot),
            listeners: Arc::clone(&self.listeners),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

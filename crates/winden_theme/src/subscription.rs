//! Theme-change subscriptions
//!
//! Listeners are stored in an id-keyed registry shared between the context
//! and the handles it gives out. Notification snapshots the registry first,
//! so a listener can subscribe or unsubscribe reentrantly without deadlock.

use rustc_hash::FxHashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, Weak};
use winden_core::ThemeMode;

/// Callback invoked with the new mode on every theme change.
pub type ThemeListener = Arc<dyn Fn(ThemeMode) + Send + Sync>;

/// Id-keyed listener registry.
pub(crate) struct ListenerRegistry {
    entries: FxHashMap<u64, ThemeListener>,
    next_id: u64,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
            next_id: 1,
        }
    }

    pub(crate) fn insert(&mut self, listener: ThemeListener) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(id, listener);
        id
    }

    pub(crate) fn remove(&mut self, id: u64) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Snapshot of the current listeners, in unspecified order.
    pub(crate) fn snapshot(&self) -> Vec<ThemeListener> {
        self.entries.values().map(Arc::clone).collect()
    }
}

/// Deliver `mode` to every listener in `registry`.
///
/// Each invocation is isolated: a panicking listener is reported and delivery
/// continues with the remaining listeners.
pub(crate) fn notify_all(registry: &Mutex<ListenerRegistry>, mode: ThemeMode) {
    let listeners = registry.lock().unwrap().snapshot();
    for listener in listeners {
        if catch_unwind(AssertUnwindSafe(|| listener(mode))).is_err() {
            tracing::error!(theme = %mode, "theme listener panicked; continuing delivery");
        }
    }
}

/// Handle returned by [`ThemeContext::subscribe`](crate::ThemeContext::subscribe).
///
/// The listener stays registered until `unsubscribe` is called; dropping the
/// handle without calling it leaves the listener active for the context's
/// lifetime.
pub struct ThemeSubscription {
    registry: Weak<Mutex<ListenerRegistry>>,
    id: u64,
}

impl ThemeSubscription {
    pub(crate) fn new(registry: Weak<Mutex<ListenerRegistry>>, id: u64) -> Self {
        Self { registry, id }
    }

    /// Remove the listener. Safe to call after the context is gone.
    pub fn unsubscribe(self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().unwrap().remove(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_insert_and_remove() {
        let mut registry = ListenerRegistry::new();
        let id = registry.insert(Arc::new(|_| {}));
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_panicking_listener_does_not_starve_others() {
        let registry = Mutex::new(ListenerRegistry::new());
        let delivered = Arc::new(AtomicUsize::new(0));

        registry
            .lock()
            .unwrap()
            .insert(Arc::new(|_| panic!("listener defect")));
        let delivered_in_listener = Arc::clone(&delivered);
        registry.lock().unwrap().insert(Arc::new(move |_| {
            delivered_in_listener.fetch_add(1, Ordering::SeqCst);
        }));
        registry
            .lock()
            .unwrap()
            .insert(Arc::new(|_| panic!("another defect")));

        notify_all(&registry, ThemeMode::Dark);
        assert_eq!(delivered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_after_registry_drop_is_harmless() {
        let registry = Arc::new(Mutex::new(ListenerRegistry::new()));
        let id = registry.lock().unwrap().insert(Arc::new(|_| {}));
        let subscription = ThemeSubscription::new(Arc::downgrade(&registry), id);

        drop(registry);
        subscription.unsubscribe();
    }
}

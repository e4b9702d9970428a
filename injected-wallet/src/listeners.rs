//! Multi-subscriber listener registry keyed by event kind.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::events::{WalletEvent, WalletEventKind};

/// A shareable event listener.
///
/// Listeners are compared by identity: removing a listener removes every
/// registration of that same `Arc`.
pub type Listener = Arc<dyn Fn(&WalletEvent) + Send + Sync>;

/// Wrap a closure into a [`Listener`].
pub fn listener<F>(f: F) -> Listener
where
    F: Fn(&WalletEvent) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Listener registry.
#[derive(Default)]
pub struct ListenersMap {
    listeners: Mutex<BTreeMap<WalletEventKind, Vec<Listener>>>,
}

impl std::fmt::Debug for ListenersMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: BTreeMap<_, _> = self
            .listeners
            .lock()
            .iter()
            .map(|(kind, list)| (*kind, list.len()))
            .collect();
        f.debug_struct("ListenersMap")
            .field("listeners", &counts)
            .finish()
    }
}

impl ListenersMap {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one event kind.
    pub fn add_listener(&self, kind: WalletEventKind, listener: Listener) {
        self.listeners.lock().entry(kind).or_default().push(listener);
    }

    /// Remove all registrations of `listener`, across every kind.
    ///
    /// Returns `true` if anything was removed.
    pub fn remove_listener(&self, listener: &Listener) -> bool {
        let mut listeners = self.listeners.lock();
        let mut removed = false;
        for list in listeners.values_mut() {
            let before = list.len();
            list.retain(|l| !Arc::ptr_eq(l, listener));
            removed |= list.len() != before;
        }
        listeners.retain(|_, list| !list.is_empty());
        removed
    }

    /// Number of listeners registered for a kind.
    #[must_use]
    pub fn count(&self, kind: WalletEventKind) -> usize {
        self.listeners.lock().get(&kind).map_or(0, Vec::len)
    }

    /// Deliver an event to every listener of its kind, in registration order.
    ///
    /// The registry lock is released before listeners run, so a listener may
    /// add or remove listeners.
    pub fn fire_event(&self, event: &WalletEvent) {
        let targets = self
            .listeners
            .lock()
            .get(&event.kind())
            .cloned()
            .unwrap_or_default();

        trace!(event = %event.kind(), listeners = targets.len(), "firing wallet event");
        for listener in targets {
            listener(event);
        }
    }
}

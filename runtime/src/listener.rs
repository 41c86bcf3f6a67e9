//! Synchronous state listeners.
//!
//! A listener is called with every state the store publishes, in
//! registration order, on the thread that dispatched the action. Listeners
//! run outside the registry lock, so they may register further listeners,
//! drop subscriptions or dispatch new actions.

use crate::StoreError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// Callback invoked with each published state
pub type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// Something a [`Subscription`] can detach itself from
trait Detach: Send + Sync {
    fn detach(&self, id: u64);
}

/// Ordered set of registered listeners
pub(crate) struct Listeners<S> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Listener<S>)>>,
}

impl<S> Listeners<S> {
    pub(crate) const fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Registers a listener, returning its id
    pub(crate) fn insert(&self, listener: Listener<S>) -> Result<u64, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries
            .lock()
            .map_err(|_| StoreError::Poisoned("listeners"))?
            .push((id, listener));
        Ok(id)
    }

    /// Number of registered listeners
    pub(crate) fn len(&self) -> Result<usize, StoreError> {
        Ok(self
            .entries
            .lock()
            .map_err(|_| StoreError::Poisoned("listeners"))?
            .len())
    }

    /// Calls every listener registered at the time of the call
    ///
    /// Returns how many listeners were called.
    pub(crate) fn notify(&self, state: &S) -> Result<usize, StoreError> {
        let snapshot: Vec<Listener<S>> = self
            .entries
            .lock()
            .map_err(|_| StoreError::Poisoned("listeners"))?
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in &snapshot {
            listener(state);
        }

        Ok(snapshot.len())
    }
}

impl<S: 'static> Detach for Listeners<S> {
    fn detach(&self, id: u64) {
        // A poisoned registry is already unusable; nothing left to detach from
        if let Ok(mut entries) = self.entries.lock() {
            entries.retain(|(entry_id, _)| *entry_id != id);
        }
    }
}

/// Handle to a registered listener
///
/// The listener stays registered for as long as the handle lives. Dropping
/// the handle (or calling [`Subscription::unsubscribe`]) removes it. Use
/// [`Subscription::detach_forever`] to keep it for the life of the store.
#[must_use = "dropping a Subscription immediately removes its listener"]
pub struct Subscription {
    id: u64,
    registry: Option<Weak<dyn Detach>>,
}

impl Subscription {
    pub(crate) fn new<S: 'static>(id: u64, registry: &Arc<Listeners<S>>) -> Self {
        let registry: Arc<dyn Detach> = Arc::clone(registry) as Arc<dyn Detach>;
        Self {
            id,
            registry: Some(Arc::downgrade(&registry)),
        }
    }

    /// Remove the listener now
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Keep the listener registered until the store itself is dropped
    pub fn detach_forever(mut self) {
        self.registry = None;
    }

    fn release(&mut self) {
        if let Some(registry) = self.registry.take().and_then(|weak| weak.upgrade()) {
            registry.detach(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &self.registry.is_some())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

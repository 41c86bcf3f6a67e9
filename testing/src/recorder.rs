//! Store state recording
//!
//! [`StateRecorder`] registers a listener on a store and keeps every state
//! it is handed: the replayed current state first, then one per reduced
//! action.

use rxtodo_core::{action::Action, reducer::Reducer};
use rxtodo_runtime::{Store, StoreError, Subscription};
use std::sync::{Arc, Mutex, PoisonError};

/// Records every state published by a store
///
/// # Example
///
/// ```ignore
/// let recorder = StateRecorder::attach(&store)?;
/// store.dispatch(CounterAction::Increment)?;
///
/// let counts: Vec<_> = recorder.states().iter().map(|s| s.count).collect();
/// assert_eq!(counts, vec![0, 1]);
/// ```
pub struct StateRecorder<S> {
    states: Arc<Mutex<Vec<Arc<S>>>>,
    subscription: Option<Subscription>,
}

impl<S> StateRecorder<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Start recording `store`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if the store's listener registry is
    /// poisoned.
    pub fn attach<A, E, R>(store: &Store<S, A, E, R>) -> Result<Self, StoreError>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Action,
        E: Send + Sync + 'static,
    {
        let states = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&states);

        let subscription = store.observe(move |state: &S| {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(Arc::new(state.clone()));
        })?;

        Ok(Self {
            states,
            subscription: Some(subscription),
        })
    }

    /// All states recorded so far, oldest first
    #[must_use]
    pub fn states(&self) -> Vec<Arc<S>> {
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most recently recorded state
    #[must_use]
    pub fn last(&self) -> Option<Arc<S>> {
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Number of states recorded so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Project every recorded state through `f`
    pub fn map<T, F>(&self, f: F) -> Vec<T>
    where
        F: FnMut(&Arc<S>) -> T,
    {
        self.states().iter().map(f).collect()
    }

    /// Stop recording; states already captured are kept
    pub fn stop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    /// Whether the recorder is still attached
    #[must_use]
    pub const fn is_recording(&self) -> bool {
        self.subscription.is_some()
    }
}

impl<S> std::fmt::Debug for StateRecorder<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateRecorder")
            .field("recording", &self.subscription.is_some())
            .finish_non_exhaustive()
    }
}

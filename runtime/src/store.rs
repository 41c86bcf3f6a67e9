//! The Store - runtime coordinator for a reducer.
//!
//! ```text
//!            dispatch(action)
//!                  │
//!                  ▼
//!          ┌──────────────┐   reduce(working copy)   ┌─────────────┐
//!          │ action queue │ ───────────────────────▶ │  reducer    │
//!          └──────────────┘                          └──────┬──────┘
//!                                                           │ Arc<S>
//!                  ┌────────────────────┬───────────────────┼──────────────┐
//!                  ▼                    ▼                   ▼              ▼
//!          latest-state cell    action broadcast       listeners     state streams
//! ```
//!
//! Dispatch is synchronous. When [`Store::dispatch`] returns, the action has
//! been reduced, the new state is in the latest-state cell and every
//! listener has seen it. Dispatches from different threads take turns; a
//! dispatch from inside a listener is queued on the thread already draining.

use crate::listener::{Listener, Listeners, Subscription};
use crate::metrics::StoreMetrics;
use crate::StoreError;
use futures::stream::{self, BoxStream, StreamExt};
use rxtodo_core::{action::Action, reducer::Reducer};
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, watch};

/// Default capacity of the action broadcast channel
const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// The Store - owns the reducer, the latest state and the dispatch queue
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
///
/// Cloning a store is cheap; every clone shares the same state, queue and
/// listeners.
///
/// # Example
///
/// ```ignore
/// let store = Store::new(TodoState::default(), TodoReducer, ());
///
/// store.dispatch(TodoAction::AddTodo { id: TodoId::new(0), text: "a".into() })?;
/// assert_eq!(store.state().todos.len(), 1);
/// ```
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    inner: Arc<Inner<S, A, E, R>>,
}

struct Inner<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: E,
    /// Held for a whole dispatch; re-entrant so listeners can dispatch
    dispatch: ReentrantMutex<RefCell<DispatchQueue<A>>>,
    /// Latest-state cell; replays the current value to every new receiver
    state: watch::Sender<Arc<S>>,
    /// Every reduced action, for observers
    actions: broadcast::Sender<A>,
    listeners: Arc<Listeners<S>>,
}

/// Only touched by the thread holding the dispatch lock
struct DispatchQueue<A> {
    /// Actions waiting to be reduced, in dispatch order
    pending: VecDeque<A>,
    /// Set while the lock holder is draining `pending`
    draining: bool,
}

/// Clears the draining flag even if a reducer or listener unwinds
struct DrainGuard<'a, A>(&'a RefCell<DispatchQueue<A>>);

impl<A> Drop for DrainGuard<'_, A> {
    fn drop(&mut self) {
        self.0.borrow_mut().draining = false;
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    S: Clone + Send + Sync + 'static,
    A: Action,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    ///
    /// The initial state is published immediately, so the first read (or
    /// subscriber) sees it before any action is dispatched.
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_broadcast_capacity(initial_state, reducer, environment, DEFAULT_BROADCAST_CAPACITY)
    }

    /// Create a new store with a custom action broadcast capacity
    ///
    /// Observers from [`Store::subscribe_actions`] that fall more than
    /// `capacity` actions behind skip the oldest ones.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_broadcast_capacity(
        initial_state: S,
        reducer: R,
        environment: E,
        capacity: usize,
    ) -> Self {
        let (state, _) = watch::channel(Arc::new(initial_state));
        let (actions, _) = broadcast::channel(capacity);

        Self {
            inner: Arc::new(Inner {
                reducer,
                environment,
                dispatch: ReentrantMutex::new(RefCell::new(DispatchQueue {
                    pending: VecDeque::new(),
                    draining: false,
                })),
                state,
                actions,
                listeners: Arc::new(Listeners::new()),
            }),
        }
    }

    /// Dispatch an action
    ///
    /// Each action is reduced against a private copy of the latest state,
    /// the result is published, the action is broadcast and the listeners are
    /// notified, all before this call returns. A dispatch from another thread
    /// blocks until the one in progress has finished.
    ///
    /// A listener that dispatches during notification does not recurse: its
    /// action is queued and reduced once the current notification finishes,
    /// still before the outermost `dispatch` returns.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if an earlier panic in a listener
    /// left the listener registry poisoned.
    pub fn dispatch(&self, action: A) -> Result<(), StoreError> {
        self.dispatch_with(move || ((), action))
    }

    /// Build an action and dispatch it without letting another thread in
    ///
    /// `build` runs while this thread holds the store, so anything it takes
    /// from shared state (such as the next id from an
    /// [`IdGenerator`](rxtodo_core::environment::IdGenerator)) is reduced in
    /// the same order it was taken. Returns the first half of the pair.
    ///
    /// ```ignore
    /// let id = store.dispatch_with(|| {
    ///     let id = ids.next_id();
    ///     (id, TodoAction::AddTodo { id, text })
    /// })?;
    /// ```
    ///
    /// # Errors
    ///
    /// Same as [`Store::dispatch`].
    #[tracing::instrument(skip_all, name = "store_dispatch", fields(action = tracing::field::Empty))]
    pub fn dispatch_with<F, T>(&self, build: F) -> Result<T, StoreError>
    where
        F: FnOnce() -> (T, A),
    {
        let lock = self.inner.dispatch.lock();
        let (output, action) = build();
        tracing::Span::current().record("action", action.name());

        {
            let mut queue = lock.borrow_mut();
            queue.pending.push_back(action);
            if queue.draining {
                StoreMetrics::record_queue_depth(queue.pending.len());
                tracing::trace!("Dispatch already in progress on this thread, action queued");
                return Ok(output);
            }
            queue.draining = true;
        }

        let _guard = DrainGuard(&*lock);
        self.drain(&lock)?;
        Ok(output)
    }

    /// Dispatch several actions in order
    ///
    /// # Errors
    ///
    /// Stops at and returns the first [`StoreError`].
    pub fn dispatch_all<I>(&self, actions: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = A>,
    {
        actions.into_iter().try_for_each(|action| self.dispatch(action))
    }

    /// Latest published state
    #[must_use]
    pub fn state(&self) -> Arc<S> {
        Arc::clone(&*self.inner.state.borrow())
    }

    /// Read the latest state via a closure
    ///
    /// ```ignore
    /// let count = store.state_with(|s| s.todos.len());
    /// ```
    pub fn state_with<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state();
        f(&state)
    }

    /// Receiver on the latest-state cell
    ///
    /// The receiver's current value is the latest state, so a new subscriber
    /// sees it right away; `changed().await` resolves on the next dispatch.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Arc<S>> {
        self.inner.state.subscribe()
    }

    /// Stream of states: the current one first, then one per change
    ///
    /// The cell keeps only the latest value, so a slow consumer observes the
    /// newest state and skips intermediate ones. The stream ends when every
    /// clone of the store has been dropped.
    #[must_use]
    pub fn state_stream(&self) -> BoxStream<'static, Arc<S>> {
        let receiver = self.watch();
        stream::unfold((receiver, true), |(mut receiver, first)| async move {
            if !first {
                receiver.changed().await.ok()?;
            }
            let state = Arc::clone(&*receiver.borrow_and_update());
            Some((state, (receiver, false)))
        })
        .boxed()
    }

    /// Register a synchronous listener
    ///
    /// The listener is called once right away with the current state, then
    /// with every new state, on the dispatching thread and in registration
    /// order. It stays registered while the returned [`Subscription`] lives.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if the listener registry is poisoned.
    pub fn observe<F>(&self, listener: F) -> Result<Subscription, StoreError>
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        let listener: Listener<S> = Arc::new(listener);
        let id = self.inner.listeners.insert(Arc::clone(&listener))?;
        let subscription = Subscription::new(id, &self.inner.listeners);

        listener(&self.state());
        Ok(subscription)
    }

    /// Number of registered listeners
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if the listener registry is poisoned.
    pub fn listener_count(&self) -> Result<usize, StoreError> {
        self.inner.listeners.len()
    }

    /// Subscribe to every action this store reduces
    ///
    /// Actions are sent after they have been reduced, so the state read by
    /// an observer already reflects them.
    ///
    /// # Notes
    ///
    /// - Only actions reduced after subscribing are received
    /// - If the receiver lags, it skips old actions and receives
    ///   [`broadcast::error::RecvError::Lagged`]
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.inner.actions.subscribe()
    }

    /// Reduce queued actions until the queue is empty
    fn drain(&self, queue: &RefCell<DispatchQueue<A>>) -> Result<(), StoreError> {
        loop {
            // The borrow must end before reducing so listeners can enqueue
            let next = {
                let mut queue = queue.borrow_mut();
                let next = queue.pending.pop_front();
                StoreMetrics::record_queue_depth(queue.pending.len());
                next
            };
            let Some(action) = next else {
                return Ok(());
            };
            self.process(action)?;
        }
    }

    fn process(&self, action: A) -> Result<(), StoreError> {
        let name = action.name();
        tracing::debug!(action = name, "Processing action");

        let next = {
            let span = tracing::debug_span!("reducer_execution", action = name);
            let _enter = span.enter();

            let start = Instant::now();
            let current = self.state();
            let mut working = S::clone(&current);
            self.inner
                .reducer
                .reduce(&mut working, &action, &self.inner.environment);
            StoreMetrics::record_action(name, start.elapsed());

            Arc::new(working)
        };

        self.inner.state.send_replace(Arc::clone(&next));

        // No observers is not an error
        let _ = self.inner.actions.send(action);

        let notified = self.inner.listeners.notify(&next)?;
        StoreMetrics::record_notified(notified);
        tracing::trace!(listeners = notified, "Listeners notified");

        Ok(())
    }
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, A, E, R> std::fmt::Debug for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &**self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

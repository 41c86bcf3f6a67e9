//! # rxtodo Runtime
//!
//! Runtime implementation for the rxtodo unidirectional data flow.
//!
//! ## Core Components
//!
//! - **Store**: Owns the reducer and the latest state, accepts dispatched actions
//! - **Dispatch queue**: Serializes actions, including ones dispatched from listeners
//! - **Latest-state cell**: Holds the newest state and replays it to new subscribers
//! - **Listeners**: Synchronous callbacks run after every state change
//!
//! ## Example
//!
//! ```ignore
//! use rxtodo_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Re-render on every change (called once right away with the current state)
//! let _subscription = store.observe(|state| render(state))?;
//!
//! // Dispatch an action; reducers and listeners have run when this returns
//! store.dispatch(Action::DoSomething)?;
//!
//! // Read state
//! let value = store.state_with(|s| s.some_field);
//! ```

/// Listener registry and subscription handles
pub mod listener;

/// Prometheus metrics for observability
pub mod metrics;

/// The Store
pub mod store;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    ///
    /// Reducers are total, so the only failures left are broken internals.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// A lock inside the store was poisoned
        ///
        /// Some thread panicked while holding the named lock. The store
        /// cannot make progress afterwards.
        #[error("Store {0} lock poisoned by an earlier panic")]
        Poisoned(&'static str),
    }
}

pub use error::StoreError;
pub use listener::Subscription;
pub use store::Store;

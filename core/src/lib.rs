//! # rxtodo Core
//!
//! Core traits and types for the rxtodo unidirectional data flow.
//!
//! ## Core Concepts
//!
//! - **State**: Owned, cloneable domain state
//! - **Action**: Immutable description of an intended state transition
//! - **Reducer**: Total function `(State, Action, Environment) → State`
//! - **Environment**: Injected dependencies (id generation)
//!
//! Actions flow in one direction only:
//!
//! ```text
//! view ──dispatch──▶ store ──reduce──▶ state ──notify──▶ view
//! ```
//!
//! ## Example
//!
//! ```
//! use rxtodo_core::reducer::Reducer;
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! enum CounterAction {
//!     Increment,
//!     Reset,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut CounterState, action: &CounterAction, _env: &()) {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!             CounterAction::Reset => state.count = 0,
//!         }
//!     }
//! }
//!
//! let mut state = CounterState::default();
//! CounterReducer.reduce(&mut state, &CounterAction::Increment, &());
//! assert_eq!(state.count, 1);
//! ```

/// Reducer composition (combine, scope)
pub mod composition;

/// Action module - the closed set of inputs a reducer accepts
///
/// Actions are plain values. They carry data, never behavior, so the store
/// can log, broadcast and replay them freely.
pub mod action {
    /// Common behavior shared by every action type
    ///
    /// Usually derived with `#[derive(Action)]` from `rxtodo-macros`, which
    /// returns the variant name.
    ///
    /// # Example
    ///
    /// ```
    /// use rxtodo_core::action::Action;
    ///
    /// #[derive(Clone, Debug)]
    /// enum Ping {
    ///     Ping,
    /// }
    ///
    /// impl Action for Ping {
    ///     fn name(&self) -> &'static str {
    ///         "Ping"
    ///     }
    /// }
    ///
    /// assert_eq!(Ping::Ping.name(), "Ping");
    /// ```
    pub trait Action: Clone + std::fmt::Debug + Send + 'static {
        /// Stable name of this action's variant, used in logs and metric labels
        fn name(&self) -> &'static str;
    }
}

/// Reducer module - the core trait for state transitions
///
/// Reducers hold all of the state logic. They are deterministic and total:
/// every action is handled, even if only by leaving the state alone.
pub mod reducer {
    /// The Reducer trait - folds one action into the current state
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer owns
    /// - `Action`: The action type it processes
    /// - `Environment`: The injected dependencies it needs
    ///
    /// The runtime always hands the reducer a private working copy of the
    /// state, so published snapshots are never modified.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Fold `action` into `state`
        ///
        /// # Arguments
        ///
        /// - `state`: Working copy of the current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        fn reduce(
            &self,
            state: &mut Self::State,
            action: &Self::Action,
            env: &Self::Environment,
        );
    }
}

/// Environment module - dependency injection traits
///
/// External dependencies are abstracted behind traits and handed to the
/// pieces that need them, which keeps reducers and views testable.
pub mod environment {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    /// Source of fresh, strictly increasing identifiers
    ///
    /// # Examples
    ///
    /// ```
    /// use rxtodo_core::environment::{IdGenerator, SequentialIds};
    ///
    /// let ids = SequentialIds::starting_at(10);
    /// assert_eq!(ids.next_id(), 10);
    /// assert_eq!(ids.next_id(), 11);
    /// ```
    pub trait IdGenerator: Send + Sync {
        /// Hand out the next identifier
        fn next_id(&self) -> u64;
    }

    impl<T: IdGenerator + ?Sized> IdGenerator for Arc<T> {
        fn next_id(&self) -> u64 {
            (**self).next_id()
        }
    }

    /// Monotonic counter shared by every producer of new ids
    #[derive(Debug, Default)]
    pub struct SequentialIds {
        next: AtomicU64,
    }

    impl SequentialIds {
        /// Create a generator whose first id is `first`
        #[must_use]
        pub const fn starting_at(first: u64) -> Self {
            Self {
                next: AtomicU64::new(first),
            }
        }

        /// The id the next call to [`IdGenerator::next_id`] will return
        #[must_use]
        pub fn peek(&self) -> u64 {
            self.next.load(Ordering::Acquire)
        }
    }

    impl IdGenerator for SequentialIds {
        fn next_id(&self) -> u64 {
            self.next.fetch_add(1, Ordering::AcqRel)
        }
    }
}

// Re-export commonly used items
pub use action::Action;
pub use reducer::Reducer;

#[cfg(test)]
mod tests {
    use super::environment::{IdGenerator, SequentialIds};
    use proptest::prelude::*;
    use std::sync::Arc;

    #[test]
    fn sequential_ids_start_at_zero_by_default() {
        let ids = SequentialIds::default();
        assert_eq!(ids.next_id(), 0);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.peek(), 2);
    }

    #[test]
    fn sequential_ids_are_unique_across_threads() {
        let ids = Arc::new(SequentialIds::starting_at(0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || (0..100).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap_or_default())
            .collect();
        all.sort_unstable();
        all.dedup();

        assert_eq!(all.len(), 400);
        assert_eq!(ids.peek(), 400);
    }

    proptest! {
        #[test]
        fn sequential_ids_strictly_increase(first in 0u64..1_000_000, n in 1usize..50) {
            let ids = SequentialIds::starting_at(first);
            let taken: Vec<u64> = (0..n).map(|_| ids.next_id()).collect();
            prop_assert_eq!(taken[0], first);
            prop_assert!(taken.windows(2).all(|w| w[0] < w[1]));
        }
    }
}

//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Focus a reducer on one field of a larger state
//!
//! Scoping each slice reducer onto its field and combining the results is
//! how independent slices of state (a list, a filter) are folded from a
//! single action stream into one state value per action.
//!
//! # Examples
//!
//! ```
//! use rxtodo_core::Reducer;
//! use rxtodo_core::composition::{combine_reducers, scope_reducer, BoxedReducer};
//!
//! #[derive(Clone, Debug, Default)]
//! struct AppState {
//!     count: i32,
//!     name: String,
//! }
//!
//! #[derive(Clone)]
//! enum AppAction {
//!     Increment,
//!     SetName(String),
//! }
//!
//! struct CountReducer;
//! struct NameReducer;
//!
//! impl Reducer for CountReducer {
//!     type State = i32;
//!     type Action = AppAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut i32, action: &AppAction, _env: &()) {
//!         if matches!(action, AppAction::Increment) {
//!             *state += 1;
//!         }
//!     }
//! }
//!
//! impl Reducer for NameReducer {
//!     type State = String;
//!     type Action = AppAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut String, action: &AppAction, _env: &()) {
//!         if let AppAction::SetName(name) = action {
//!             state.clone_from(name);
//!         }
//!     }
//! }
//!
//! let count: BoxedReducer<AppState, AppAction, ()> =
//!     Box::new(scope_reducer(CountReducer, |s: &AppState| &s.count, |s, c| s.count = c));
//! let name: BoxedReducer<AppState, AppAction, ()> =
//!     Box::new(scope_reducer(NameReducer, |s: &AppState| &s.name, |s, n| s.name = n));
//! let combined = combine_reducers(vec![count, name]);
//!
//! let mut state = AppState::default();
//! combined.reduce(&mut state, &AppAction::Increment, &());
//! combined.reduce(&mut state, &AppAction::SetName("todo".into()), &());
//! assert_eq!(state.count, 1);
//! assert_eq!(state.name, "todo");
//! ```

use crate::reducer::Reducer;

/// Boxed reducer that can live inside a shared store
pub type BoxedReducer<S, A, E> =
    Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence, in the order given, against the same
/// action.
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<BoxedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    S: 'static,
    A: 'static,
    E: 'static,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E>
where
    S: 'static,
    A: 'static,
    E: 'static,
{
    reducers: Vec<BoxedReducer<S, A, E>>,
}

impl<S, A, E> CombinedReducer<S, A, E>
where
    S: 'static,
    A: 'static,
    E: 'static,
{
    /// Number of reducers in this combination
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Whether the combination is empty (and therefore a no-op)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> std::fmt::Debug for CombinedReducer<S, A, E>
where
    S: 'static,
    A: 'static,
    E: 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedReducer")
            .field("reducers", &self.reducers.len())
            .finish()
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: 'static,
    A: 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(&self, state: &mut Self::State, action: &Self::Action, env: &Self::Environment) {
        for reducer in &self.reducers {
            reducer.reduce(state, action, env);
        }
    }
}

/// Scopes a reducer to operate on a subset of a larger state.
///
/// The child reducer works on a clone of the selected field; the result is
/// written back through `set_state`.
pub fn scope_reducer<S, SubS, A, E, R>(
    reducer: R,
    get_state: fn(&S) -> &SubS,
    set_state: fn(&mut S, SubS),
) -> ScopedReducer<S, SubS, A, E, R>
where
    SubS: Clone,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    ScopedReducer {
        reducer,
        get_state,
        set_state,
        _phantom: std::marker::PhantomData,
    }
}

/// A scoped reducer that operates on a subset of state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, E, R>
where
    SubS: Clone,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    reducer: R,
    get_state: fn(&S) -> &SubS,
    set_state: fn(&mut S, SubS),
    _phantom: std::marker::PhantomData<fn() -> (A, E)>,
}

impl<S, SubS, A, E, R> Reducer for ScopedReducer<S, SubS, A, E, R>
where
    SubS: Clone,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(&self, state: &mut Self::State, action: &Self::Action, env: &Self::Environment) {
        let mut sub_state = (self.get_state)(state).clone();
        self.reducer.reduce(&mut sub_state, action, env);
        (self.set_state)(state, sub_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Pair {
        left: Vec<u32>,
        right: bool,
    }

    #[derive(Clone, Debug)]
    enum PairAction {
        Push(u32),
        Flip,
    }

    struct PushReducer;
    struct FlipReducer;

    impl Reducer for PushReducer {
        type State = Vec<u32>;
        type Action = PairAction;
        type Environment = ();

        fn reduce(&self, state: &mut Vec<u32>, action: &PairAction, _env: &()) {
            if let PairAction::Push(n) = action {
                state.push(*n);
            }
        }
    }

    impl Reducer for FlipReducer {
        type State = bool;
        type Action = PairAction;
        type Environment = ();

        fn reduce(&self, state: &mut bool, action: &PairAction, _env: &()) {
            if matches!(action, PairAction::Flip) {
                *state = !*state;
            }
        }
    }

    fn pair_reducer() -> CombinedReducer<Pair, PairAction, ()> {
        let push: BoxedReducer<Pair, PairAction, ()> = Box::new(scope_reducer(
            PushReducer,
            |s: &Pair| &s.left,
            |s, left| s.left = left,
        ));
        let flip: BoxedReducer<Pair, PairAction, ()> = Box::new(scope_reducer(
            FlipReducer,
            |s: &Pair| &s.right,
            |s, right| s.right = right,
        ));
        combine_reducers(vec![push, flip])
    }

    #[test]
    fn scoped_reducer_only_touches_its_field() {
        let scoped = scope_reducer(PushReducer, |s: &Pair| &s.left, |s, left| s.left = left);
        let mut state = Pair::default();

        scoped.reduce(&mut state, &PairAction::Push(7), &());
        scoped.reduce(&mut state, &PairAction::Flip, &());

        assert_eq!(state.left, vec![7]);
        assert!(!state.right);
    }

    #[test]
    fn combined_reducer_feeds_every_slice_the_same_action() {
        let reducer = pair_reducer();
        let mut state = Pair::default();

        reducer.reduce(&mut state, &PairAction::Push(1), &());
        reducer.reduce(&mut state, &PairAction::Flip, &());
        reducer.reduce(&mut state, &PairAction::Push(2), &());

        assert_eq!(
            state,
            Pair {
                left: vec![1, 2],
                right: true
            }
        );
        assert_eq!(reducer.len(), 2);
    }

    #[test]
    fn empty_combination_is_a_no_op() {
        let reducer: CombinedReducer<Pair, PairAction, ()> = combine_reducers(Vec::new());
        let mut state = Pair::default();

        reducer.reduce(&mut state, &PairAction::Push(1), &());

        assert!(reducer.is_empty());
        assert_eq!(state, Pair::default());
    }
}

//! # rxtodo Testing
//!
//! Testing utilities and helpers for rxtodo reducers and stores.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given/When/Then builder for reducers
//! - [`StateRecorder`]: Captures every state a store publishes
//! - [`properties`]: proptest strategies for action sequences
//! - [`init_test_tracing`]: Opt-in log output for tests
//!
//! ## Example
//!
//! ```ignore
//! use rxtodo_testing::StateRecorder;
//! use rxtodo_runtime::Store;
//!
//! #[test]
//! fn test_todo_flow() {
//!     let store = Store::new(AppState::default(), app_reducer(), ());
//!     let recorder = StateRecorder::attach(&store).unwrap();
//!
//!     store.dispatch(TodoAction::add(0, "a")).unwrap();
//!
//!     assert_eq!(recorder.len(), 2); // replayed initial state + one per action
//! }
//! ```


/// Store state recording
pub mod recorder;

/// Property-based testing utilities
///
/// Strategies shared by domain crates when building action sequences for
/// proptest.
pub mod properties {
    use proptest::collection::vec;
    use proptest::prelude::*;

    /// Short human-readable text, as typed into a todo input
    pub fn label() -> impl Strategy<Value = String> {
        "[a-z][a-z ]{0,11}".prop_map(|s| s.trim_end().to_string())
    }

    /// An id drawn from a small range, so generated sequences collide often
    pub fn small_id(max: u64) -> impl Strategy<Value = u64> {
        0..max.max(1)
    }

    /// Sequences of up to `max_len` elements drawn from `element`
    pub fn sequences<T, S>(element: S, max_len: usize) -> impl Strategy<Value = Vec<T>>
    where
        T: std::fmt::Debug,
        S: Strategy<Value = T>,
    {
        vec(element, 0..=max_len)
    }
}

/// Install a fmt subscriber driven by `RUST_LOG`, once per test binary
///
/// Output goes through the test writer, so it only shows for failing tests
/// or with `--nocapture`.
pub fn init_test_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use recorder::StateRecorder;
pub use reducer_test::ReducerTest;

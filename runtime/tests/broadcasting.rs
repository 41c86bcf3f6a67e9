//! Integration tests for Store action broadcasting
//!
//! Tests the observation features: the action broadcast channel, the
//! latest-state cell and the ordering between them and listeners.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use rxtodo_core::reducer::Reducer;
use rxtodo_macros::Action;
use rxtodo_runtime::Store;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast::error::TryRecvError;

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Action, Debug, Clone, PartialEq)]
enum TestAction {
    Increment,
    Record { label: &'static str },
}

#[derive(Debug, Clone, Default)]
struct TestState {
    counter: u32,
    labels: Vec<&'static str>,
}

struct TestReducer;

impl Reducer for TestReducer {
    type State = TestState;
    type Action = TestAction;
    type Environment = ();

    fn reduce(&self, state: &mut TestState, action: &TestAction, _env: &()) {
        match action {
            TestAction::Increment => state.counter += 1,
            TestAction::Record { label } => state.labels.push(label),
        }
    }
}

fn store() -> Store<TestState, TestAction, (), TestReducer> {
    Store::new(TestState::default(), TestReducer, ())
}

// ============================================================================
// Tests
// ============================================================================

/// Every observer receives its own copy of every action
#[test]
fn test_multiple_action_observers() {
    let store = store();
    let mut first = store.subscribe_actions();
    let mut second = store.subscribe_actions();

    store.dispatch(TestAction::Increment).unwrap();
    store.dispatch(TestAction::Record { label: "a" }).unwrap();

    for rx in [&mut first, &mut second] {
        assert_eq!(rx.try_recv().unwrap(), TestAction::Increment);
        assert_eq!(rx.try_recv().unwrap(), TestAction::Record { label: "a" });
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }
}

/// Observers subscribed late only see later actions
#[test]
fn test_late_observer_misses_earlier_actions() {
    let store = store();
    store.dispatch(TestAction::Increment).unwrap();

    let mut rx = store.subscribe_actions();
    store.dispatch(TestAction::Record { label: "late" }).unwrap();

    assert_eq!(rx.try_recv().unwrap(), TestAction::Record { label: "late" });
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

/// A slow observer skips the oldest actions instead of blocking dispatch
#[test]
fn test_lagging_observer_skips_oldest() {
    let store = Store::with_broadcast_capacity(TestState::default(), TestReducer, (), 2);
    let mut rx = store.subscribe_actions();

    for _ in 0..5 {
        store.dispatch(TestAction::Increment).unwrap();
    }

    assert!(matches!(rx.try_recv(), Err(TryRecvError::Lagged(3))));
    assert_eq!(rx.try_recv().unwrap(), TestAction::Increment);
    assert_eq!(rx.try_recv().unwrap(), TestAction::Increment);
    assert_eq!(store.state().counter, 5);
}

/// Dispatch never fails for lack of observers
#[test]
fn test_dispatch_without_observers() {
    let store = store();
    let rx = store.subscribe_actions();
    drop(rx);

    assert!(store.dispatch(TestAction::Increment).is_ok());
    assert_eq!(store.state().counter, 1);
}

/// When a listener runs, the latest-state cell already holds the new state
#[test]
fn test_listener_sees_published_state() {
    let store = store();
    let reader = store.clone();
    let observed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&observed);

    let _subscription = store
        .observe(move |state: &TestState| {
            let published = reader.state_with(|s| s.counter);
            sink.lock().unwrap().push((state.counter, published));
        })
        .unwrap();

    store.dispatch(TestAction::Increment).unwrap();
    store.dispatch(TestAction::Increment).unwrap();

    assert_eq!(*observed.lock().unwrap(), vec![(0, 0), (1, 1), (2, 2)]);
}

/// Actions dispatched by a listener are broadcast in reduction order
#[test]
fn test_reentrant_actions_are_broadcast_in_order() {
    let store = store();
    let mut rx = store.subscribe_actions();
    let inner = store.clone();

    let _subscription = store
        .observe(move |state: &TestState| {
            if state.counter == 1 && state.labels.is_empty() {
                inner.dispatch(TestAction::Record { label: "after-first" }).unwrap();
            }
        })
        .unwrap();

    store.dispatch(TestAction::Increment).unwrap();

    assert_eq!(rx.try_recv().unwrap(), TestAction::Increment);
    assert_eq!(
        rx.try_recv().unwrap(),
        TestAction::Record { label: "after-first" }
    );
    assert_eq!(store.state().labels, vec!["after-first"]);
}

/// Async observers can await actions from another task
#[tokio::test]
async fn test_async_observer_receives_actions() {
    let store = store();
    let mut rx = store.subscribe_actions();

    let producer = store.clone();
    let task = tokio::spawn(async move {
        producer.dispatch(TestAction::Record { label: "spawned" }).unwrap();
    });

    let action = rx.recv().await.unwrap();
    task.await.unwrap();

    assert_eq!(action, TestAction::Record { label: "spawned" });
    assert_eq!(store.state().labels, vec!["spawned"]);
}

//! Reducers for the todo list.
//!
//! Two independent reducers each own one slice of [`AppState`]: the todo
//! list and the visibility filter. [`app_reducer`] scopes them onto their
//! fields and runs both against every action, so each action yields exactly
//! one new `AppState`.

use crate::types::{AppState, Todo, TodoAction, VisibilityFilter};
use rxtodo_core::composition::{combine_reducers, scope_reducer, BoxedReducer, CombinedReducer};
use rxtodo_core::reducer::Reducer;
use rxtodo_runtime::Store;

/// Reducer for the todo list
#[derive(Clone, Copy, Debug, Default)]
pub struct TodosReducer;

impl Reducer for TodosReducer {
    type State = Vec<Todo>;
    type Action = TodoAction;
    type Environment = ();

    fn reduce(&self, state: &mut Self::State, action: &Self::Action, _env: &Self::Environment) {
        match action {
            TodoAction::AddTodo { id, text } => {
                state.push(Todo::new(*id, text.clone()));
            }
            other => {
                *state = state.iter().map(|todo| update_todo(todo, other)).collect();
            }
        }
    }
}

/// Applies `action` to a single todo
///
/// Only a `ToggleTodo` whose id matches has an effect; anything else returns
/// the todo unchanged.
#[must_use]
pub fn update_todo(todo: &Todo, action: &TodoAction) -> Todo {
    match action {
        TodoAction::ToggleTodo { id } if *id == todo.id => todo.toggled(),
        _ => todo.clone(),
    }
}

/// Reducer for the visibility filter
#[derive(Clone, Copy, Debug, Default)]
pub struct FilterReducer;

impl Reducer for FilterReducer {
    type State = VisibilityFilter;
    type Action = TodoAction;
    type Environment = ();

    fn reduce(&self, state: &mut Self::State, action: &Self::Action, _env: &Self::Environment) {
        if let TodoAction::SetVisibilityFilter { filter } = action {
            *state = *filter;
        }
    }
}

/// Reducer for the whole [`AppState`]
pub type AppReducer = CombinedReducer<AppState, TodoAction, ()>;

/// Store holding the application state
pub type TodoStore = Store<AppState, TodoAction, (), AppReducer>;

/// Builds the application reducer
///
/// Runs [`TodosReducer`] on `state.todos`, then [`FilterReducer`] on
/// `state.visibility_filter`.
#[must_use]
pub fn app_reducer() -> AppReducer {
    let todos: BoxedReducer<AppState, TodoAction, ()> = Box::new(scope_reducer(
        TodosReducer,
        |state: &AppState| &state.todos,
        |state: &mut AppState, todos| state.todos = todos,
    ));
    let filter: BoxedReducer<AppState, TodoAction, ()> = Box::new(scope_reducer(
        FilterReducer,
        |state: &AppState| &state.visibility_filter,
        |state: &mut AppState, filter| state.visibility_filter = filter,
    ));

    combine_reducers(vec![todos, filter])
}

/// Builds a store around [`app_reducer`] seeded with `initial`
#[must_use]
pub fn todo_store(initial: AppState) -> TodoStore {
    Store::new(initial, app_reducer(), ())
}

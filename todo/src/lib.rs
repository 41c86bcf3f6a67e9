//! Todo list built on a unidirectional data flow.
//!
//! Every change to the list goes through one path:
//!
//! ```text
//! view intent ──▶ TodoAction ──▶ Store::dispatch ──▶ app_reducer ──▶ new AppState ──▶ listeners
//! ```
//!
//! - [`types`]: `Todo`, `VisibilityFilter`, `AppState`, `TodoAction`
//! - [`reducer`]: one reducer per state slice, combined by [`app_reducer`]
//! - [`visibility`]: which todos the current filter shows
//! - [`view`]: text rendering of the state and the actions user intents map to
//! - [`app`]: store, id generator and views wired together
//! - [`config`] and [`command`]: the terminal front end
//!
//! # Quick Start
//!
//! ```
//! use todo::{TodoAction, TodoId, VisibilityFilter, todo_store, AppState};
//!
//! # fn main() -> Result<(), rxtodo_runtime::StoreError> {
//! let store = todo_store(AppState::default());
//!
//! store.dispatch(TodoAction::add(0, "a"))?;
//! store.dispatch(TodoAction::add(1, "b"))?;
//! store.dispatch(TodoAction::toggle(0))?;
//! store.dispatch(TodoAction::set_filter(VisibilityFilter::ShowActive))?;
//!
//! let state = store.state();
//! assert!(state.get(TodoId::new(0)).is_some_and(|t| t.completed));
//! assert_eq!(state.visible_todos().len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod command;
pub mod config;
pub mod reducer;
pub mod types;
pub mod view;
pub mod visibility;

pub use app::{ActionLog, AppError, Reply, TodoApp};
pub use command::{Command, CommandError};
pub use config::{Config, ConfigError};
pub use reducer::{app_reducer, todo_store, update_todo, AppReducer, FilterReducer, TodoStore, TodosReducer};
pub use types::{AppState, ParseFilterError, Todo, TodoAction, TodoId, VisibilityFilter};
pub use view::{AddTodoView, AppView, FilterLink, Footer, TextDecoration, TodoListView, TodoView};
pub use visibility::visible_todos;

//! Domain types for the todo list.
//!
//! The whole UI is driven by one [`AppState`] value. It only ever changes by
//! reducing a [`TodoAction`], and every change produces a new value.

use rxtodo_macros::Action;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unique identifier for a todo item
///
/// Handed out by an `IdGenerator`, so ids increase in creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from its raw value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for TodoId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,
    /// Text as entered
    pub text: String,
    /// Whether the todo is completed
    pub completed: bool,
}

impl Todo {
    /// Creates a new, not yet completed todo
    #[must_use]
    pub fn new(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }

    /// Returns a copy of this todo with `completed` flipped
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }
}

/// Which todos the list shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisibilityFilter {
    /// Every todo
    #[default]
    ShowAll,
    /// Todos not yet completed
    ShowActive,
    /// Completed todos
    ShowCompleted,
}

impl VisibilityFilter {
    /// Every filter, in footer order
    pub const ALL: [Self; 3] = [Self::ShowAll, Self::ShowActive, Self::ShowCompleted];

    /// Canonical name (`SHOW_ALL`, `SHOW_ACTIVE`, `SHOW_COMPLETED`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShowAll => "SHOW_ALL",
            Self::ShowActive => "SHOW_ACTIVE",
            Self::ShowCompleted => "SHOW_COMPLETED",
        }
    }

    /// Whether `todo` is visible under this filter
    #[must_use]
    pub const fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::ShowAll => true,
            Self::ShowActive => !todo.completed,
            Self::ShowCompleted => todo.completed,
        }
    }
}

impl fmt::Display for VisibilityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`VisibilityFilter`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown visibility filter `{0}` (expected all, active or completed)")]
pub struct ParseFilterError(pub String);

impl FromStr for VisibilityFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "show_all" | "all" => Ok(Self::ShowAll),
            "show_active" | "active" => Ok(Self::ShowActive),
            "show_completed" | "completed" => Ok(Self::ShowCompleted),
            _ => Err(ParseFilterError(trimmed.to_string())),
        }
    }
}

/// State of the whole application
///
/// Single source of truth for every view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// All todos, in creation order
    pub todos: Vec<Todo>,
    /// Current visibility filter
    pub visibility_filter: VisibilityFilter,
}

impl AppState {
    /// Creates a state with no todos and the given filter
    #[must_use]
    pub const fn with_filter(visibility_filter: VisibilityFilter) -> Self {
        Self {
            todos: Vec::new(),
            visibility_filter,
        }
    }

    /// Returns the number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Returns the number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn exists(&self, id: TodoId) -> bool {
        self.get(id).is_some()
    }
}

/// Every state transition the app knows about
///
/// Actions are plain values; dispatching one is the only way to change
/// [`AppState`].
#[derive(Action, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TodoAction {
    /// Append a new todo
    AddTodo {
        /// Id for the new todo
        id: TodoId,
        /// Text of the todo
        text: String,
    },

    /// Flip `completed` on the todo with this id
    ToggleTodo {
        /// Todo to toggle
        id: TodoId,
    },

    /// Change which todos are shown
    SetVisibilityFilter {
        /// New filter
        filter: VisibilityFilter,
    },
}

impl TodoAction {
    /// Shorthand for [`TodoAction::AddTodo`]
    #[must_use]
    pub fn add(id: impl Into<TodoId>, text: impl Into<String>) -> Self {
        Self::AddTodo {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Shorthand for [`TodoAction::ToggleTodo`]
    #[must_use]
    pub fn toggle(id: impl Into<TodoId>) -> Self {
        Self::ToggleTodo { id: id.into() }
    }

    /// Shorthand for [`TodoAction::SetVisibilityFilter`]
    #[must_use]
    pub const fn set_filter(filter: VisibilityFilter) -> Self {
        Self::SetVisibilityFilter { filter }
    }
}

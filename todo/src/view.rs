//! Text views of the application state.
//!
//! Each view renders part of an [`AppState`] to text and turns user intents
//! (clicking a todo, submitting the input, picking a filter) into the
//! [`TodoAction`] to dispatch. Views never touch the store themselves:
//! [`TodoApp`](crate::app::TodoApp) dispatches whatever they return.

use crate::types::{AppState, Todo, TodoAction, TodoId, VisibilityFilter};
use rxtodo_core::environment::IdGenerator;
use std::fmt::Write as _;

/// How a piece of text is decorated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextDecoration {
    /// Plain text
    #[default]
    None,
    /// Struck through, rendered as `~~text~~`
    LineThrough,
    /// Underlined, rendered as `[text]`
    Underline,
}

impl TextDecoration {
    /// CSS name of the decoration
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::LineThrough => "line-through",
            Self::Underline => "underline",
        }
    }

    /// Decorates `text` for a terminal
    #[must_use]
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::None => text.to_string(),
            Self::LineThrough => format!("~~{text}~~"),
            Self::Underline => format!("[{text}]"),
        }
    }
}

/// A single todo line
#[derive(Clone, Copy, Debug)]
pub struct TodoView<'a> {
    todo: &'a Todo,
}

impl<'a> TodoView<'a> {
    /// Creates a view of `todo`
    #[must_use]
    pub const fn new(todo: &'a Todo) -> Self {
        Self { todo }
    }

    /// Struck through once completed
    #[must_use]
    pub const fn text_effect(&self) -> TextDecoration {
        if self.todo.completed {
            TextDecoration::LineThrough
        } else {
            TextDecoration::None
        }
    }

    /// Action for clicking this todo
    #[must_use]
    pub const fn on_click(&self) -> TodoAction {
        TodoAction::ToggleTodo { id: self.todo.id }
    }

    /// Renders `#<id> <text>`
    #[must_use]
    pub fn render(&self) -> String {
        format!("#{} {}", self.todo.id, self.text_effect().apply(&self.todo.text))
    }
}

/// The list of todos visible under the current filter
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoListView {
    todos: Vec<Todo>,
}

impl TodoListView {
    /// Line shown when no todo is visible
    pub const EMPTY: &'static str = "(nothing to show)";

    /// Builds the list from the visible todos of `state`
    #[must_use]
    pub fn from_state(state: &AppState) -> Self {
        Self {
            todos: state.visible_todos(),
        }
    }

    /// Todos in display order
    #[must_use]
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// Action for clicking the todo with `id`
    ///
    /// `None` when no visible todo has that id.
    #[must_use]
    pub fn on_toggle(&self, id: TodoId) -> Option<TodoAction> {
        self.todos
            .iter()
            .find(|todo| todo.id == id)
            .map(|todo| TodoView::new(todo).on_click())
    }

    /// Renders one indented line per todo
    #[must_use]
    pub fn render(&self) -> String {
        if self.todos.is_empty() {
            return format!("  {}", Self::EMPTY);
        }

        self.todos
            .iter()
            .map(|todo| format!("  {}", TodoView::new(todo).render()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The input used to add todos
#[derive(Clone, Copy, Debug, Default)]
pub struct AddTodoView;

impl AddTodoView {
    /// Prompt line
    pub const PROMPT: &'static str = "Add Todo: add <text>";

    /// Action for submitting `text`, with a fresh id from `ids`
    ///
    /// Returns the new id next to the action.
    pub fn on_submit(ids: &dyn IdGenerator, text: impl Into<String>) -> (TodoId, TodoAction) {
        let id = TodoId::new(ids.next_id());
        (
            id,
            TodoAction::AddTodo {
                id,
                text: text.into(),
            },
        )
    }

    /// Renders the prompt
    #[must_use]
    pub const fn render() -> &'static str {
        Self::PROMPT
    }
}

/// A link that switches the visibility filter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterLink {
    filter: VisibilityFilter,
    label: &'static str,
}

impl FilterLink {
    /// Creates a link labelled `label` selecting `filter`
    #[must_use]
    pub const fn new(filter: VisibilityFilter, label: &'static str) -> Self {
        Self { filter, label }
    }

    /// Filter this link selects
    #[must_use]
    pub const fn filter(&self) -> VisibilityFilter {
        self.filter
    }

    /// Link text
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Underlined while its filter is the current one
    #[must_use]
    pub fn text_effect(&self, state: &AppState) -> TextDecoration {
        if state.visibility_filter == self.filter {
            TextDecoration::Underline
        } else {
            TextDecoration::None
        }
    }

    /// Action for clicking this link
    #[must_use]
    pub const fn on_click(&self) -> TodoAction {
        TodoAction::SetVisibilityFilter {
            filter: self.filter,
        }
    }

    /// Renders the label with its decoration
    #[must_use]
    pub fn render(&self, state: &AppState) -> String {
        self.text_effect(state).apply(self.label)
    }
}

/// Footer holding one [`FilterLink`] per filter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Footer {
    links: [FilterLink; 3],
}

impl Default for Footer {
    fn default() -> Self {
        Self {
            links: [
                FilterLink::new(VisibilityFilter::ShowAll, "All"),
                FilterLink::new(VisibilityFilter::ShowActive, "Active"),
                FilterLink::new(VisibilityFilter::ShowCompleted, "Completed"),
            ],
        }
    }
}

impl Footer {
    /// Links in display order
    #[must_use]
    pub const fn links(&self) -> &[FilterLink; 3] {
        &self.links
    }

    /// Link selecting `filter`
    #[must_use]
    pub fn link(&self, filter: VisibilityFilter) -> Option<&FilterLink> {
        self.links.iter().find(|link| link.filter == filter)
    }

    /// Renders `Show: ` followed by the links
    #[must_use]
    pub fn render(&self, state: &AppState) -> String {
        let links: Vec<String> = self.links.iter().map(|link| link.render(state)).collect();
        format!("Show: {}", links.join(" "))
    }
}

/// The whole application: add prompt, todo list, footer
#[derive(Clone, Copy, Debug, Default)]
pub struct AppView {
    footer: Footer,
}

impl AppView {
    /// Footer of this view
    #[must_use]
    pub const fn footer(&self) -> &Footer {
        &self.footer
    }

    /// Renders `state`
    #[must_use]
    pub fn render(&self, state: &AppState) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", AddTodoView::render());
        let _ = writeln!(out, "{}", TodoListView::from_state(state).render());
        let _ = write!(out, "{}", self.footer.render(state));
        out
    }
}

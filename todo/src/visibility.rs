//! Visibility filtering of the todo list.

use crate::types::{AppState, Todo, VisibilityFilter};

/// Returns the todos visible under `filter`, in their original order
#[must_use]
pub fn visible_todos(todos: &[Todo], filter: VisibilityFilter) -> Vec<Todo> {
    todos
        .iter()
        .filter(|todo| filter.matches(todo))
        .cloned()
        .collect()
}

impl AppState {
    /// Todos visible under the current filter
    #[must_use]
    pub fn visible_todos(&self) -> Vec<Todo> {
        visible_todos(&self.todos, self.visibility_filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TodoId;

    fn sample() -> Vec<Todo> {
        vec![
            Todo::new(TodoId::new(0), "a").toggled(),
            Todo::new(TodoId::new(1), "b"),
            Todo::new(TodoId::new(2), "c").toggled(),
            Todo::new(TodoId::new(3), "d"),
        ]
    }

    fn ids(todos: &[Todo]) -> Vec<u64> {
        todos.iter().map(|t| t.id.get()).collect()
    }

    #[test]
    fn show_all_keeps_everything() {
        assert_eq!(visible_todos(&sample(), VisibilityFilter::ShowAll), sample());
    }

    #[test]
    fn show_active_keeps_incomplete_in_order() {
        assert_eq!(ids(&visible_todos(&sample(), VisibilityFilter::ShowActive)), vec![1, 3]);
    }

    #[test]
    fn show_completed_keeps_completed_in_order() {
        assert_eq!(
            ids(&visible_todos(&sample(), VisibilityFilter::ShowCompleted)),
            vec![0, 2]
        );
    }

    #[test]
    fn empty_list_stays_empty() {
        for filter in VisibilityFilter::ALL {
            assert!(visible_todos(&[], filter).is_empty());
        }
    }

    #[test]
    fn app_state_uses_its_own_filter() {
        let state = AppState {
            todos: sample(),
            visibility_filter: VisibilityFilter::ShowActive,
        };
        assert_eq!(ids(&state.visible_todos()), vec![1, 3]);
    }
}

//! Application wiring.
//!
//! [`TodoApp`] holds the three things every view needs: the store (dispatch
//! channel plus latest-state cell), the id generator, and the view tree.

use crate::command::{Command, HELP};
use crate::config::Config;
use crate::reducer::{todo_store, TodoStore};
use crate::types::{AppState, TodoAction, TodoId, VisibilityFilter};
use crate::view::{AddTodoView, AppView, TodoListView, TodoView};
use rxtodo_core::action::Action;
use rxtodo_core::environment::SequentialIds;
use rxtodo_runtime::{StoreError, Subscription};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Errors raised while executing a command
#[derive(Error, Debug)]
pub enum AppError {
    /// The store rejected a dispatch
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The state could not be serialized
    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// What the front end should do after a command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// An action was dispatched; listeners have already re-rendered
    Dispatched,
    /// Print this text
    Print(String),
    /// Print the metrics exposition
    Metrics,
    /// Leave the loop
    Quit,
}

/// The todo application
#[derive(Clone, Debug)]
pub struct TodoApp {
    store: TodoStore,
    ids: Arc<SequentialIds>,
    view: AppView,
}

impl TodoApp {
    /// Creates the app described by `config`
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_state(config.initial_state(), config.first_id)
    }

    /// Creates the app from an explicit initial state
    ///
    /// New todos get ids starting at `first_id`.
    #[must_use]
    pub fn with_state(initial: AppState, first_id: u64) -> Self {
        Self {
            store: todo_store(initial),
            ids: Arc::new(SequentialIds::starting_at(first_id)),
            view: AppView::default(),
        }
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &TodoStore {
        &self.store
    }

    /// The view tree
    #[must_use]
    pub const fn view(&self) -> AppView {
        self.view
    }

    /// Latest state
    #[must_use]
    pub fn state(&self) -> Arc<AppState> {
        self.store.state()
    }

    /// Id the next added todo will get
    #[must_use]
    pub fn next_id(&self) -> TodoId {
        TodoId::new(self.ids.peek())
    }

    /// Adds a todo and returns its id
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is poisoned.
    pub fn add(&self, text: impl Into<String>) -> Result<TodoId, StoreError> {
        // Take the id under the store lock so ids are reduced in the order taken
        self.store
            .dispatch_with(|| AddTodoView::on_submit(&*self.ids, text))
    }

    /// Toggles the todo with `id` as if it were clicked in the list
    ///
    /// A todo hidden by the filter is clicked through its own [`TodoView`];
    /// a missing id still dispatches and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is poisoned.
    pub fn toggle(&self, id: TodoId) -> Result<(), StoreError> {
        let action = self.store.state_with(|state| {
            TodoListView::from_state(state)
                .on_toggle(id)
                .or_else(|| state.get(id).map(|todo| TodoView::new(todo).on_click()))
                .unwrap_or_else(|| TodoAction::toggle(id))
        });
        self.store.dispatch(action)
    }

    /// Switches the visibility filter through its footer link
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is poisoned.
    pub fn set_filter(&self, filter: VisibilityFilter) -> Result<(), StoreError> {
        let action = self
            .view
            .footer()
            .link(filter)
            .map_or_else(|| TodoAction::set_filter(filter), |link| link.on_click());
        self.store.dispatch(action)
    }

    /// Renders the latest state
    #[must_use]
    pub fn render(&self) -> String {
        self.store.state_with(|state| self.view.render(state))
    }

    /// Latest state as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Serialize`] if serialization fails.
    pub fn dump(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(&*self.state())?)
    }

    /// Re-renders the app into `sink` now and after every dispatch
    ///
    /// The listener only captures the view and the sink, never the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the listener registry is poisoned.
    pub fn render_into<F>(&self, sink: F) -> Result<Subscription, StoreError>
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        let view = self.view;
        self.store.observe(move |state: &AppState| sink(view.render(state)))
    }

    /// Starts logging reduced actions
    #[must_use]
    pub fn action_log(&self) -> ActionLog {
        ActionLog {
            receiver: self.store.subscribe_actions(),
        }
    }

    /// Executes a parsed command
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] if dispatch or serialization fails.
    pub fn execute(&self, command: Command) -> Result<Reply, AppError> {
        tracing::debug!(?command, "Executing command");

        let reply = match command {
            Command::Add(text) => {
                let id = self.add(text)?;
                tracing::debug!(%id, "Added todo");
                Reply::Dispatched
            }
            Command::Toggle(id) => {
                if !self.state().exists(id) {
                    tracing::warn!(%id, "Toggling unknown todo has no effect");
                }
                self.toggle(id)?;
                Reply::Dispatched
            }
            Command::Filter(filter) => {
                self.set_filter(filter)?;
                Reply::Dispatched
            }
            Command::Show => Reply::Print(self.render()),
            Command::Dump => Reply::Print(self.dump()?),
            Command::Metrics => Reply::Metrics,
            Command::Help => Reply::Print(HELP.to_string()),
            Command::Quit => Reply::Quit,
        };

        Ok(reply)
    }
}

/// Logs every action the store reduced
///
/// Backed by the store's action broadcast. Call [`ActionLog::drain`] after
/// dispatching to log what was reduced since the last call.
#[derive(Debug)]
pub struct ActionLog {
    receiver: broadcast::Receiver<TodoAction>,
}

impl ActionLog {
    /// Logs pending actions at info and returns them
    pub fn drain(&mut self) -> Vec<TodoAction> {
        let mut drained = Vec::new();

        loop {
            match self.receiver.try_recv() {
                Ok(action) => {
                    match serde_json::to_string(&action) {
                        Ok(payload) => {
                            tracing::info!(action = action.name(), %payload, "Reduced action");
                        }
                        Err(e) => tracing::warn!(
                            action = action.name(),
                            error = %e,
                            "Reduced action could not be serialized"
                        ),
                    }
                    drained.push(action);
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Action log fell behind");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }

        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Todo;
    use std::sync::Mutex;

    #[test]
    fn new_app_starts_from_config() {
        let config = Config {
            initial_filter: VisibilityFilter::ShowActive,
            first_id: 7,
            ..Config::default()
        };
        let app = TodoApp::new(&config);

        assert_eq!(app.state().visibility_filter, VisibilityFilter::ShowActive);
        assert!(app.state().todos.is_empty());
        assert_eq!(app.next_id(), TodoId::new(7));
    }

    #[test]
    fn add_allocates_increasing_ids() {
        let app = TodoApp::with_state(AppState::default(), 0);

        assert_eq!(app.add("a").ok(), Some(TodoId::new(0)));
        assert_eq!(app.add("b").ok(), Some(TodoId::new(1)));
        assert_eq!(
            app.state().todos,
            vec![Todo::new(TodoId::new(0), "a"), Todo::new(TodoId::new(1), "b")]
        );
    }

    #[test]
    fn execute_dispatches_and_prints() {
        let app = TodoApp::with_state(AppState::default(), 0);

        let replies: Vec<Reply> = [
            Command::Add("a".to_string()),
            Command::Toggle(TodoId::new(0)),
            Command::Filter(VisibilityFilter::ShowCompleted),
            Command::Show,
        ]
        .into_iter()
        .filter_map(|command| app.execute(command).ok())
        .collect();

        assert_eq!(
            replies,
            vec![
                Reply::Dispatched,
                Reply::Dispatched,
                Reply::Dispatched,
                Reply::Print("Add Todo: add <text>\n  #0 ~~a~~\nShow: All Active [Completed]".to_string()),
            ]
        );
    }

    #[test]
    fn execute_passes_through_front_end_commands() {
        let app = TodoApp::with_state(AppState::default(), 0);

        assert_eq!(app.execute(Command::Quit).ok(), Some(Reply::Quit));
        assert_eq!(app.execute(Command::Metrics).ok(), Some(Reply::Metrics));
        assert_eq!(app.execute(Command::Help).ok(), Some(Reply::Print(HELP.to_string())));
    }

    #[test]
    fn dump_prints_the_state_as_json() {
        let app = TodoApp::with_state(AppState::default(), 0);
        let _ = app.add("a");

        let dumped = app.dump().unwrap_or_default();
        let parsed: AppState = serde_json::from_str(&dumped).unwrap_or_default();

        assert!(dumped.contains("\"visibilityFilter\": \"SHOW_ALL\""));
        assert_eq!(parsed, *app.state());
    }

    #[test]
    fn render_into_re_renders_after_every_dispatch() {
        let app = TodoApp::with_state(AppState::default(), 0);
        let frames = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&frames);

        let subscription = app.render_into(move |frame| {
            if let Ok(mut frames) = sink.lock() {
                frames.push(frame);
            }
        });
        assert!(subscription.is_ok());

        let _ = app.add("a");
        let _ = app.set_filter(VisibilityFilter::ShowActive);

        let frames = frames.lock().map(|f| f.clone()).unwrap_or_default();
        assert_eq!(frames.len(), 3);
        assert!(frames[0].contains("(nothing to show)"));
        assert!(frames[1].contains("#0 a"));
        assert!(frames[2].ends_with("Show: All [Active] Completed"));
    }

    #[test]
    fn action_log_drains_reduced_actions() {
        let app = TodoApp::with_state(AppState::default(), 3);
        let mut log = app.action_log();

        let _ = app.add("a");
        let _ = app.toggle(TodoId::new(3));

        assert_eq!(
            log.drain(),
            vec![TodoAction::add(3, "a"), TodoAction::toggle(3)]
        );
        assert!(log.drain().is_empty());
    }

    #[test]
    fn action_log_logs_the_json_payload() {
        #[derive(Clone, Default)]
        struct Buffer(Arc<Mutex<Vec<u8>>>);

        impl std::io::Write for Buffer {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                if let Ok(mut inner) = self.0.lock() {
                    inner.extend_from_slice(buf);
                }
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let app = TodoApp::with_state(AppState::default(), 0);
        let mut log = app.action_log();
        let _ = app.toggle(TodoId::new(3));
        let drained = tracing::subscriber::with_default(subscriber, || log.drain());

        let output = buffer
            .0
            .lock()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default();
        assert_eq!(drained, vec![TodoAction::toggle(3)]);
        assert!(output.contains("Reduced action"));
        assert!(output.contains(r#"payload={"type":"ToggleTodo","id":3}"#));
    }

    #[test]
    fn toggle_reaches_todos_hidden_by_the_filter() {
        let app = TodoApp::with_state(AppState::default(), 0);
        let _ = app.add("a");
        let _ = app.add("b");
        let _ = app.toggle(TodoId::new(0));
        let _ = app.set_filter(VisibilityFilter::ShowActive);

        // #0 is completed and not in the active list
        assert!(app.toggle(TodoId::new(0)).is_ok());
        assert!(app.toggle(TodoId::new(1)).is_ok());

        let state = app.state();
        assert!(!state.todos[0].completed);
        assert!(state.todos[1].completed);
    }

    #[test]
    fn toggle_of_unknown_id_still_publishes() {
        let app = TodoApp::with_state(AppState::default(), 0);
        let _ = app.add("a");
        let mut log = app.action_log();
        let before = app.state();

        assert!(app.toggle(TodoId::new(9)).is_ok());

        assert_eq!(log.drain(), vec![TodoAction::toggle(9)]);
        assert_eq!(*app.state(), *before);
        assert!(!Arc::ptr_eq(&app.state(), &before));
    }

    #[test]
    fn concurrent_adds_keep_ids_in_list_order() {
        let app = TodoApp::with_state(AppState::default(), 0);

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let app = app.clone();
                scope.spawn(move || {
                    for _ in 0..25 {
                        let _ = app.add("x");
                    }
                });
            }
        });

        let ids: Vec<u64> = app.state().todos.iter().map(|t| t.id.get()).collect();
        assert_eq!(ids.len(), 100);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}

use chrono::Utc;
use ratatui::widgets::TableState;

use crate::models::{Profile, Task};
use crate::mutations::{complete_task, create_task, delete_task, edit_task, TaskDraft};
use crate::storage::TaskStore;
use crate::views::{completed_view, pending_view, DailyStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Adding,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Pending,
    Completed,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Pending, Tab::Completed, Tab::Profile];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Pending => "Pending",
            Tab::Completed => "Completed",
            Tab::Profile => "Profile",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Pending => 0,
            Tab::Completed => 1,
            Tab::Profile => 2,
        }
    }
}

/// State for the multi-step add / edit form.
#[derive(Debug, Default)]
pub struct FormState {
    pub title: String,
    pub description: String,
    pub step: usize, // 0: Title, 1: Description, 2: Days
}

/// Status line message, replacing the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// Everything the TUI shows.
///
/// `tasks` is the stored collection; the pending and completed lists and
/// the statistics are derived from it on every reload.
pub struct App {
    pub store: TaskStore,
    pub tasks: Vec<Task>,
    pub pending: Vec<Task>,
    pub completed: Vec<Task>,
    pub stats: DailyStats,
    pub profile: Option<Profile>,
    pub tab: Tab,
    pub pending_state: TableState,
    pub completed_state: TableState,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub target_id: Option<u64>,
    pub form: FormState,
    pub notice: Option<Notice>,
}

impl App {
    /// Creates a new App instance and loads initial data.
    pub fn new(store: TaskStore) -> App {
        let mut app = App {
            store,
            tasks: Vec::new(),
            pending: Vec::new(),
            completed: Vec::new(),
            stats: DailyStats::default(),
            profile: None,
            tab: Tab::Pending,
            pending_state: TableState::default(),
            completed_state: TableState::default(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            target_id: None,
            form: FormState::default(),
            notice: None,
        };
        app.reload();
        app
    }

    /// Reloads the collection from storage and re-derives every view.
    pub fn reload(&mut self) {
        self.tasks = match self.store.try_load_tasks() {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::error!(error = %e, "error loading tasks");
                self.notice = Some(Notice::Error(e.to_string()));
                Vec::new()
            }
        };
        self.pending = pending_view(&self.tasks).into_iter().cloned().collect();
        self.completed = completed_view(&self.tasks).into_iter().cloned().collect();
        self.stats = DailyStats::compute(&self.tasks, Utc::now().date_naive());
        self.profile = self.store.load_profile();

        clamp_selection(&mut self.pending_state, self.pending.len());
        clamp_selection(&mut self.completed_state, self.completed.len());
    }

    pub fn next_tab(&mut self) {
        self.tab = Tab::ALL[(self.tab.index() + 1) % Tab::ALL.len()];
    }

    pub fn previous_tab(&mut self) {
        self.tab = Tab::ALL[(self.tab.index() + Tab::ALL.len() - 1) % Tab::ALL.len()];
    }

    fn current_list(&mut self) -> Option<(&mut TableState, usize)> {
        match self.tab {
            Tab::Pending => Some((&mut self.pending_state, self.pending.len())),
            Tab::Completed => Some((&mut self.completed_state, self.completed.len())),
            Tab::Profile => None,
        }
    }

    /// Selects the next row of the current list.
    pub fn next(&mut self) {
        if let Some((state, len)) = self.current_list() {
            if len == 0 {
                return;
            }
            let i = match state.selected() {
                Some(i) if i + 1 < len => i + 1,
                _ => 0,
            };
            state.select(Some(i));
        }
    }

    /// Selects the previous row of the current list.
    pub fn previous(&mut self) {
        if let Some((state, len)) = self.current_list() {
            if len == 0 {
                return;
            }
            let i = match state.selected() {
                Some(0) | None => len - 1,
                Some(i) => i - 1,
            };
            state.select(Some(i));
        }
    }

    /// The pending task under the cursor.
    pub fn selected_pending(&self) -> Option<&Task> {
        if self.tab != Tab::Pending {
            return None;
        }
        self.pending_state.selected().and_then(|i| self.pending.get(i))
    }

    fn selected_task(&self) -> Option<&Task> {
        match self.tab {
            Tab::Pending => self.pending_state.selected().and_then(|i| self.pending.get(i)),
            Tab::Completed => self.completed_state.selected().and_then(|i| self.completed.get(i)),
            Tab::Profile => None,
        }
    }

    /// Marks the selected pending task as complete.
    pub fn complete_selected(&mut self) {
        let Some(id) = self.selected_pending().map(|t| t.id) else { return };
        match complete_task(&self.store, id, Utc::now()) {
            Ok(t) => self.notice = Some(Notice::Info(format!("Task completed: {}", t.title))),
            Err(e) => self.notice = Some(Notice::Error(e.to_string())),
        }
        self.reload();
    }

    /// Deletes the selected task.
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id) else { return };
        match delete_task(&self.store, id) {
            Ok(t) => self.notice = Some(Notice::Info(format!("Task removed: {}", t.title))),
            Err(e) => self.notice = Some(Notice::Error(e.to_string())),
        }
        self.reload();
    }

    /// Opens the form for a new task.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.target_id = None;
        self.form = FormState::default();
        self.input_buffer.clear();
    }

    /// Opens the form pre-filled with the selected pending task.
    pub fn start_edit(&mut self) {
        let Some(t) = self.selected_pending() else { return };
        let (id, title) = (t.id, t.title.clone());
        self.target_id = Some(id);
        self.input_mode = InputMode::Editing;
        self.form = FormState::default();
        self.input_buffer = title;
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        self.target_id = None;
    }

    /// Handles Enter inside the form: advance a step, or submit on the last one.
    pub fn handle_input(&mut self) {
        match self.form.step {
            0 => {
                self.form.title = std::mem::take(&mut self.input_buffer);
                self.form.step += 1;
                if let Some(description) = self.target_task().map(|t| t.description.clone()) {
                    self.input_buffer = description;
                }
            }
            1 => {
                self.form.description = std::mem::take(&mut self.input_buffer);
                self.form.step += 1;
                if let Some(d) = self.target_task().and_then(|t| t.duration) {
                    self.input_buffer = d.to_string();
                }
            }
            _ => self.submit_form(),
        }
    }

    fn target_task(&self) -> Option<&Task> {
        let id = self.target_id?;
        self.tasks.iter().find(|t| t.id == id)
    }

    fn submit_form(&mut self) {
        let raw_days = self.input_buffer.trim();
        let duration = if raw_days.is_empty() {
            None
        } else {
            match raw_days.parse::<u32>() {
                Ok(d) => Some(d),
                Err(_) => {
                    self.notice = Some(Notice::Error(format!("'{}' is not a number of days", raw_days)));
                    return;
                }
            }
        };

        let draft = TaskDraft {
            title: std::mem::take(&mut self.form.title),
            description: std::mem::take(&mut self.form.description),
            duration,
        };
        let result = match self.target_id {
            Some(id) => edit_task(&self.store, id, &draft).map(|t| format!("Task updated: {}", t.title)),
            None => create_task(&self.store, &draft, Utc::now()).map(|t| format!("Task added: {}", t.title)),
        };
        self.notice = Some(match result {
            Ok(msg) => Notice::Info(msg),
            Err(e) => Notice::Error(e.to_string()),
        });

        self.cancel_input();
        self.reload();
    }
}

fn clamp_selection(state: &mut TableState, len: usize) {
    if len == 0 {
        state.select(None);
    } else if let Some(i) = state.selected() {
        if i >= len {
            state.select(Some(len - 1));
        }
    } else {
        state.select(Some(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_in(dir: &tempfile::TempDir) -> App {
        App::new(TaskStore::open(dir.path()))
    }

    fn type_and_enter(app: &mut App, text: &str) {
        app.input_buffer = text.to_string();
        app.handle_input();
    }

    #[test]
    fn add_form_creates_task() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.start_add();
        type_and_enter(&mut app, "Buy milk");
        type_and_enter(&mut app, "Two litres");
        type_and_enter(&mut app, "2");

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.pending.len(), 1);
        assert_eq!(app.pending[0].title, "Buy milk");
        assert_eq!(app.pending[0].duration, Some(2));
        assert_eq!(app.pending_state.selected(), Some(0));
    }

    #[test]
    fn invalid_form_reports_error_and_keeps_collection() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.start_add();
        type_and_enter(&mut app, "");
        type_and_enter(&mut app, "no title");
        type_and_enter(&mut app, "");

        assert!(matches!(app.notice, Some(Notice::Error(_))));
        assert!(app.tasks.is_empty());
    }

    #[test]
    fn completing_moves_task_between_tabs() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(dir.path());
        create_task(&store, &TaskDraft::new("Ship it", "Release v1"), Utc::now()).unwrap();

        let mut app = App::new(store);
        app.complete_selected();

        assert!(app.pending.is_empty());
        assert_eq!(app.completed.len(), 1);
        assert_eq!(app.stats.completion_rate, 100);
    }

    #[test]
    fn edit_form_prefills_current_values() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(dir.path());
        create_task(&store, &TaskDraft::new("Draft", "First pass").with_duration(4), Utc::now()).unwrap();

        let mut app = App::new(store);
        app.start_edit();
        assert_eq!(app.input_buffer, "Draft");
        type_and_enter(&mut app, "Final");
        assert_eq!(app.input_buffer, "First pass");
        app.handle_input();
        assert_eq!(app.input_buffer, "4");
        app.handle_input();

        assert_eq!(app.pending[0].title, "Final");
        assert_eq!(app.pending[0].description, "First pass");
        assert_eq!(app.pending[0].duration, Some(4));
    }

    #[test]
    fn tabs_cycle_both_ways() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.previous_tab();
        assert_eq!(app.tab, Tab::Profile);
        app.next_tab();
        app.next_tab();
        assert_eq!(app.tab, Tab::Completed);
    }
}

//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the task store and the
//! task form, handles key events, and renders the task manager screen: the
//! input row, the filter and sort controls, and the task list.

use std::io;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use tracing::error;

use crate::cmd::task_label;
use crate::due::format_due_relative;
use crate::fields::{CategoryFilter, SortKey};
use crate::form::{FormMode, TaskForm, CATEGORY_FIELD, DUE_FIELD, PRIORITY_FIELD, TEXT_FIELD};
use crate::storage::KeyValueStore;
use crate::store::{StoreError, TaskStore};
use crate::task::TaskId;
use crate::tui::{
    colors::{category_color, priority_color, DARK_GREEN, DARK_PURPLE, DARK_RED, GOLD},
    enums::AppState,
    utils::centered_rect,
};
use crate::view::derive_view;

/// Main application state for the terminal user interface.
pub struct App<S: KeyValueStore> {
    state: AppState,
    store: TaskStore<S>,
    form: TaskForm,
    filter: CategoryFilter,
    sort: SortKey,
    task_list_state: TableState,
    status_message: String,
    status_is_error: bool,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(store: TaskStore<S>, filter: CategoryFilter, sort: SortKey) -> Self {
        let mut app = App {
            state: AppState::TaskList,
            store,
            form: TaskForm::new(),
            filter,
            sort,
            task_list_state: TableState::default(),
            status_message: String::new(),
            status_is_error: false,
        };
        app.clamp_selection();
        app
    }

    /// Ids of the tasks currently on screen, in display order.
    fn visible_ids(&self) -> Vec<TaskId> {
        derive_view(self.store.tasks(), self.filter, self.sort)
            .into_iter()
            .map(|t| t.id.clone())
            .collect()
    }

    fn selected_id(&self) -> Option<TaskId> {
        let idx = self.task_list_state.selected()?;
        self.visible_ids().into_iter().nth(idx)
    }

    /// Keep the selection inside the visible list after it changes size.
    fn clamp_selection(&mut self) {
        let len = self.visible_ids().len();
        let selected = match (len, self.task_list_state.selected()) {
            (0, _) => None,
            (_, None) => Some(0),
            (len, Some(i)) => Some(i.min(len - 1)),
        };
        self.task_list_state.select(selected);
    }

    fn select_id(&mut self, id: &TaskId) {
        if let Some(idx) = self.visible_ids().iter().position(|v| v == id) {
            self.task_list_state.select(Some(idx));
        }
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
        self.status_is_error = false;
    }

    fn report_error(&mut self, e: StoreError) {
        error!(error = %e, "store operation failed");
        self.status_message = format!("Error: {e}");
        self.status_is_error = true;
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
        self.status_is_error = false;
    }

    fn move_selection(&mut self, down: bool) {
        let len = self.visible_ids().len();
        if len == 0 {
            return;
        }
        let i = self.task_list_state.selected().unwrap_or(0);
        let next = if down {
            (i + 1) % len
        } else if i == 0 {
            len - 1
        } else {
            i - 1
        };
        self.task_list_state.select(Some(next));
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self.selected_id() else { return };
        match self.store.toggle_complete(&id) {
            Ok(_) => self.select_id(&id),
            Err(e) => self.report_error(e),
        }
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else { return };
        if let Err(e) = self.store.remove(&id) {
            self.report_error(e);
        }
        self.clamp_selection();
    }

    fn edit_selected(&mut self) {
        let Some(id) = self.selected_id() else { return };
        if self.form.begin_edit_by_id(&self.store, &id) {
            self.state = AppState::Form;
        }
    }

    fn reset_all(&mut self) {
        match self.store.reset_all() {
            Ok(()) => self.set_status_message("All tasks deleted".to_string()),
            Err(e) => self.report_error(e),
        }
        self.clamp_selection();
    }

    fn submit_form(&mut self) {
        let was_edit = matches!(self.form.mode(), FormMode::Edit(_));
        match self.form.submit(&mut self.store) {
            Ok(Some(id)) => {
                self.clamp_selection();
                self.select_id(&id);
                if was_edit {
                    self.state = AppState::TaskList;
                }
            }
            Ok(None) => {}
            Err(e) => self.report_error(e),
        }
    }

    /// Handle input while the task list has focus.
    ///
    /// Returns true if the application should quit.
    fn handle_task_list_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char('q') => return true,
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected(),
            KeyCode::Char('a') | KeyCode::Char('i') | KeyCode::Tab => self.state = AppState::Form,
            KeyCode::Char('e') => self.edit_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('R') => self.reset_all(),
            KeyCode::Char('f') => {
                self.filter = self.filter.cycle();
                self.clamp_selection();
            }
            KeyCode::Char('s') => {
                self.sort = self.sort.toggle();
                self.clamp_selection();
            }
            KeyCode::Char('h') | KeyCode::Char('?') => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    /// Handle input while the form has focus. Esc hands focus back to the
    /// list without discarding the draft or leaving edit mode.
    fn handle_form_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Esc => self.state = AppState::TaskList,
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev_field(),
            KeyCode::Left => self.form.handle_left_right(false),
            KeyCode::Right => self.form.handle_left_right(true),
            KeyCode::Backspace => self.form.handle_backspace(),
            KeyCode::Delete => self.form.handle_delete(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(c) => self.form.handle_char(c),
            _ => {}
        }
        false
    }

    fn handle_help_input(&mut self, key: KeyCode) -> bool {
        if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') | KeyCode::Char('?')) {
            self.state = AppState::TaskList;
        }
        false
    }

    /// Dispatch a key press to the handler for the focused area.
    ///
    /// Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        self.clear_status_message();
        match self.state {
            AppState::TaskList => self.handle_task_list_input(key, modifiers),
            AppState::Form => self.handle_form_input(key, modifiers),
            AppState::Help => self.handle_help_input(key),
        }
    }

    /// Poll for and handle one keyboard event.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key.code, key.modifiers));
                }
            }
        }
        Ok(false)
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let header_text = vec![Line::from(vec![
            Span::styled("ADVANCED TASK MANAGER", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                "Plan & Prioritize Your Tasks",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ])];
        let header = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    /// Render the input row: text, category, priority, due date.
    fn render_form(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(20),    // Text
                Constraint::Length(14), // Category
                Constraint::Length(12), // Priority
                Constraint::Length(14), // Due
                Constraint::Length(16), // Submit hint
            ])
            .split(area);

        let focused = self.state == AppState::Form;
        let border = |field: usize| {
            if focused && self.form.current_field == field {
                Style::default().fg(GOLD)
            } else {
                Style::default()
            }
        };
        let editing = self.form.edit_target().is_some();

        let text = Paragraph::new(self.form.text.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(if editing { "Edit task *" } else { "Enter a task *" })
                .border_style(border(TEXT_FIELD)),
        );
        f.render_widget(text, chunks[0]);

        let category = Paragraph::new(format!("< {} >", self.form.category))
            .style(Style::default().fg(category_color(self.form.category)))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Category")
                    .border_style(border(CATEGORY_FIELD)),
            );
        f.render_widget(category, chunks[1]);

        let priority = Paragraph::new(format!("< {} >", self.form.priority)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Priority")
                .border_style(border(PRIORITY_FIELD)),
        );
        f.render_widget(priority, chunks[2]);

        let due = Paragraph::new(self.form.due_date.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Due")
                .border_style(border(DUE_FIELD)),
        );
        f.render_widget(due, chunks[3]);

        let hint = Paragraph::new(if editing { "Enter: Update" } else { "Enter: Add" })
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(hint, chunks[4]);

        if focused {
            let (field, rect) = match self.form.current_field {
                TEXT_FIELD => (Some(&self.form.text), chunks[0]),
                DUE_FIELD => (Some(&self.form.due_date), chunks[3]),
                _ => (None, chunks[0]),
            };
            if let Some(field) = field {
                let max_x = rect.x + rect.width.saturating_sub(2);
                let x = (rect.x + 1 + field.cursor as u16).min(max_x);
                f.set_cursor_position((x, rect.y + 1));
            }
        }
    }

    /// Render the category filter and sort toggle.
    fn render_controls(&self, f: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::raw("Filter by category: "),
            Span::styled(format!("< {} >", self.filter), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" (f)    "),
            Span::raw(format!("Sort by {} (s)", self.sort.toggle())),
        ];
        if !self.store.is_empty() {
            spans.push(Span::raw("    "));
            spans.push(Span::styled("Reset (R)", Style::default().fg(DARK_RED)));
        }
        let controls = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        f.render_widget(controls, area);
    }

    /// Render the filtered, sorted task list.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let today = Local::now().date_naive();
        let view = derive_view(self.store.tasks(), self.filter, self.sort);
        let title = format!(
            "Tasks ({}/{}) - Press 'h' for help",
            view.len(),
            self.store.len()
        );

        if view.is_empty() {
            let empty = Paragraph::new("No tasks available.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(title));
            f.render_widget(empty, area);
            return;
        }

        let header = Row::new(["", "Task", "Due"].map(|h| {
            Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))
        }))
        .style(Style::default().bg(Color::Blue).fg(Color::White))
        .height(1);

        let rows: Vec<Row> = view
            .iter()
            .map(|task| {
                let style = if task.completed {
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().fg(priority_color(task.priority))
                };
                Row::new(vec![
                    Cell::from(if task.completed { "[x]" } else { "[ ]" }),
                    Cell::from(task_label(task)),
                    Cell::from(format_due_relative(&task.due_date, today)),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(4),  // Checkbox
            Constraint::Min(25),    // Task
            Constraint::Length(12), // Due
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.task_list_state);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let area = centered_rect(60, 70, area);
        f.render_widget(Clear, area);

        let lines = vec![
            Line::from(Span::styled("Task list", Style::default().add_modifier(Modifier::BOLD))),
            Line::from("  Up/Down, j/k   Move selection"),
            Line::from("  Space/Enter    Toggle complete"),
            Line::from("  a, i, Tab      Focus the input row"),
            Line::from("  e              Edit selected task"),
            Line::from("  d, Del         Delete selected task"),
            Line::from("  R              Delete all tasks"),
            Line::from("  f              Cycle category filter"),
            Line::from("  s              Toggle sort (priority/date)"),
            Line::from("  q, Ctrl+C      Quit"),
            Line::from(""),
            Line::from(Span::styled("Input row", Style::default().add_modifier(Modifier::BOLD))),
            Line::from("  Tab/Shift+Tab  Next/previous field"),
            Line::from("  Left/Right     Move cursor / change selection"),
            Line::from("  Enter          Add task (or save edit)"),
            Line::from("  Esc            Back to list (draft is kept)"),
            Line::from(""),
            Line::from("  Due accepts YYYY-MM-DD, today, tomorrow, fri, in 3d, eow, eom"),
        ];
        let help = Paragraph::new(lines)
            .block(
                Block::default()
                    .title("Help")
                    .borders(Borders::ALL)
                    .style(Style::default().bg(DARK_PURPLE)),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(help, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::TaskList => "Task list | Press 'h' for help".to_string(),
                AppState::Form => match self.form.mode() {
                    FormMode::Create => "Add task | Enter to add, Esc for list".to_string(),
                    FormMode::Edit(_) => "Edit task | Enter to save, Esc for list".to_string(),
                },
                AppState::Help => "Help".to_string(),
            }
        };
        let bg = if self.status_is_error { DARK_RED } else { DARK_GREEN };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(bg).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Input row
                Constraint::Length(3), // Filter and sort
                Constraint::Min(0),    // Task list
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_form(f, chunks[1]);
        self.render_controls(f, chunks[2]);
        self.render_task_list(f, chunks[3]);
        if self.state == AppState::Help {
            self.render_help(f, chunks[3]);
        }
        self.render_status_bar(f, chunks[4]);
    }

    /// Main event loop for the TUI application.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Category, Priority};
    use crate::storage::MemoryStore;
    use crate::store::DEFAULT_KEY;
    use crate::task::Draft;
    use ratatui::backend::TestBackend;

    fn app_with(drafts: &[Draft]) -> App<MemoryStore> {
        let mut store = TaskStore::open(MemoryStore::new(), DEFAULT_KEY).unwrap();
        for d in drafts {
            store.add_or_update(d, None).unwrap();
        }
        App::new(store, CategoryFilter::All, SortKey::Priority)
    }

    fn press(app: &mut App<MemoryStore>, key: KeyCode) -> bool {
        app.handle_key(key, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App<MemoryStore>, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_add_task_through_form() {
        let mut app = app_with(&[]);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.state, AppState::Form);
        type_str(&mut app, "Buy milk");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.store.len(), 1);
        let task = &app.store.tasks()[0];
        assert_eq!(task.text, "Buy milk");
        assert_eq!(task.category, Category::Personal);
        assert_eq!(app.form.mode(), FormMode::Create);
        assert_eq!(app.form.text.value, "");
        assert_eq!(app.state, AppState::Form);
    }

    #[test]
    fn test_blank_submit_adds_nothing_and_shows_nothing() {
        let mut app = app_with(&[]);
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "   ");
        press(&mut app, KeyCode::Enter);
        assert!(app.store.is_empty());
        assert!(app.status_message.is_empty());
    }

    #[test]
    fn test_edit_selected_and_esc_keeps_draft() {
        let mut app = app_with(&[Draft::new("Buy milk").priority(Priority::High)]);
        let id = app.store.tasks()[0].id.clone();
        press(&mut app, KeyCode::Char(' '));
        assert!(app.store.get(&id).unwrap().completed);

        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.form.mode(), FormMode::Edit(id.clone()));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::TaskList);
        assert_eq!(app.form.mode(), FormMode::Edit(id.clone()));

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        type_str(&mut app, "oat ");
        press(&mut app, KeyCode::Enter);

        let task = app.store.get(&id).unwrap();
        assert_eq!(task.text, "Buy oat milk");
        assert!(!task.completed);
        assert_eq!(app.form.mode(), FormMode::Create);
        assert_eq!(app.state, AppState::TaskList);
    }

    #[test]
    fn test_filter_sort_delete_reset_keys() {
        let mut app = app_with(&[
            Draft::new("low work").priority(Priority::Low),
            Draft::new("high home").category(Category::Personal).priority(Priority::High),
        ]);
        let first = app.selected_id().unwrap();
        assert_eq!(app.store.get(&first).unwrap().text, "high home");

        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.filter, CategoryFilter::Work);
        assert_eq!(app.visible_ids().len(), 1);

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.sort, SortKey::Date);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.task_list_state.selected(), None);

        press(&mut app, KeyCode::Char('R'));
        assert!(app.store.is_empty());
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_renders_without_panicking() {
        let mut app = app_with(&[Draft::new("Buy milk").due_date("2030-01-01"), Draft::new("Walk dog")]);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        press(&mut app, KeyCode::Char('h'));
        terminal.draw(|f| app.render(f)).unwrap();

        let mut empty = app_with(&[]);
        press(&mut empty, KeyCode::Tab);
        terminal.draw(|f| empty.render(f)).unwrap();
    }
}

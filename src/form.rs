//! Task form: draft field values and the add/edit lifecycle.
//!
//! The form starts in create mode with default values. `begin_edit` loads a
//! task's values and records it as the edit target. `submit` hands the draft
//! to the store and always returns the form to create mode afterwards,
//! whether the store accepted the draft, rejected it, or failed to persist.
//! There is no cancel: leaving edit mode happens only through a submit.

use crate::fields::{Category, Priority};
use crate::input::InputField;
use crate::storage::KeyValueStore;
use crate::store::{StoreError, TaskStore};
use crate::task::{Draft, Task, TaskId};

/// Field order for keyboard navigation.
pub const TEXT_FIELD: usize = 0;
pub const CATEGORY_FIELD: usize = 1;
pub const PRIORITY_FIELD: usize = 2;
pub const DUE_FIELD: usize = 3;
pub const FIELD_COUNT: usize = 4;

/// Whether a submit will append a task or overwrite one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(TaskId),
}

/// Draft fields plus the optional edit target.
#[derive(Debug, Clone)]
pub struct TaskForm {
    pub text: InputField,
    pub category: Category,
    pub priority: Priority,
    pub due_date: InputField,
    pub current_field: usize,
    editing: Option<TaskId>,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskForm {
    /// A form in create mode with default values.
    pub fn new() -> Self {
        let mut form = Self {
            text: InputField::new(),
            category: Category::Work,
            priority: Priority::Medium,
            due_date: InputField::new(),
            current_field: TEXT_FIELD,
            editing: None,
        };
        form.update_active_field();
        form
    }

    pub fn mode(&self) -> FormMode {
        match &self.editing {
            Some(id) => FormMode::Edit(id.clone()),
            None => FormMode::Create,
        }
    }

    pub fn edit_target(&self) -> Option<&TaskId> {
        self.editing.as_ref()
    }

    /// Enter edit mode for `task`, loading its current values.
    pub fn begin_edit(&mut self, task: &Task) {
        self.text.set(&task.text);
        self.category = task.category;
        self.priority = task.priority;
        self.due_date.set(&task.due_date);
        self.editing = Some(task.id.clone());
        self.current_field = TEXT_FIELD;
        self.update_active_field();
    }

    /// Enter edit mode for the task with `id`. Returns false, leaving the
    /// form untouched, if no such task exists.
    pub fn begin_edit_by_id<S: KeyValueStore>(&mut self, store: &TaskStore<S>, id: &TaskId) -> bool {
        match store.get(id) {
            Some(task) => {
                self.begin_edit(task);
                true
            }
            None => false,
        }
    }

    pub fn set_text(&mut self, text: &str) {
        self.text.set(text);
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    pub fn set_due_date(&mut self, due_date: &str) {
        self.due_date.set(due_date);
    }

    /// Snapshot of the current field values.
    pub fn draft(&self) -> Draft {
        Draft {
            text: self.text.value.clone(),
            category: self.category,
            priority: self.priority,
            due_date: self.due_date.value.clone(),
        }
    }

    /// Commit the draft to `store` and return to create mode.
    ///
    /// Returns the affected task's id, or `None` if the store ignored the
    /// draft (blank text, or the edit target no longer exists).
    pub fn submit<S: KeyValueStore>(&mut self, store: &mut TaskStore<S>) -> Result<Option<TaskId>, StoreError> {
        let draft = self.draft();
        let target = self.editing.take();
        let result = store.add_or_update(&draft, target.as_ref());
        self.reset();
        result
    }

    /// Restore default values and leave edit mode.
    fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.update_active_field();
    }

    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            FIELD_COUNT - 1
        } else {
            self.current_field - 1
        };
        self.update_active_field();
    }

    /// Mark the text input under focus as active.
    pub fn update_active_field(&mut self) {
        self.text.active = self.current_field == TEXT_FIELD;
        self.due_date.active = self.current_field == DUE_FIELD;
    }

    /// Character input for the focused text field; selectors ignore it.
    pub fn handle_char(&mut self, c: char) {
        match self.current_field {
            TEXT_FIELD => self.text.handle_char(c),
            DUE_FIELD => self.due_date.handle_char(c),
            _ => {}
        }
    }

    pub fn handle_backspace(&mut self) {
        match self.current_field {
            TEXT_FIELD => self.text.handle_backspace(),
            DUE_FIELD => self.due_date.handle_backspace(),
            _ => {}
        }
    }

    pub fn handle_delete(&mut self) {
        match self.current_field {
            TEXT_FIELD => self.text.handle_delete(),
            DUE_FIELD => self.due_date.handle_delete(),
            _ => {}
        }
    }

    /// Move the cursor in text fields, cycle the value in selectors.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            TEXT_FIELD => if right { self.text.move_cursor_right() } else { self.text.move_cursor_left() },
            DUE_FIELD => if right { self.due_date.move_cursor_right() } else { self.due_date.move_cursor_left() },
            CATEGORY_FIELD => {
                self.category = if right { self.category.next() } else { self.category.prev() };
            }
            PRIORITY_FIELD => {
                self.priority = if right { self.priority.next() } else { self.priority.prev() };
            }
            _ => {}
        }
    }
}

//! Command implementations for the CLI interface.
//!
//! Each subcommand maps to one user verb of the task manager. Handlers take
//! an open `TaskStore`, perform a single operation and report the outcome on
//! stdout.

use anyhow::{Context, Result};
use chrono::Local;
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::due::format_due_relative;
use crate::fields::*;
use crate::form::TaskForm;
use crate::storage::KeyValueStore;
use crate::store::TaskStore;
use crate::task::Task;
use crate::view::derive_view;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI.
    Ui,

    /// Add a new task.
    Add {
        /// What needs doing.
        text: String,
        /// Category: work | personal | urgent.
        #[arg(long, short, value_enum, default_value_t = Category::Work)]
        category: Category,
        /// Priority: high | medium | low.
        #[arg(long, short, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "fri", or "in Nd".
        #[arg(long, short)]
        due: Option<String>,
    },

    /// Edit a task. Unspecified fields keep their current value; the task is
    /// marked not completed.
    Edit {
        /// Task id, unique id prefix, or exact text.
        id: String,
        /// New text.
        #[arg(long)]
        text: Option<String>,
        #[arg(long, short, value_enum)]
        category: Option<Category>,
        #[arg(long, short, value_enum)]
        priority: Option<Priority>,
        /// New due date.
        #[arg(long, short, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the due date.
        #[arg(long)]
        clear_due: bool,
    },

    /// List tasks.
    List {
        /// Category filter: all | work | personal | urgent.
        #[arg(long, short, value_enum)]
        filter: Option<CategoryFilter>,
        /// Sort key: priority | date.
        #[arg(long, short, value_enum)]
        sort: Option<SortKey>,
    },

    /// Toggle a task between done and not done.
    Toggle {
        /// Task id, unique id prefix, or exact text.
        id: String,
    },

    /// Delete a task.
    Delete {
        /// Task id, unique id prefix, or exact text.
        id: String,
    },

    /// Delete every task.
    Reset,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Add a new task.
pub fn cmd_add<S: KeyValueStore>(
    store: &mut TaskStore<S>,
    text: String,
    category: Category,
    priority: Priority,
    due: Option<String>,
) -> Result<()> {
    let mut form = TaskForm::new();
    form.set_text(&text);
    form.set_category(category);
    form.set_priority(priority);
    form.set_due_date(due.as_deref().unwrap_or_default());

    match form.submit(store).context("Failed to save task")? {
        Some(id) => println!("Added task {id}"),
        None => println!("Nothing added: task text is empty"),
    }
    Ok(())
}

/// Overwrite a task's fields through the form's edit mode.
pub fn cmd_edit<S: KeyValueStore>(
    store: &mut TaskStore<S>,
    id: String,
    text: Option<String>,
    category: Option<Category>,
    priority: Option<Priority>,
    due: Option<String>,
    clear_due: bool,
) -> Result<()> {
    let task_id = store.resolve(&id)?;
    let mut form = TaskForm::new();
    if !form.begin_edit_by_id(store, &task_id) {
        anyhow::bail!("Task {task_id} not found");
    }

    if let Some(text) = text {
        form.set_text(&text);
    }
    if let Some(category) = category {
        form.set_category(category);
    }
    if let Some(priority) = priority {
        form.set_priority(priority);
    }
    if let Some(due) = due {
        form.set_due_date(&due);
    }
    if clear_due {
        form.set_due_date("");
    }

    match form.submit(store).context("Failed to save task")? {
        Some(id) => println!("Updated task {id}"),
        None => println!("Task {task_id} unchanged: task text is empty"),
    }
    Ok(())
}

/// Print the filtered, sorted view.
pub fn cmd_list<S: KeyValueStore>(store: &TaskStore<S>, filter: CategoryFilter, sort: SortKey) {
    let view = derive_view(store.tasks(), filter, sort);
    if view.is_empty() {
        println!("No tasks available.");
        return;
    }
    print_table(&view);
    println!(
        "\n{} of {} tasks (filter: {}, sorted by {})",
        view.len(),
        store.len(),
        filter,
        sort
    );
}

/// Toggle completion on a task.
pub fn cmd_toggle<S: KeyValueStore>(store: &mut TaskStore<S>, id: String) -> Result<()> {
    let task_id = store.resolve(&id)?;
    store.toggle_complete(&task_id).context("Failed to save task")?;
    let done = store.get(&task_id).is_some_and(|t| t.completed);
    println!("Task {task_id} marked {}", if done { "done" } else { "not done" });
    Ok(())
}

/// Delete a single task.
pub fn cmd_delete<S: KeyValueStore>(store: &mut TaskStore<S>, id: String) -> Result<()> {
    let task_id = store.resolve(&id)?;
    store.remove(&task_id).context("Failed to save task list")?;
    println!("Deleted task {task_id}");
    Ok(())
}

/// Delete every task.
pub fn cmd_reset<S: KeyValueStore>(store: &mut TaskStore<S>) -> Result<()> {
    let count = store.len();
    store.reset_all().context("Failed to save task list")?;
    println!("Deleted {count} tasks");
    Ok(())
}

/// Write a completion script for `shell` to stdout.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task]) {
    println!(
        "{:<36}  {:<4} {:<9} {:<7} {:<10} {}",
        "ID", "Done", "Category", "Pri", "Due", "Task"
    );
    let today = Local::now().date_naive();
    for t in tasks {
        println!(
            "{:<36}  {:<4} {:<9} {:<7} {:<10} {}",
            t.id,
            if t.completed { "[x]" } else { "[ ]" },
            t.category,
            t.priority,
            truncate(&format_due_relative(&t.due_date, today), 10),
            t.text
        );
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

/// Label a task the way the list shows it: "text (Category) - High Priority".
pub fn task_label(task: &Task) -> String {
    format!("{} ({}) - {} Priority", task.text, task.category, task.priority)
}

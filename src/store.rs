//! The task store: authoritative task list with write-through persistence.
//!
//! `TaskStore` owns the ordered list of tasks and the backend it is persisted
//! to. Every effective mutation serialises the whole list and overwrites the
//! stored value; the in-memory list only changes once that write succeeds.
//! Rejected input and lookup misses are silent no-ops; only
//! storage failures are reported.

use std::collections::HashSet;
use std::io;

use tracing::{debug, warn};

use crate::storage::KeyValueStore;
use crate::task::{Draft, Task, TaskId};

/// Storage key the task list lives under unless configured otherwise.
pub const DEFAULT_KEY: &str = "tasks";

/// Errors writing the task list to its backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write task list: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialise task list: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors resolving a user-typed task identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no task found matching '{0}'")]
    NotFound(String),

    #[error("'{identifier}' matches {} tasks:\n{}\nPlease use a longer id.", .candidates.len(), .candidates.join("\n"))]
    Ambiguous {
        identifier: String,
        candidates: Vec<String>,
    },
}

/// Ordered task list backed by a key-value store.
#[derive(Debug)]
pub struct TaskStore<S: KeyValueStore> {
    tasks: Vec<Task>,
    backend: S,
    key: String,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Load the persisted list. Absent, unreadable or malformed data yields
    /// an empty list.
    pub fn load(backend: S, key: &str) -> Self {
        let tasks = match backend.get(key) {
            Ok(None) => Vec::new(),
            Ok(Some(blob)) => match serde_json::from_str::<Vec<Task>>(&blob) {
                Ok(tasks) => tasks,
                Err(e) => {
                    warn!(key, error = %e, "malformed task list, starting fresh");
                    Vec::new()
                }
            },
            Err(e) => {
                warn!(key, error = %e, "could not read task list, starting fresh");
                Vec::new()
            }
        };
        debug!(key, count = tasks.len(), "loaded tasks");
        TaskStore {
            tasks,
            backend,
            key: key.to_string(),
        }
    }

    /// Load the persisted list and make sure every task has a unique id.
    pub fn open(backend: S, key: &str) -> Result<Self, StoreError> {
        let mut store = Self::load(backend, key);
        store.ensure_ids()?;
        Ok(store)
    }

    /// Give every task without an id, or with an id already used earlier in
    /// the list, a freshly generated one. Existing unique ids are kept.
    /// Persists when anything changed; returns the number of ids assigned.
    pub fn ensure_ids(&mut self) -> Result<usize, StoreError> {
        let mut seen = HashSet::new();
        let mut assigned = 0;
        let mut next = self.tasks.clone();
        for task in next.iter_mut() {
            if task.id.is_empty() || !seen.insert(task.id.clone()) {
                task.id = TaskId::generate();
                seen.insert(task.id.clone());
                assigned += 1;
            }
        }
        if assigned > 0 {
            self.commit(next)?;
            debug!(assigned, "assigned task ids");
        }
        Ok(assigned)
    }

    /// Append a task built from `draft`, or with `edit_target` overwrite that
    /// task in place (id kept, `completed` reset to false).
    ///
    /// Returns the id of the affected task, or `None` when the draft's text is
    /// blank or the edit target does not exist.
    pub fn add_or_update(
        &mut self,
        draft: &Draft,
        edit_target: Option<&TaskId>,
    ) -> Result<Option<TaskId>, StoreError> {
        match edit_target {
            Some(target) => {
                let Some(idx) = self.position(target) else {
                    debug!(id = %target, "edit target not found");
                    return Ok(None);
                };
                let Some(task) = Task::from_draft(draft, target.clone()) else {
                    return Ok(None);
                };
                let mut next = self.tasks.clone();
                next[idx] = task;
                self.commit(next)?;
                debug!(id = %target, "updated task");
                Ok(Some(target.clone()))
            }
            None => {
                let Some(task) = Task::from_draft(draft, TaskId::generate()) else {
                    return Ok(None);
                };
                let id = task.id.clone();
                let mut next = self.tasks.clone();
                next.push(task);
                self.commit(next)?;
                debug!(id = %id, "added task");
                Ok(Some(id))
            }
        }
    }

    /// Flip `completed` on the task with `id`. Returns false if not found.
    pub fn toggle_complete(&mut self, id: &TaskId) -> Result<bool, StoreError> {
        let Some(idx) = self.position(id) else {
            return Ok(false);
        };
        let mut next = self.tasks.clone();
        next[idx].completed = !next[idx].completed;
        let completed = next[idx].completed;
        self.commit(next)?;
        debug!(id = %id, completed, "toggled task");
        Ok(true)
    }

    /// Remove the task with `id`. Returns false if not found.
    pub fn remove(&mut self, id: &TaskId) -> Result<bool, StoreError> {
        let Some(idx) = self.position(id) else {
            return Ok(false);
        };
        let mut next = self.tasks.clone();
        next.remove(idx);
        self.commit(next)?;
        debug!(id = %id, "removed task");
        Ok(true)
    }

    /// Empty the list.
    pub fn reset_all(&mut self) -> Result<(), StoreError> {
        let count = self.tasks.len();
        self.commit(Vec::new())?;
        debug!(count, "reset all tasks");
        Ok(())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[cfg(test)]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Resolve a typed identifier: a full id, a unique id prefix, or the
    /// task's exact text (case-insensitive).
    pub fn resolve(&self, identifier: &str) -> Result<TaskId, ResolveError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(ResolveError::NotFound(identifier.to_string()));
        }
        if let Some(task) = self.tasks.iter().find(|t| t.id.as_str() == identifier) {
            return Ok(task.id.clone());
        }

        let by_prefix: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.id.as_str().starts_with(identifier))
            .collect();
        let matches = if by_prefix.is_empty() {
            let lower = identifier.to_lowercase();
            self.tasks
                .iter()
                .filter(|t| t.text.to_lowercase() == lower)
                .collect()
        } else {
            by_prefix
        };

        match matches.as_slice() {
            [] => Err(ResolveError::NotFound(identifier.to_string())),
            [task] => Ok(task.id.clone()),
            many => Err(ResolveError::Ambiguous {
                identifier: identifier.to_string(),
                candidates: many
                    .iter()
                    .map(|t| format!("  {}: {} ({})", t.id, t.text, t.category))
                    .collect(),
            }),
        }
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    /// Write `next` to the backend and adopt it as the current list. On
    /// failure the in-memory list is left as it was.
    fn commit(&mut self, next: Vec<Task>) -> Result<(), StoreError> {
        let blob = serde_json::to_string(&next)?;
        self.backend.set(&self.key, &blob)?;
        self.tasks = next;
        Ok(())
    }
}

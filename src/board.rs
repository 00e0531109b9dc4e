//! The todo board: two ordered task lists and their mutations.
//!
//! Every mutation is followed synchronously by a full persist of both lists.
//! Persistence failures are logged and swallowed; the in-memory state stays
//! authoritative for the session.

use crate::storage::{Storage, KEY_DONE, KEY_PENDING};
use crate::task::Task;
use tracing::{error, warn};

/// Which board list an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Pending,
    Done,
}

/// Board state: the pending and done sequences plus the storage port they
/// persist through. A task lives in exactly one sequence; order within each
/// is user-significant.
pub struct TodoBoard {
    pending: Vec<Task>,
    done: Vec<Task>,
    storage: Box<dyn Storage>,
}

impl TodoBoard {
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self {
            pending: Vec::new(),
            done: Vec::new(),
            storage,
        }
    }

    pub fn list(&self, kind: ListKind) -> &[Task] {
        match kind {
            ListKind::Pending => &self.pending,
            ListKind::Done => &self.done,
        }
    }

    /// The reminder predicate: is anything still pending?
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Appends a new task to the pending list. Rejects blank descriptions
    /// without touching any state.
    pub fn add_task(&mut self, description: &str) -> bool {
        if description.trim().is_empty() {
            return false;
        }
        self.pending.push(Task::new(description));
        self.persist();
        true
    }

    /// Replaces the description of the task at `index` in `kind`. Blank input
    /// keeps the existing text.
    pub fn edit_task(&mut self, kind: ListKind, index: usize, new_description: &str) {
        let Some(task) = self.list_mut(kind).get_mut(index) else {
            return;
        };
        if !new_description.trim().is_empty() {
            task.description = new_description.to_owned();
        }
        self.persist();
    }

    /// Removes the first task structurally identical to `task` from `kind`.
    /// Silent no-op when absent. Returns whether anything was removed.
    pub fn delete_task(&mut self, task: &Task, kind: ListKind) -> bool {
        let list = self.list_mut(kind);
        let Some(index) = list.iter().position(|t| t == task) else {
            return false;
        };
        list.remove(index);
        self.persist();
        true
    }

    /// Reorders within a list or transfers between lists: remove at
    /// `source_index`, insert at `dest_index`. An out-of-range source index
    /// is a no-op; the destination index is clamped. Returns whether the
    /// pending list is empty afterwards (the "all tasks completed" signal).
    pub fn move_or_reorder(
        &mut self,
        source: ListKind,
        dest: ListKind,
        source_index: usize,
        dest_index: usize,
    ) -> bool {
        if source == dest {
            let list = self.list_mut(source);
            if source_index < list.len() {
                let task = list.remove(source_index);
                let at = dest_index.min(list.len());
                list.insert(at, task);
                self.persist();
            }
        } else {
            let (from, to) = match source {
                ListKind::Pending => (&mut self.pending, &mut self.done),
                ListKind::Done => (&mut self.done, &mut self.pending),
            };
            if source_index < from.len() {
                let mut task = from.remove(source_index);
                // Keep the legacy flag in step with list membership.
                task.done = dest == ListKind::Done;
                let at = dest_index.min(to.len());
                to.insert(at, task);
                self.persist();
            }
        }
        !self.has_pending()
    }

    /// Loads both lists from storage. A missing or unreadable entry yields an
    /// empty list, never an error.
    pub fn restore(&mut self) {
        self.pending = self.load_list(KEY_PENDING);
        self.done = self.load_list(KEY_DONE);
    }

    fn load_list(&self, key: &str) -> Vec<Task> {
        let stored = match self.storage.load(key) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("cannot load '{key}': {e}");
                return Vec::new();
            }
        };
        match stored {
            Some(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!("corrupt '{key}' entry, starting empty: {e}");
                Vec::new()
            }),
            None => Vec::new(),
        }
    }

    fn persist(&self) {
        self.persist_list(KEY_PENDING, &self.pending);
        self.persist_list(KEY_DONE, &self.done);
    }

    fn persist_list(&self, key: &str, list: &[Task]) {
        let json = match serde_json::to_string(list) {
            Ok(json) => json,
            Err(e) => {
                error!("cannot serialize '{key}': {e}");
                return;
            }
        };
        if let Err(e) = self.storage.save(key, &json) {
            error!("cannot persist '{key}': {e}");
        }
    }

    fn list_mut(&mut self, kind: ListKind) -> &mut Vec<Task> {
        match kind {
            ListKind::Pending => &mut self.pending,
            ListKind::Done => &mut self.done,
        }
    }
}

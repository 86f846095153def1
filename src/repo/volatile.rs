// src/repo/volatile.rs

//! Speculative overlay over a committed repository.
//!
//! The overlay owns an append-only list of pending [`MoveResult`]s (newest
//! first, as the cascade accumulates them) and borrows the base store through
//! an `Arc`. It never writes to the base: extending it with another decision
//! produces a new overlay that shares the base and copies the pending list.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::model::{MoveResult, Task, TaskId};
use crate::repo::{DependencyIter, TaskIter, TaskRepository};

pub struct VolatileTaskRepository<R: ?Sized> {
    base: Arc<R>,
    pending: Arc<Vec<MoveResult>>,
    /// Task id -> index of its first (authoritative) entry in `pending`.
    index: HashMap<TaskId, usize>,
}

impl<R: ?Sized> fmt::Debug for VolatileTaskRepository<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VolatileTaskRepository")
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl<R: TaskRepository + ?Sized> VolatileTaskRepository<R> {
    pub fn new(base: Arc<R>, pending: Arc<Vec<MoveResult>>) -> Self {
        let mut index = HashMap::new();
        for (i, result) in pending.iter().enumerate() {
            index.entry(result.task.id).or_insert(i);
        }
        Self {
            base,
            pending,
            index,
        }
    }

    /// A new overlay with `result` placed ahead of the current pending list.
    pub fn with_result(&self, result: MoveResult) -> Self {
        self.with_results(std::slice::from_ref(&result))
    }

    /// A new overlay with `results` placed ahead of the current pending list.
    /// The base and the current overlay are left untouched.
    pub fn with_results(&self, results: &[MoveResult]) -> Self {
        let mut pending = Vec::with_capacity(self.pending.len() + results.len());
        pending.extend(results.iter().cloned());
        pending.extend(self.pending.iter().cloned());
        Self::new(Arc::clone(&self.base), Arc::new(pending))
    }

    /// Whether `id` has a pending candidate. The base store is not consulted.
    pub fn has_task(&self, id: TaskId) -> bool {
        self.index.contains_key(&id)
    }

    /// Pending results, newest first.
    pub fn pending(&self) -> &Arc<Vec<MoveResult>> {
        &self.pending
    }

    pub fn base(&self) -> &Arc<R> {
        &self.base
    }

    fn candidate(&self, id: TaskId) -> Option<&Task> {
        self.index.get(&id).map(|&i| &self.pending[i].task)
    }

    fn overlay(&self, task: Task) -> Task {
        match self.candidate(task.id) {
            Some(candidate) => candidate.clone(),
            None => task,
        }
    }
}

impl<R: TaskRepository + ?Sized> TaskRepository for VolatileTaskRepository<R> {
    fn get(&self, id: TaskId) -> Option<Task> {
        self.candidate(id).cloned().or_else(|| self.base.get(id))
    }

    fn children(&self, id: TaskId) -> TaskIter<'_> {
        Box::new(self.base.children(id).map(move |child| self.overlay(child)))
    }

    fn successor_dependencies(&self, id: TaskId) -> DependencyIter<'_> {
        self.base.successor_dependencies(id)
    }

    fn predecessor_dependencies(&self, id: TaskId) -> DependencyIter<'_> {
        self.base.predecessor_dependencies(id)
    }
}


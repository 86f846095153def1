// src/repo/mod.rs

//! Read model over the task/dependency graph.
//!
//! - [`TaskRepository`] is the pure query surface the cascade consumes.
//! - [`memory`] holds the committed in-memory store built from a plan file.
//! - [`volatile`] is the speculative overlay answering "what if the pending
//!   moves of this cascade were already applied".

use std::fmt::Debug;

use crate::model::{Dependency, Task, TaskId};

pub mod memory;
pub mod volatile;

pub use memory::InMemoryTaskRepository;
pub use volatile::VolatileTaskRepository;

/// Lazy sequence of tasks borrowed from a repository.
pub type TaskIter<'a> = Box<dyn Iterator<Item = Task> + Send + 'a>;

/// Lazy sequence of dependency edges borrowed from a repository.
pub type DependencyIter<'a> = Box<dyn Iterator<Item = Dependency> + Send + 'a>;

/// Read-only access to tasks, their hierarchy and their dependencies.
///
/// No method mutates the backing store. Multi-valued queries are lazy and may
/// be iterated again as long as the store is unchanged.
pub trait TaskRepository: Send + Sync + Debug {
    fn get(&self, id: TaskId) -> Option<Task>;

    /// Resolve the parent of `id` through [`TaskRepository::get`].
    fn get_parent(&self, id: TaskId) -> Option<Task> {
        let parent_id = self.get(id)?.parent_id?;
        self.get(parent_id)
    }

    /// Direct children in storage order.
    fn children(&self, id: TaskId) -> TaskIter<'_>;

    /// Every descendant, depth-first, each child before its own descendants.
    fn all_children(&self, id: TaskId) -> TaskIter<'_> {
        Box::new(AllChildren::new(self, id))
    }

    /// Edges where `id` is the predecessor.
    fn successor_dependencies(&self, id: TaskId) -> DependencyIter<'_>;

    /// Edges where `id` is the successor.
    fn predecessor_dependencies(&self, id: TaskId) -> DependencyIter<'_>;
}

/// Depth-first walk over a task's descendants driven by
/// [`TaskRepository::children`], so overlays substitute at every level.
pub struct AllChildren<'a, R: ?Sized> {
    repo: &'a R,
    stack: Vec<TaskIter<'a>>,
}

impl<'a, R: TaskRepository + ?Sized> AllChildren<'a, R> {
    pub fn new(repo: &'a R, id: TaskId) -> Self {
        Self {
            repo,
            stack: vec![repo.children(id)],
        }
    }
}

impl<'a, R: TaskRepository + ?Sized> Iterator for AllChildren<'a, R> {
    type Item = Task;

    fn next(&mut self) -> Option<Task> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(child) => {
                    let repo: &'a R = self.repo;
                    self.stack.push(repo.children(child.id));
                    return Some(child);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

// src/scheduler/mod.rs

//! Move / validate / cascade engine.
//!
//! - [`bounds`] turns predecessor edges into the earliest-start and
//!   latest-end bounds of a task.
//! - [`check`] validates a candidate schedule against a task's constraint.
//! - [`cascade`] drives one move through every transitively affected
//!   successor, reading through a speculative overlay.

use std::fmt;
use std::sync::Arc;

use crate::model::{MoveResult, Schedule, Task};
use crate::repo::TaskRepository;
use crate::types::FanOut;

pub mod bounds;
pub mod cascade;
pub mod check;

pub use bounds::Bounds;
pub use check::check_constraint;

/// Tuning for a [`Scheduler`], usually taken from the plan's `[scheduler]`
/// section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerOptions {
    pub fan_out: FanOut,
    /// Longest chain of successors a single move may walk.
    pub max_depth: usize,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            fan_out: FanOut::default(),
            max_depth: 256,
        }
    }
}

/// Cascade engine over a read-only repository.
///
/// Cloning is cheap: the repository is shared behind an `Arc`, which is also
/// what lets successor branches run on separate tokio tasks.
pub struct Scheduler<R: ?Sized> {
    repo: Arc<R>,
    options: SchedulerOptions,
}

impl<R: ?Sized> Clone for Scheduler<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            options: self.options,
        }
    }
}

impl<R: ?Sized> fmt::Debug for Scheduler<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<R: TaskRepository + ?Sized> Scheduler<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self::with_options(repo, SchedulerOptions::default())
    }

    pub fn with_options(repo: Arc<R>, options: SchedulerOptions) -> Self {
        Self { repo, options }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }

    pub fn options(&self) -> SchedulerOptions {
        self.options
    }

    /// Ad-hoc validation of `candidate` for `task`, without cascading.
    pub fn check_constraint(&self, task: &Task, candidate: &Schedule) -> MoveResult {
        check_constraint(task, candidate)
    }
}

// src/model/task.rs

use chrono::NaiveDate;

use crate::model::constraint::Constraint;
use crate::model::schedule::Schedule;

/// Stable task identity within a plan. `0` is reserved for "no task".
pub type TaskId = u64;

/// A scheduled task in the plan hierarchy.
///
/// The authoritative parent/child link is `parent_id`, resolved through a
/// repository. `children` is a display-only list of child ids and is never
/// consulted for hierarchy queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub parent_id: Option<TaskId>,
    pub name: String,
    pub constraint: Option<Constraint>,
    pub children: Vec<TaskId>,
    schedule: Schedule,
}

impl Task {
    pub fn new(id: TaskId, name: impl Into<String>, schedule: Schedule) -> Self {
        Self {
            id,
            parent_id: None,
            name: name.into(),
            constraint: None,
            children: Vec::new(),
            schedule,
        }
    }

    pub fn with_parent(mut self, parent_id: TaskId) -> Self {
        // 0 means root.
        self.parent_id = (parent_id != 0).then_some(parent_id);
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    /// A candidate copy of this task placed on `schedule`.
    pub fn with_schedule(&self, schedule: Schedule) -> Self {
        Self {
            schedule,
            ..self.clone()
        }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Mutable access for controlled changes via [`Schedule::change`].
    pub fn schedule_mut(&mut self) -> &mut Schedule {
        &mut self.schedule
    }

    pub fn start(&self) -> NaiveDate {
        self.schedule.start()
    }

    pub fn end(&self) -> NaiveDate {
        self.schedule.end()
    }

    pub fn duration(&self) -> i64 {
        self.schedule.duration()
    }

    /// Short label used in logs and rejection messages.
    pub fn label(&self) -> String {
        format!("'{}' (#{})", self.name, self.id)
    }
}

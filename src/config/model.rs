// src/config/model.rs

use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::{CascadeError, Result};
use crate::model::{Constraint, Dependency, Schedule, Task, TaskId};
use crate::scheduler::SchedulerOptions;
use crate::types::{Anchor, ConstraintType, DependencyType, FanOut};

/// Plan file exactly as deserialized from TOML, before validation.
///
/// ```toml
/// [scheduler]
/// fan_out = "parallel"
///
/// [[task]]
/// id = 1
/// name = "Design"
/// start = "2024-01-01"
/// duration = 5
///
/// [[task]]
/// id = 2
/// name = "Build"
/// start = "2024-01-04"
/// end = "2024-01-06"
/// constraint = { type = "must_start_after", date = "2024-01-02" }
///
/// [[dependency]]
/// predecessor = 1
/// successor = 2
/// type = "finish_start"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlanFile {
    #[serde(default)]
    pub scheduler: SchedulerSection,

    /// `[[task]]` entries; file order is storage order.
    #[serde(default)]
    pub task: Vec<TaskConfig>,

    #[serde(default)]
    pub dependency: Vec<DependencyConfig>,
}

/// A validated plan. Only obtainable through `PlanFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct PlanFile {
    scheduler: SchedulerSection,
    task: Vec<TaskConfig>,
    dependency: Vec<DependencyConfig>,
}

impl PlanFile {
    pub(crate) fn new_unchecked(
        scheduler: SchedulerSection,
        task: Vec<TaskConfig>,
        dependency: Vec<DependencyConfig>,
    ) -> Self {
        Self {
            scheduler,
            task,
            dependency,
        }
    }

    pub fn scheduler(&self) -> &SchedulerSection {
        &self.scheduler
    }

    pub fn tasks(&self) -> &[TaskConfig] {
        &self.task
    }

    pub fn dependencies(&self) -> &[DependencyConfig] {
        &self.dependency
    }
}

/// `[scheduler]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSection {
    /// `"parallel"` (default) or `"sequential"` successor evaluation.
    #[serde(default)]
    pub fan_out: FanOut,

    /// Deepest successor chain a single move may walk.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    256
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            fan_out: FanOut::default(),
            max_depth: default_max_depth(),
        }
    }
}

impl SchedulerSection {
    pub fn options(&self) -> SchedulerOptions {
        SchedulerOptions {
            fan_out: self.fan_out,
            max_depth: self.max_depth,
        }
    }
}

/// `[[task]]` entry. Exactly two of `start`, `end`, `duration` must be set.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    pub id: TaskId,

    #[serde(default)]
    pub name: String,

    /// Parent task id; absent or `0` means a root task.
    #[serde(default)]
    pub parent: Option<TaskId>,

    #[serde(default)]
    pub start: Option<NaiveDate>,

    #[serde(default)]
    pub end: Option<NaiveDate>,

    /// Length in days.
    #[serde(default)]
    pub duration: Option<u32>,

    #[serde(default)]
    pub constraint: Option<ConstraintConfig>,
}

impl TaskConfig {
    /// Parent id with the `0` sentinel folded into `None`.
    pub fn parent_id(&self) -> Option<TaskId> {
        self.parent.filter(|p| *p != 0)
    }

    pub fn schedule(&self) -> Result<Schedule> {
        let invalid = |e: CascadeError| {
            CascadeError::ConfigError(format!("task {} has an invalid interval: {e}", self.id))
        };
        match (self.start, self.end, self.duration) {
            (Some(start), Some(end), None) => Schedule::new(start, end).map_err(invalid),
            (Some(start), None, Some(days)) => {
                Schedule::anchored(start, days, Anchor::Start).map_err(invalid)
            }
            (None, Some(end), Some(days)) => Schedule::anchored(end, days, Anchor::End).map_err(invalid),
            _ => Err(CascadeError::ConfigError(format!(
                "task {} must set exactly two of `start`, `end` and `duration`",
                self.id
            ))),
        }
    }

    pub fn to_task(&self) -> Result<Task> {
        let mut task = Task::new(self.id, self.name.clone(), self.schedule()?);
        task.parent_id = self.parent_id();
        task.constraint = self.constraint.as_ref().map(ConstraintConfig::to_constraint);
        Ok(task)
    }
}

/// Inline `constraint = { type = "...", date = "..." }` table.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ConstraintConfig {
    #[serde(rename = "type")]
    pub constraint_type: ConstraintType,
    pub date: NaiveDate,
}

impl ConstraintConfig {
    pub fn to_constraint(&self) -> Constraint {
        Constraint::new(self.constraint_type, self.date)
    }
}

/// `[[dependency]]` entry.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DependencyConfig {
    pub predecessor: TaskId,
    pub successor: TaskId,

    /// Defaults to `finish_start`.
    #[serde(rename = "type", default)]
    pub dependency_type: DependencyType,
}

impl DependencyConfig {
    pub fn to_dependency(&self) -> Dependency {
        Dependency::new(self.predecessor, self.successor, self.dependency_type)
    }
}

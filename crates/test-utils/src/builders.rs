#![allow(dead_code)]

use std::sync::Arc;

use gantt_cascade::config::{
    ConstraintConfig, DependencyConfig, PlanFile, RawPlanFile, SchedulerSection, TaskConfig,
};
use gantt_cascade::repo::InMemoryTaskRepository;
use gantt_cascade::scheduler::{Scheduler, SchedulerOptions};
use gantt_cascade::types::{ConstraintType, DependencyType, FanOut};

use crate::day;

/// Builder for `PlanFile` to simplify test setup.
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    plan: RawPlanFile,
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self {
            plan: RawPlanFile {
                scheduler: SchedulerSection::default(),
                task: Vec::new(),
                dependency: Vec::new(),
            },
        }
    }

    pub fn with_task(mut self, task: TaskConfig) -> Self {
        self.plan.task.push(task);
        self
    }

    pub fn depends(mut self, predecessor: u64, successor: u64, dependency_type: DependencyType) -> Self {
        self.plan.dependency.push(DependencyConfig {
            predecessor,
            successor,
            dependency_type,
        });
        self
    }

    /// Finish-start edge, the common case.
    pub fn after(self, predecessor: u64, successor: u64) -> Self {
        self.depends(predecessor, successor, DependencyType::FinishStart)
    }

    pub fn fan_out(mut self, fan_out: FanOut) -> Self {
        self.plan.scheduler.fan_out = fan_out;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.plan.scheduler.max_depth = max_depth;
        self
    }

    pub fn raw(self) -> RawPlanFile {
        self.plan
    }

    pub fn build(self) -> PlanFile {
        PlanFile::try_from(self.plan).expect("Failed to build valid plan from builder")
    }

    pub fn build_repo(self) -> InMemoryTaskRepository {
        InMemoryTaskRepository::from_plan(&self.build()).expect("Failed to build repository from plan")
    }

    /// Repository plus a scheduler configured from the plan's `[scheduler]`.
    pub fn build_scheduler(self) -> (Arc<InMemoryTaskRepository>, Scheduler<InMemoryTaskRepository>) {
        let plan = self.build();
        let options: SchedulerOptions = plan.scheduler().options();
        let repo = Arc::new(
            InMemoryTaskRepository::from_plan(&plan).expect("Failed to build repository from plan"),
        );
        let scheduler = Scheduler::with_options(Arc::clone(&repo), options);
        (repo, scheduler)
    }
}

impl Default for PlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`. Dates are given as day offsets from [`day`].
#[derive(Debug, Clone)]
pub struct TaskBuilder {
    task: TaskConfig,
}

impl TaskBuilder {
    /// Task `id` starting on `day(start)` and lasting `duration` days.
    pub fn new(id: u64, start: i64, duration: u32) -> Self {
        Self {
            task: TaskConfig {
                id,
                name: format!("task_{id}"),
                parent: None,
                start: Some(day(start)),
                end: None,
                duration: Some(duration),
                constraint: None,
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.task.name = name.to_string();
        self
    }

    pub fn parent(mut self, parent: u64) -> Self {
        self.task.parent = Some(parent);
        self
    }

    pub fn constraint(mut self, constraint_type: ConstraintType, on: i64) -> Self {
        self.task.constraint = Some(ConstraintConfig {
            constraint_type,
            date: day(on),
        });
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}

// src/model/dependency.rs

use crate::model::task::TaskId;
use crate::types::{Anchor, DependencyType};

/// Directed edge `predecessor -> successor`. Edges are never created or
/// removed by a cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dependency {
    pub predecessor_id: TaskId,
    pub successor_id: TaskId,
    pub dependency_type: DependencyType,
}

impl Dependency {
    pub fn new(predecessor_id: TaskId, successor_id: TaskId, dependency_type: DependencyType) -> Self {
        Self {
            predecessor_id,
            successor_id,
            dependency_type,
        }
    }

    pub fn finish_start(predecessor_id: TaskId, successor_id: TaskId) -> Self {
        Self::new(predecessor_id, successor_id, DependencyType::FinishStart)
    }

    pub fn rule(&self) -> BoundRule {
        self.dependency_type.rule()
    }
}

/// How a predecessor date bounds the successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// The earliest contributing date wins.
    Min,
    /// The latest contributing date wins.
    Max,
}

/// One row of the dependency-type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundRule {
    /// Which end of the successor is bounded.
    pub bounds: Anchor,
    /// Which date of the predecessor supplies the bound.
    pub reads: Anchor,
    /// How several predecessors bounding the same end are combined.
    pub aggregate: Aggregate,
}

impl DependencyType {
    /// | type          | bounds | reads | aggregate |
    /// |---------------|--------|-------|-----------|
    /// | FinishStart   | start  | end   | min       |
    /// | StartStart    | start  | end   | min       |
    /// | FinishFinish  | end    | end   | max       |
    /// | StartFinish   | end    | start | max       |
    pub fn rule(self) -> BoundRule {
        match self {
            DependencyType::FinishStart | DependencyType::StartStart => BoundRule {
                bounds: Anchor::Start,
                reads: Anchor::End,
                aggregate: Aggregate::Min,
            },
            DependencyType::FinishFinish => BoundRule {
                bounds: Anchor::End,
                reads: Anchor::End,
                aggregate: Aggregate::Max,
            },
            DependencyType::StartFinish => BoundRule {
                bounds: Anchor::End,
                reads: Anchor::Start,
                aggregate: Aggregate::Max,
            },
        }
    }
}

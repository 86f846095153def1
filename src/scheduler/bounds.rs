// src/scheduler/bounds.rs

use chrono::NaiveDate;

use crate::errors::{CascadeError, Result};
use crate::model::{Aggregate, Dependency};
use crate::repo::TaskRepository;
use crate::types::Anchor;

/// Dates a task must respect because of its predecessors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    /// The task may not start before this date.
    pub min_start: Option<NaiveDate>,
    /// The task may not end before this date.
    pub max_end: Option<NaiveDate>,
}

impl Bounds {
    /// Fold `predecessors` into bounds, reading each predecessor through
    /// `repo` so tentative placements from the current cascade are used.
    ///
    /// Each edge contributes according to its [`BoundRule`](crate::model::BoundRule);
    /// a bound with no contributing edge stays `None`.
    pub fn collect<R: TaskRepository + ?Sized>(repo: &R, predecessors: &[Dependency]) -> Result<Self> {
        let mut bounds = Bounds::default();

        for dep in predecessors {
            let rule = dep.rule();
            let predecessor = repo
                .get(dep.predecessor_id)
                .ok_or(CascadeError::TaskNotFound(dep.predecessor_id))?;
            let date = predecessor.schedule().date_at(rule.reads);

            let slot = match rule.bounds {
                Anchor::Start => &mut bounds.min_start,
                Anchor::End => &mut bounds.max_end,
            };
            *slot = Some(match (*slot, rule.aggregate) {
                (None, _) => date,
                (Some(current), Aggregate::Min) => current.min(date),
                (Some(current), Aggregate::Max) => current.max(date),
            });
        }

        Ok(bounds)
    }

    pub fn is_empty(&self) -> bool {
        self.min_start.is_none() && self.max_end.is_none()
    }
}

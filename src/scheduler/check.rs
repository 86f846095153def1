// src/scheduler/check.rs

use crate::model::{MoveResult, Schedule, Task};

/// Validate `candidate` as the new schedule of `task`.
///
/// The returned result always carries the candidate task. It is invalid only
/// if `task` has a constraint that `candidate` breaks, in which case the
/// message names the task, the proposed date and the bound. Tasks without a
/// constraint always validate.
pub fn check_constraint(task: &Task, candidate: &Schedule) -> MoveResult {
    let moved = task.with_schedule(*candidate);

    let Some(constraint) = task.constraint else {
        return MoveResult::accepted(moved);
    };

    if constraint.is_satisfied_by(candidate) {
        return MoveResult::accepted(moved);
    }

    let message = format!(
        "task {} cannot move its {} to {}: it {} {}",
        task.label(),
        constraint.constraint_type.anchor(),
        constraint.proposed_date(candidate),
        constraint.constraint_type,
        constraint.date,
    );
    MoveResult::rejected(moved, message)
}

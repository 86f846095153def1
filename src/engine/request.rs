// src/engine/request.rs

use chrono::NaiveDate;

use crate::errors::{CascadeError, Result};
use crate::model::{Schedule, ScheduleChange, Task, TaskId};
use crate::repo::TaskRepository;
use crate::types::Anchor;

/// A change a user asks for on one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRequest {
    /// Move the task so it starts on the date, keeping its duration.
    ShiftStart(NaiveDate),
    /// Move the task so it ends on the date, keeping its duration.
    ShiftEnd(NaiveDate),
    /// Controlled change: new start, end held fixed.
    SetStart(NaiveDate),
    /// Controlled change: new end, start held fixed.
    SetEnd(NaiveDate),
    /// Controlled change: new duration in days, start held fixed.
    SetDuration(u32),
}

impl MoveRequest {
    /// The schedule `schedule` would have after this request.
    pub fn apply_to(&self, schedule: &Schedule) -> Result<Schedule> {
        let change = match *self {
            MoveRequest::ShiftStart(date) => return schedule.shifted_to(date, Anchor::Start),
            MoveRequest::ShiftEnd(date) => return schedule.shifted_to(date, Anchor::End),
            MoveRequest::SetStart(date) => ScheduleChange::Start(date),
            MoveRequest::SetEnd(date) => ScheduleChange::End(date),
            MoveRequest::SetDuration(days) => ScheduleChange::Duration(days),
        };

        let mut next = *schedule;
        next.change(change)?;
        Ok(next)
    }
}

/// Build the candidate task for `request` from the current state of task `id`.
pub fn propose<R: TaskRepository + ?Sized>(repo: &R, id: TaskId, request: MoveRequest) -> Result<Task> {
    let task = repo.get(id).ok_or(CascadeError::TaskNotFound(id))?;
    let schedule = request.apply_to(task.schedule())?;
    Ok(task.with_schedule(schedule))
}

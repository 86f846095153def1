// src/engine/mod.rs

//! Caller-side orchestration around the cascade.
//!
//! This module ties together:
//! - turning a user's requested change into a candidate task ([`request`])
//! - running that candidate through the [`Scheduler`] as a `User` move
//!
//! The commit step stays with the caller; see
//! [`InMemoryTaskRepository::apply`](crate::repo::InMemoryTaskRepository::apply).

pub mod request;

pub use request::{propose, MoveRequest};

use tracing::debug;

use crate::errors::Result;
use crate::model::{MoveResult, TaskId};
use crate::repo::TaskRepository;
use crate::scheduler::Scheduler;
use crate::types::MoveSender;

/// Apply `request` to task `id` and cascade the result.
///
/// Returns every task that has to change, in the order described on
/// [`Scheduler::move_task`], or the first constraint violation.
pub async fn run_move<R>(scheduler: &Scheduler<R>, id: TaskId, request: MoveRequest) -> Result<Vec<MoveResult>>
where
    R: TaskRepository + ?Sized + 'static,
{
    let candidate = propose(scheduler.repository().as_ref(), id, request)?;
    debug!(
        task = id,
        ?request,
        start = %candidate.start(),
        end = %candidate.end(),
        "proposed candidate"
    );
    scheduler
        .move_task(candidate, Vec::new(), MoveSender::User)
        .await
}

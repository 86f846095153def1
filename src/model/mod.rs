// src/model/mod.rs

//! Plan data model.
//!
//! - [`schedule`]: the start/end/duration interval and its controlled change.
//! - [`task`]: a schedule with identity, hierarchy and an optional constraint.
//! - [`dependency`]: typed predecessor -> successor edges and their bound table.
//! - [`constraint`]: immovable date bounds.
//! - [`move_result`]: per-task output of a cascade.

pub mod constraint;
pub mod dependency;
pub mod move_result;
pub mod schedule;
pub mod task;

pub use constraint::Constraint;
pub use dependency::{Aggregate, BoundRule, Dependency};
pub use move_result::MoveResult;
pub use schedule::{Schedule, ScheduleChange};
pub use task::{Task, TaskId};

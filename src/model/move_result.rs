// src/model/move_result.rs

use crate::model::task::Task;

/// Outcome of evaluating one task during a cascade.
///
/// `task` is the candidate placement; it is not committed anywhere until the
/// caller applies the accepted list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    pub valid: bool,
    pub task: Task,
    pub message: Option<String>,
}

impl MoveResult {
    pub fn accepted(task: Task) -> Self {
        Self {
            valid: true,
            task,
            message: None,
        }
    }

    pub fn rejected(task: Task, message: impl Into<String>) -> Self {
        Self {
            valid: false,
            task,
            message: Some(message.into()),
        }
    }

    pub fn explanation(&self) -> &str {
        match (&self.message, self.valid) {
            (Some(msg), _) => msg,
            (None, true) => "accepted",
            (None, false) => "rejected",
        }
    }
}

// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::model::{MoveResult, TaskId};

#[derive(Error, Debug)]
pub enum CascadeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Cycle detected in dependency graph: {0}")]
    DependencyCycle(String),

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    /// A candidate move anywhere in the cascade broke a task constraint.
    /// Carries the first violating result; the whole move is rejected.
    #[error("Move rejected: {}", .0.explanation())]
    ConstraintViolation(Box<MoveResult>),

    #[error("Cascade exceeded the maximum depth of {0}")]
    DepthExceeded(usize),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CascadeError {
    /// The violating result if this error is a rejected move.
    pub fn rejection(&self) -> Option<&MoveResult> {
        match self {
            CascadeError::ConstraintViolation(result) => Some(result),
            _ => None,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, CascadeError>;

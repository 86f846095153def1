use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Coupling rule between a predecessor and its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyType {
    FinishStart,
    StartStart,
    FinishFinish,
    StartFinish,
}

impl Default for DependencyType {
    fn default() -> Self {
        DependencyType::FinishStart
    }
}

impl FromStr for DependencyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "finish_start" | "fs" => Ok(DependencyType::FinishStart),
            "start_start" | "ss" => Ok(DependencyType::StartStart),
            "finish_finish" | "ff" => Ok(DependencyType::FinishFinish),
            "start_finish" | "sf" => Ok(DependencyType::StartFinish),
            other => Err(format!(
                "invalid dependency type: {other} (expected finish_start, start_start, finish_finish or start_finish)"
            )),
        }
    }
}

/// Kind of immovable date bound attached to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintType {
    MustStartOn,
    MustEndOn,
    MustStartBefore,
    MustStartAfter,
    MustEndBefore,
    MustEndAfter,
}

impl ConstraintType {
    /// Which end of the schedule this constraint looks at.
    pub fn anchor(self) -> Anchor {
        match self {
            ConstraintType::MustStartOn
            | ConstraintType::MustStartBefore
            | ConstraintType::MustStartAfter => Anchor::Start,
            ConstraintType::MustEndOn
            | ConstraintType::MustEndBefore
            | ConstraintType::MustEndAfter => Anchor::End,
        }
    }
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConstraintType::MustStartOn => "must start on",
            ConstraintType::MustEndOn => "must end on",
            ConstraintType::MustStartBefore => "must start before",
            ConstraintType::MustStartAfter => "must start after",
            ConstraintType::MustEndBefore => "must end before",
            ConstraintType::MustEndAfter => "must end after",
        };
        f.write_str(s)
    }
}

impl FromStr for ConstraintType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "must_start_on" => Ok(ConstraintType::MustStartOn),
            "must_end_on" => Ok(ConstraintType::MustEndOn),
            "must_start_before" => Ok(ConstraintType::MustStartBefore),
            "must_start_after" => Ok(ConstraintType::MustStartAfter),
            "must_end_before" => Ok(ConstraintType::MustEndBefore),
            "must_end_after" => Ok(ConstraintType::MustEndAfter),
            other => Err(format!("invalid constraint type: {other}")),
        }
    }
}

/// Which end of a schedule is held fixed (or read) by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Start,
    End,
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Start => f.write_str("start"),
            Anchor::End => f.write_str("end"),
        }
    }
}

/// Who triggered a visit of the cascade.
///
/// - `User`: the caller proposed this task's new placement directly.
/// - `Predecessor`: the visit comes from an upstream task that moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSender {
    User,
    Predecessor,
}

/// How successor branches of a cascade are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanOut {
    /// One tokio task per successor; the first rejection aborts the siblings.
    Parallel,
    /// Successors are visited one after another in storage order.
    Sequential,
}

impl Default for FanOut {
    fn default() -> Self {
        FanOut::Parallel
    }
}

impl FromStr for FanOut {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "parallel" => Ok(FanOut::Parallel),
            "sequential" => Ok(FanOut::Sequential),
            other => Err(format!(
                "invalid fan_out: {other} (expected \"parallel\" or \"sequential\")"
            )),
        }
    }
}

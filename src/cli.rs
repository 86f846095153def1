// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use crate::config::default_plan_path;
use crate::engine::MoveRequest;
use crate::model::TaskId;

/// Command-line arguments for `gantt-cascade`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gantt-cascade",
    version,
    about = "Propagate a task move through a dependency-linked project plan.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the plan file (TOML).
    ///
    /// Default: `Plan.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value_os_t = default_plan_path())]
    pub plan: PathBuf,

    /// Id of the task to move.
    #[arg(long, value_name = "ID")]
    pub task: Option<TaskId>,

    /// Move the task to start on DATE, keeping its duration.
    #[arg(long, value_name = "DATE")]
    pub shift_start: Option<NaiveDate>,

    /// Move the task to end on DATE, keeping its duration.
    #[arg(long, value_name = "DATE")]
    pub shift_end: Option<NaiveDate>,

    /// Set the start to DATE, keeping the end.
    #[arg(long, value_name = "DATE")]
    pub set_start: Option<NaiveDate>,

    /// Set the end to DATE, keeping the start.
    #[arg(long, value_name = "DATE")]
    pub set_end: Option<NaiveDate>,

    /// Set the duration in days, keeping the start.
    #[arg(long, value_name = "DAYS")]
    pub duration: Option<u32>,

    /// Apply an accepted move to the loaded plan and print the result.
    #[arg(long)]
    pub apply: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GANTT_CASCADE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the plan, but don't move anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// The single change requested on the command line.
    pub fn move_request(&self) -> Result<MoveRequest, String> {
        let requested: Vec<MoveRequest> = [
            self.shift_start.map(MoveRequest::ShiftStart),
            self.shift_end.map(MoveRequest::ShiftEnd),
            self.set_start.map(MoveRequest::SetStart),
            self.set_end.map(MoveRequest::SetEnd),
            self.duration.map(MoveRequest::SetDuration),
        ]
        .into_iter()
        .flatten()
        .collect();

        match requested.as_slice() {
            [request] => Ok(*request),
            [] => Err("one of --shift-start, --shift-end, --set-start, --set-end or --duration is required".to_string()),
            _ => Err("only one change may be requested per move".to_string()),
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

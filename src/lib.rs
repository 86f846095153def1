// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod model;
pub mod repo;
pub mod scheduler;
pub mod types;

use std::sync::Arc;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{PlanFile, load_and_validate};
use crate::errors::{CascadeError, Result};
use crate::model::{MoveResult, Task};
use crate::repo::{InMemoryTaskRepository, TaskRepository};
use crate::scheduler::Scheduler;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - plan loading and validation
/// - the committed in-memory repository
/// - the scheduler and the requested move
/// - optional commit of the accepted results
pub async fn run(args: CliArgs) -> Result<()> {
    let plan = load_and_validate(&args.plan)?;
    let repo = InMemoryTaskRepository::from_plan(&plan)?;

    if args.dry_run {
        print_dry_run(&plan, &repo);
        return Ok(());
    }

    let task_id = args
        .task
        .ok_or_else(|| CascadeError::ConfigError("--task is required unless --dry-run is given".to_string()))?;
    let request = args.move_request().map_err(CascadeError::ConfigError)?;

    let repo = Arc::new(repo);
    let scheduler = Scheduler::with_options(Arc::clone(&repo), plan.scheduler().options());

    info!(task = task_id, ?request, "moving task");

    let results = match engine::run_move(&scheduler, task_id, request).await {
        Ok(results) => results,
        Err(err) => {
            if let Some(rejection) = err.rejection() {
                println!("move rejected: {}", rejection.explanation());
            }
            return Err(err);
        }
    };

    print_results(&results);

    if args.apply {
        let mut committed = InMemoryTaskRepository::clone(&repo);
        committed.apply(&results)?;
        println!();
        println!("plan after move:");
        print_hierarchy(&committed);
    }

    Ok(())
}

fn print_results(results: &[MoveResult]) {
    if results.is_empty() {
        println!("move accepted: no task needs to change");
        return;
    }

    println!("move accepted: {} task(s) change", results.len());
    for result in results {
        println!(
            "  - {}: {} -> {} ({} days)",
            result.task.label(),
            result.task.start(),
            result.task.end(),
            result.task.duration()
        );
    }
}

/// Every task, roots first, each followed by its descendants.
fn print_hierarchy(repo: &InMemoryTaskRepository) {
    for root in repo.roots() {
        print_task_line(repo, root);
        for child in repo.all_children(root.id) {
            print_task_line(repo, &child);
        }
    }
}

fn print_task_line(repo: &InMemoryTaskRepository, task: &Task) {
    let indent = "  ".repeat(depth_of(repo, task) + 1);
    print!(
        "{indent}{} {} -> {} ({} days)",
        task.label(),
        task.start(),
        task.end(),
        task.duration()
    );
    if let Some(constraint) = task.constraint {
        print!(" [{} {}]", constraint.constraint_type, constraint.date);
    }
    println!();
}

fn depth_of(repo: &InMemoryTaskRepository, task: &Task) -> usize {
    let mut depth = 0;
    let mut current = repo.get_parent(task.id);
    while let Some(parent) = current {
        depth += 1;
        current = repo.get_parent(parent.id);
    }
    depth
}

/// Simple dry-run output: print the task tree and dependencies.
fn print_dry_run(plan: &PlanFile, repo: &InMemoryTaskRepository) {
    println!("gantt-cascade dry-run");
    println!("  scheduler.fan_out = {:?}", plan.scheduler().fan_out);
    println!("  scheduler.max_depth = {}", plan.scheduler().max_depth);
    println!();

    println!("tasks ({}):", repo.len());
    print_hierarchy(repo);

    let dependencies: Vec<_> = repo.dependencies().collect();
    println!();
    println!("dependencies ({}):", dependencies.len());
    for dep in dependencies {
        println!(
            "  - {} -> {} ({:?})",
            dep.predecessor_id, dep.successor_id, dep.dependency_type
        );
    }

    debug!("dry-run complete (nothing moved)");
}

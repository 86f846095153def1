// tests/cascade.rs

use std::collections::HashSet;
use std::error::Error;
use std::sync::Arc;

use gantt_cascade::engine::{run_move, MoveRequest};
use gantt_cascade::errors::CascadeError;
use gantt_cascade::model::{Dependency, MoveResult, Schedule, Task};
use gantt_cascade::repo::{InMemoryTaskRepository, TaskRepository};
use gantt_cascade::scheduler::Scheduler;
use gantt_cascade::types::{Anchor, ConstraintType, DependencyType, FanOut, MoveSender};
use gantt_cascade_test_utils::builders::{PlanBuilder, TaskBuilder};
use gantt_cascade_test_utils::{day, init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

const A: u64 = 1;
const B: u64 = 2;
const C: u64 = 3;
const D: u64 = 4;

fn ids(results: &[MoveResult]) -> Vec<u64> {
    results.iter().map(|r| r.task.id).collect()
}

fn span(result: &MoveResult) -> (chrono::NaiveDate, chrono::NaiveDate) {
    (result.task.start(), result.task.end())
}

/// A (day 0, 5 days) --FS--> B (day 3, 2 days).
fn overlapping_pair() -> PlanBuilder {
    PlanBuilder::new()
        .with_task(TaskBuilder::new(A, 0, 5).build())
        .with_task(TaskBuilder::new(B, 3, 2).build())
        .after(A, B)
}

/// A -> B and A -> C, both successors starting when A ends.
fn fan(c_constraint: Option<(ConstraintType, i64)>) -> PlanBuilder {
    let mut c = TaskBuilder::new(C, 5, 3);
    if let Some((constraint_type, on)) = c_constraint {
        c = c.constraint(constraint_type, on);
    }
    PlanBuilder::new()
        .with_task(TaskBuilder::new(A, 0, 5).build())
        .with_task(TaskBuilder::new(B, 5, 2).build())
        .with_task(c.build())
        .after(A, B)
        .after(A, C)
}

/// A -> B, A -> C, B -> D, C -> D with D far too early.
fn diamond() -> PlanBuilder {
    PlanBuilder::new()
        .with_task(TaskBuilder::new(A, 0, 5).build())
        .with_task(TaskBuilder::new(B, 5, 2).build())
        .with_task(TaskBuilder::new(C, 5, 3).build())
        .with_task(TaskBuilder::new(D, 0, 1).build())
        .after(A, B)
        .after(A, C)
        .after(B, D)
        .after(C, D)
}

#[tokio::test]
async fn test_moving_predecessor_pushes_successor() -> TestResult {
    init_tracing();
    let (_repo, scheduler) = overlapping_pair().build_scheduler();

    let results = with_timeout(run_move(&scheduler, A, MoveRequest::ShiftEnd(day(7)))).await?;

    assert_eq!(ids(&results), vec![B, A]);
    assert!(results.iter().all(|r| r.valid));
    assert_eq!(span(&results[0]), (day(7), day(9)));
    assert_eq!(span(&results[1]), (day(2), day(7)));
    Ok(())
}

#[tokio::test]
async fn test_constrained_successor_rejects_whole_move() {
    init_tracing();
    let (repo, scheduler) = PlanBuilder::new()
        .with_task(TaskBuilder::new(A, 0, 5).build())
        .with_task(TaskBuilder::new(B, 3, 2).constraint(ConstraintType::MustStartOn, 3).build())
        .after(A, B)
        .build_scheduler();

    let err = run_move(&scheduler, A, MoveRequest::ShiftEnd(day(7)))
        .await
        .unwrap_err();

    let rejection = err.rejection().expect("expected a constraint violation");
    assert_eq!(rejection.task.id, B);
    assert!(!rejection.valid);
    assert!(rejection.explanation().contains("must start on"));
    assert!(rejection.explanation().contains(&day(3).to_string()));

    // Nothing was committed.
    assert_eq!(repo.get(A).unwrap().end(), day(5));
    assert_eq!(repo.get(B).unwrap().start(), day(3));
}

#[tokio::test]
async fn test_user_move_violating_own_constraint_is_rejected() {
    let (_repo, scheduler) = PlanBuilder::new()
        .with_task(TaskBuilder::new(A, 4, 5).constraint(ConstraintType::MustStartAfter, 2).build())
        .build_scheduler();

    let err = run_move(&scheduler, A, MoveRequest::ShiftStart(day(1)))
        .await
        .unwrap_err();

    assert_eq!(err.rejection().map(|r| r.task.id), Some(A));
}

#[tokio::test]
async fn test_task_without_predecessors_is_not_moved_by_cascade() -> TestResult {
    let (repo, scheduler) = overlapping_pair().build_scheduler();
    let a = repo.get(A).unwrap();
    let proposed = a.with_schedule(Schedule::anchored(day(9), 5, Anchor::Start).unwrap());

    let results = scheduler
        .move_task(proposed, Vec::new(), MoveSender::Predecessor)
        .await?;

    assert!(results.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unchanged_user_move_yields_nothing() -> TestResult {
    let (repo, scheduler) = overlapping_pair().build_scheduler();
    let a = repo.get(A).unwrap();

    let results = scheduler.move_task(a, Vec::new(), MoveSender::User).await?;

    assert!(results.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_second_run_after_apply_is_empty() -> TestResult {
    let (repo, scheduler) = overlapping_pair().build_scheduler();
    let results = run_move(&scheduler, A, MoveRequest::ShiftEnd(day(7))).await?;

    let mut committed = InMemoryTaskRepository::clone(&repo);
    committed.apply(&results)?;
    let committed = Arc::new(committed);
    let rerun = Scheduler::new(Arc::clone(&committed));

    let a = committed.get(A).unwrap();
    assert!(rerun.move_task(a, Vec::new(), MoveSender::User).await?.is_empty());

    let b = committed.get(B).unwrap();
    assert!(rerun.move_task(b, Vec::new(), MoveSender::Predecessor).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_chain_orders_deepest_first() -> TestResult {
    let (_repo, scheduler) = PlanBuilder::new()
        .with_task(TaskBuilder::new(A, 0, 5).build())
        .with_task(TaskBuilder::new(B, 5, 2).build())
        .with_task(TaskBuilder::new(C, 7, 1).build())
        .after(A, B)
        .after(B, C)
        .build_scheduler();

    let results = run_move(&scheduler, A, MoveRequest::ShiftStart(day(2))).await?;

    assert_eq!(ids(&results), vec![C, B, A]);
    assert_eq!(span(&results[0]), (day(9), day(10)));
    assert_eq!(span(&results[1]), (day(7), day(9)));
    assert_eq!(span(&results[2]), (day(2), day(7)));
    Ok(())
}

#[tokio::test]
async fn test_fan_out_keeps_successor_order() -> TestResult {
    for mode in [FanOut::Parallel, FanOut::Sequential] {
        let (_repo, scheduler) = fan(None).fan_out(mode).build_scheduler();

        let results = run_move(&scheduler, A, MoveRequest::ShiftEnd(day(7))).await?;

        assert_eq!(ids(&results), vec![B, C, A], "fan_out = {mode:?}");
        assert_eq!(results[0].task.start(), day(7));
        assert_eq!(results[1].task.start(), day(7));
    }
    Ok(())
}

#[tokio::test]
async fn test_sibling_violation_fails_fast_in_both_modes() {
    for mode in [FanOut::Parallel, FanOut::Sequential] {
        let (_repo, scheduler) = fan(Some((ConstraintType::MustStartOn, 5)))
            .fan_out(mode)
            .build_scheduler();

        let err = run_move(&scheduler, A, MoveRequest::ShiftEnd(day(7)))
            .await
            .unwrap_err();

        assert_eq!(
            err.rejection().map(|r| r.task.id),
            Some(C),
            "fan_out = {mode:?}"
        );
    }
}

/// Commit `results` and re-evaluate every task as if a predecessor had just
/// moved; returns whatever would still have to change.
async fn leftover_after_commit(
    repo: &InMemoryTaskRepository,
    results: &[MoveResult],
) -> Result<Vec<MoveResult>, CascadeError> {
    let mut committed = repo.clone();
    committed.apply(results)?;
    let committed = Arc::new(committed);
    let rerun = Scheduler::new(Arc::clone(&committed));

    let mut leftover = Vec::new();
    for task in committed.tasks() {
        leftover.extend(
            rerun
                .move_task(task.clone(), Vec::new(), MoveSender::Predecessor)
                .await?,
        );
    }
    Ok(leftover)
}

#[tokio::test]
async fn test_diamond_reports_each_task_once() -> TestResult {
    for mode in [FanOut::Parallel, FanOut::Sequential] {
        let (repo, scheduler) = diamond().fan_out(mode).build_scheduler();

        let results = run_move(&scheduler, A, MoveRequest::ShiftEnd(day(7))).await?;

        let unique: HashSet<u64> = ids(&results).into_iter().collect();
        assert_eq!(unique.len(), results.len());
        assert_eq!(ids(&results), vec![D, B, C, A], "fan_out = {mode:?}");
        assert_eq!(span(&results[1]), (day(7), day(9)));
        assert_eq!(span(&results[2]), (day(7), day(10)));
        // Earliest of B's and C's new ends.
        assert_eq!(span(&results[0]), (day(9), day(10)));

        let leftover = leftover_after_commit(&repo, &results).await?;
        assert!(leftover.is_empty(), "moved again after commit: {leftover:?}");
    }
    Ok(())
}

#[tokio::test]
async fn test_shared_successor_sees_both_moved_predecessors() -> TestResult {
    // D already clears both old ends (7 and 8) but not the new ones (9 and 10).
    let (repo, scheduler) = PlanBuilder::new()
        .with_task(TaskBuilder::new(A, 0, 5).build())
        .with_task(TaskBuilder::new(B, 5, 2).build())
        .with_task(TaskBuilder::new(C, 5, 3).build())
        .with_task(TaskBuilder::new(D, 8, 1).build())
        .after(A, B)
        .after(A, C)
        .after(B, D)
        .after(C, D)
        .build_scheduler();

    let results = run_move(&scheduler, A, MoveRequest::ShiftEnd(day(7))).await?;

    assert_eq!(ids(&results), vec![D, B, C, A]);
    assert_eq!(span(&results[0]), (day(9), day(10)));
    assert!(leftover_after_commit(&repo, &results).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_join_is_placed_after_all_its_predecessors() -> TestResult {
    // A -> C is declared before A -> B -> C; C still comes after B.
    let (repo, scheduler) = PlanBuilder::new()
        .with_task(TaskBuilder::new(A, 0, 5).build())
        .with_task(TaskBuilder::new(B, 5, 2).build())
        .with_task(TaskBuilder::new(C, 0, 1).build())
        .after(A, C)
        .after(A, B)
        .after(B, C)
        .build_scheduler();

    let results = run_move(&scheduler, A, MoveRequest::ShiftEnd(day(7))).await?;

    assert_eq!(ids(&results), vec![C, B, A]);
    // Earliest of A's and B's new ends.
    assert_eq!(span(&results[0]), (day(7), day(8)));
    assert!(leftover_after_commit(&repo, &results).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_sequential_and_parallel_agree() -> TestResult {
    let (_repo, parallel) = diamond().fan_out(FanOut::Parallel).build_scheduler();
    let (_repo, sequential) = diamond().fan_out(FanOut::Sequential).build_scheduler();

    let request = MoveRequest::ShiftEnd(day(7));
    let left = run_move(&parallel, A, request).await?;
    let right = run_move(&sequential, A, request).await?;

    assert_eq!(left, right);
    Ok(())
}

#[tokio::test]
async fn test_satisfied_successor_stays_put() -> TestResult {
    let (_repo, scheduler) = PlanBuilder::new()
        .with_task(TaskBuilder::new(A, 0, 5).build())
        .with_task(TaskBuilder::new(B, 10, 2).build())
        .after(A, B)
        .build_scheduler();

    let results = run_move(&scheduler, A, MoveRequest::ShiftEnd(day(7))).await?;

    assert_eq!(ids(&results), vec![A]);
    Ok(())
}

#[tokio::test]
async fn test_earliest_predecessor_decides_start_bound() -> TestResult {
    // Two finish-start predecessors: the earlier one already allows B's start.
    let (_repo, scheduler) = PlanBuilder::new()
        .with_task(TaskBuilder::new(A, 0, 3).build())
        .with_task(TaskBuilder::new(C, 0, 8).build())
        .with_task(TaskBuilder::new(B, 4, 2).build())
        .after(A, B)
        .after(C, B)
        .build_scheduler();

    let results = run_move(&scheduler, C, MoveRequest::ShiftEnd(day(10))).await?;

    assert_eq!(ids(&results), vec![C]);
    Ok(())
}

#[tokio::test]
async fn test_user_move_is_pushed_back_by_predecessor() -> TestResult {
    let (_repo, scheduler) = PlanBuilder::new()
        .with_task(TaskBuilder::new(A, 0, 5).build())
        .with_task(TaskBuilder::new(B, 5, 2).build())
        .after(A, B)
        .build_scheduler();

    // 3..7 would start before A ends; keep the new duration, start at 5.
    let results = run_move(&scheduler, B, MoveRequest::SetStart(day(3))).await?;

    assert_eq!(ids(&results), vec![B]);
    assert_eq!(span(&results[0]), (day(5), day(9)));
    Ok(())
}

#[tokio::test]
async fn test_finish_finish_bounds_successor_end() -> TestResult {
    let (_repo, scheduler) = PlanBuilder::new()
        .with_task(TaskBuilder::new(A, 0, 5).build())
        .with_task(TaskBuilder::new(B, 0, 2).build())
        .depends(A, B, DependencyType::FinishFinish)
        .build_scheduler();

    let results = run_move(&scheduler, A, MoveRequest::ShiftEnd(day(9))).await?;

    assert_eq!(ids(&results), vec![B, A]);
    assert_eq!(span(&results[0]), (day(7), day(9)));
    Ok(())
}

#[tokio::test]
async fn test_start_finish_reads_predecessor_start() -> TestResult {
    let (_repo, scheduler) = PlanBuilder::new()
        .with_task(TaskBuilder::new(A, 0, 5).build())
        .with_task(TaskBuilder::new(B, 0, 2).build())
        .depends(A, B, DependencyType::StartFinish)
        .build_scheduler();

    let results = run_move(&scheduler, A, MoveRequest::ShiftStart(day(6))).await?;

    assert_eq!(ids(&results), vec![B, A]);
    assert_eq!(span(&results[0]), (day(4), day(6)));
    Ok(())
}

#[tokio::test]
async fn test_start_start_reads_predecessor_end() -> TestResult {
    let (_repo, scheduler) = PlanBuilder::new()
        .with_task(TaskBuilder::new(A, 0, 5).build())
        .with_task(TaskBuilder::new(B, 5, 2).build())
        .depends(A, B, DependencyType::StartStart)
        .build_scheduler();

    let results = run_move(&scheduler, A, MoveRequest::ShiftEnd(day(8))).await?;

    assert_eq!(ids(&results), vec![B, A]);
    assert_eq!(results[0].task.start(), day(8));
    Ok(())
}

#[tokio::test]
async fn test_accumulator_is_visible_and_returned_last() -> TestResult {
    let (repo, scheduler) = overlapping_pair().build_scheduler();

    let a = repo.get(A).unwrap();
    let earlier = vec![MoveResult::accepted(
        a.with_schedule(Schedule::anchored(day(7), 5, Anchor::End).unwrap()),
    )];
    let b = repo.get(B).unwrap();

    let results = scheduler
        .move_task(b, earlier.clone(), MoveSender::Predecessor)
        .await?;

    assert_eq!(ids(&results), vec![B, A]);
    assert_eq!(span(&results[0]), (day(7), day(9)));
    assert_eq!(results[1], earlier[0]);
    Ok(())
}

#[tokio::test]
async fn test_cycle_in_store_is_reported() -> TestResult {
    let mut repo = PlanBuilder::new()
        .with_task(TaskBuilder::new(A, 0, 5).build())
        .with_task(TaskBuilder::new(B, 5, 5).build())
        .after(A, B)
        .build_repo();
    // The store itself does not check for cycles; plan validation does.
    repo.add_dependency(Dependency::finish_start(B, A))?;
    let scheduler = Scheduler::new(Arc::new(repo));

    let err = with_timeout(run_move(&scheduler, A, MoveRequest::ShiftEnd(day(7))))
        .await
        .unwrap_err();

    assert!(matches!(err, CascadeError::DependencyCycle(_)), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn test_depth_limit_stops_long_chains() {
    let (_repo, scheduler) = PlanBuilder::new()
        .with_task(TaskBuilder::new(A, 0, 5).build())
        .with_task(TaskBuilder::new(B, 5, 1).build())
        .with_task(TaskBuilder::new(C, 6, 1).build())
        .with_task(TaskBuilder::new(D, 7, 1).build())
        .after(A, B)
        .after(B, C)
        .after(C, D)
        .max_depth(2)
        .build_scheduler();

    let err = run_move(&scheduler, A, MoveRequest::ShiftStart(day(3)))
        .await
        .unwrap_err();

    assert!(matches!(err, CascadeError::DepthExceeded(2)), "got {err:?}");
}

#[tokio::test]
async fn test_unknown_task_is_reported() {
    let (_repo, scheduler) = overlapping_pair().build_scheduler();

    let err = run_move(&scheduler, 99, MoveRequest::ShiftStart(day(1)))
        .await
        .unwrap_err();

    assert!(matches!(err, CascadeError::TaskNotFound(99)));
}

#[tokio::test]
async fn test_degenerate_request_is_refused_before_cascading() {
    let (_repo, scheduler) = overlapping_pair().build_scheduler();

    let err = run_move(&scheduler, A, MoveRequest::SetDuration(0))
        .await
        .unwrap_err();
    assert!(matches!(err, CascadeError::InvalidInterval(_)));

    let err = run_move(&scheduler, A, MoveRequest::SetEnd(day(0)))
        .await
        .unwrap_err();
    assert!(matches!(err, CascadeError::InvalidInterval(_)));
}

#[test]
fn test_proposed_task_keeps_identity() {
    let repo = overlapping_pair().build_repo();
    let proposed: Task = gantt_cascade::engine::propose(&repo, B, MoveRequest::SetDuration(4)).unwrap();
    assert_eq!(proposed.id, B);
    assert_eq!(proposed.name, "task_2");
    assert_eq!((proposed.start(), proposed.end()), (day(3), day(7)));
}

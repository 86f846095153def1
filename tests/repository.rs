use gantt_cascade::errors::CascadeError;
use gantt_cascade::model::{Dependency, MoveResult, Schedule, Task};
use gantt_cascade::repo::{InMemoryTaskRepository, TaskRepository};
use gantt_cascade::types::{Anchor, DependencyType};
use gantt_cascade_test_utils::builders::{PlanBuilder, TaskBuilder};
use gantt_cascade_test_utils::day;

// Hierarchy (file order 1..=6):
//   1
//   +-- 2
//   |   +-- 3
//   |   +-- 5
//   +-- 4
//   6
fn hierarchy() -> InMemoryTaskRepository {
    PlanBuilder::new()
        .with_task(TaskBuilder::new(1, 0, 10).name("Project").build())
        .with_task(TaskBuilder::new(2, 0, 5).parent(1).build())
        .with_task(TaskBuilder::new(3, 0, 2).parent(2).build())
        .with_task(TaskBuilder::new(4, 5, 5).parent(1).build())
        .with_task(TaskBuilder::new(5, 2, 3).parent(2).build())
        .with_task(TaskBuilder::new(6, 0, 1).build())
        .after(3, 4)
        .depends(5, 4, DependencyType::StartStart)
        .build_repo()
}

fn ids(tasks: impl Iterator<Item = Task>) -> Vec<u64> {
    tasks.map(|t| t.id).collect()
}

#[test]
fn test_get_returns_committed_task() {
    let repo = hierarchy();
    let task = repo.get(1).unwrap();
    assert_eq!(task.name, "Project");
    assert_eq!((task.start(), task.end()), (day(0), day(10)));
    assert!(repo.get(42).is_none());
}

#[test]
fn test_children_are_direct_and_in_storage_order() {
    let repo = hierarchy();
    assert_eq!(ids(repo.children(1)), vec![2, 4]);
    assert_eq!(ids(repo.children(2)), vec![3, 5]);
    assert!(ids(repo.children(3)).is_empty());
    assert!(ids(repo.children(42)).is_empty());
}

#[test]
fn test_all_children_is_depth_first_parent_before_descendants() {
    let repo = hierarchy();
    assert_eq!(ids(repo.all_children(1)), vec![2, 3, 5, 4]);
    assert_eq!(ids(repo.all_children(2)), vec![3, 5]);
    assert!(ids(repo.all_children(6)).is_empty());
}

#[test]
fn test_all_children_can_be_iterated_again_on_unchanged_store() {
    let repo = hierarchy();
    let first = ids(repo.all_children(1));
    let second = ids(repo.all_children(1));
    assert_eq!(first, second);
}

#[test]
fn test_all_children_is_lazy() {
    let repo = hierarchy();
    let mut walk = repo.all_children(1);
    assert_eq!(walk.next().map(|t| t.id), Some(2));
    assert_eq!(walk.next().map(|t| t.id), Some(3));
}

#[test]
fn test_get_parent_follows_back_reference() {
    let repo = hierarchy();
    assert_eq!(repo.get_parent(3).map(|t| t.id), Some(2));
    assert_eq!(repo.get_parent(2).map(|t| t.id), Some(1));
    assert!(repo.get_parent(1).is_none());
    assert!(repo.get_parent(42).is_none());
}

#[test]
fn test_display_children_mirror_hierarchy() {
    let repo = hierarchy();
    assert_eq!(repo.get(1).unwrap().children, vec![2, 4]);
    assert!(repo.get(6).unwrap().children.is_empty());
}

#[test]
fn test_roots_are_tasks_without_parent() {
    let repo = hierarchy();
    let roots: Vec<u64> = repo.roots().map(|t| t.id).collect();
    assert_eq!(roots, vec![1, 6]);
}

#[test]
fn test_dependency_queries() {
    let repo = hierarchy();

    let successors: Vec<Dependency> = repo.successor_dependencies(3).collect();
    assert_eq!(successors, vec![Dependency::finish_start(3, 4)]);

    let predecessors: Vec<Dependency> = repo.predecessor_dependencies(4).collect();
    assert_eq!(
        predecessors,
        vec![
            Dependency::finish_start(3, 4),
            Dependency::new(5, 4, DependencyType::StartStart),
        ]
    );

    assert_eq!(repo.predecessor_dependencies(1).count(), 0);
    assert_eq!(repo.dependencies().count(), 2);
}

#[test]
fn test_add_dependency_requires_known_endpoints() {
    let mut repo = hierarchy();
    let err = repo.add_dependency(Dependency::finish_start(1, 99)).unwrap_err();
    assert!(matches!(err, CascadeError::TaskNotFound(99)));
}

#[test]
fn test_insert_replaces_in_place() {
    let mut repo = hierarchy();
    let renamed = Task::new(2, "Renamed", Schedule::anchored(day(1), 1, Anchor::Start).unwrap()).with_parent(1);
    repo.insert(renamed);

    assert_eq!(repo.len(), 6);
    assert_eq!(repo.get(2).unwrap().name, "Renamed");
    assert_eq!(ids(repo.children(1)), vec![2, 4]);
    assert_eq!(ids(repo.children(2)), vec![3, 5]);
}

#[test]
fn test_apply_uses_first_result_per_task() {
    let mut repo = hierarchy();
    let task = repo.get(6).unwrap();
    let decided = MoveResult::accepted(task.with_schedule(Schedule::anchored(day(3), 1, Anchor::Start).unwrap()));
    let stale = MoveResult::accepted(task.with_schedule(Schedule::anchored(day(9), 1, Anchor::Start).unwrap()));

    let applied = repo.apply(&[decided, stale]).unwrap();

    assert_eq!(applied, 1);
    assert_eq!(repo.get(6).unwrap().start(), day(3));
}

#[test]
fn test_apply_refuses_rejected_lists_without_writing() {
    let mut repo = hierarchy();
    let task6 = repo.get(6).unwrap();
    let task3 = repo.get(3).unwrap();

    let ok = MoveResult::accepted(task6.with_schedule(Schedule::anchored(day(3), 1, Anchor::Start).unwrap()));
    let bad = MoveResult::rejected(task3.with_schedule(Schedule::anchored(day(9), 2, Anchor::Start).unwrap()), "nope");

    let err = repo.apply(&[ok, bad]).unwrap_err();
    assert!(matches!(err, CascadeError::ConstraintViolation(_)));
    assert_eq!(repo.get(6).unwrap().start(), day(0));
}

#[test]
fn test_apply_refuses_unknown_tasks() {
    let mut repo = hierarchy();
    let ghost = Task::new(99, "Ghost", Schedule::anchored(day(0), 1, Anchor::Start).unwrap());
    let err = repo.apply(&[MoveResult::accepted(ghost)]).unwrap_err();
    assert!(matches!(err, CascadeError::TaskNotFound(99)));
}

// src/repo/memory.rs

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::config::PlanFile;
use crate::errors::{CascadeError, Result};
use crate::model::{Dependency, MoveResult, Task, TaskId};
use crate::repo::{DependencyIter, TaskIter, TaskRepository};

/// Internal node structure: the task plus its adjacency lists.
#[derive(Debug, Clone)]
struct TaskNode {
    task: Task,
    /// Direct children in storage order.
    children: Vec<TaskId>,
    /// Edges where this task is the successor.
    predecessors: Vec<Dependency>,
    /// Edges where this task is the predecessor.
    successors: Vec<Dependency>,
}

impl TaskNode {
    fn new(task: Task) -> Self {
        Self {
            task,
            children: Vec::new(),
            predecessors: Vec::new(),
            successors: Vec::new(),
        }
    }
}

/// Committed plan state held in memory.
///
/// Stands in for the persistent store: the cascade only ever reads it through
/// [`TaskRepository`], and accepted moves are written back with
/// [`InMemoryTaskRepository::apply`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    nodes: HashMap<TaskId, TaskNode>,
    /// Insertion order; defines storage order for every query.
    order: Vec<TaskId>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the store from a validated [`PlanFile`].
    ///
    /// Assumes that:
    /// - ids are unique and every reference is known
    /// - the dependency graph has no cycles
    pub fn from_plan(plan: &PlanFile) -> Result<Self> {
        let mut repo = Self::new();

        // First pass: create nodes in file order.
        for tc in plan.tasks().iter() {
            repo.insert_node(tc.to_task()?);
        }

        // Second pass: children lists from parent back-references.
        repo.relink_children();

        for dc in plan.dependencies().iter() {
            repo.add_dependency(dc.to_dependency())?;
        }

        debug!(
            tasks = repo.order.len(),
            dependencies = plan.dependencies().len(),
            "built in-memory task repository from plan"
        );
        Ok(repo)
    }

    /// Insert or replace a task. A replaced task keeps its storage position.
    pub fn insert(&mut self, task: Task) {
        self.insert_node(task);
        self.relink_children();
    }

    /// Add an edge. Both endpoints must already exist. Acyclicity is the
    /// plan validator's job and is not checked here.
    pub fn add_dependency(&mut self, dependency: Dependency) -> Result<()> {
        for endpoint in [dependency.predecessor_id, dependency.successor_id] {
            if !self.nodes.contains_key(&endpoint) {
                return Err(CascadeError::TaskNotFound(endpoint));
            }
        }

        if let Some(node) = self.nodes.get_mut(&dependency.predecessor_id) {
            node.successors.push(dependency);
        }
        if let Some(node) = self.nodes.get_mut(&dependency.successor_id) {
            node.predecessors.push(dependency);
        }
        Ok(())
    }

    /// All tasks in storage order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.order
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(|node| &node.task)
    }

    /// Tasks without a parent, in storage order.
    pub fn roots(&self) -> impl Iterator<Item = &Task> {
        self.tasks().filter(|t| t.parent_id.is_none())
    }

    /// Every edge, grouped by predecessor in storage order.
    pub fn dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.order
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .flat_map(|node| node.successors.iter())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Commit an accepted cascade.
    ///
    /// Nothing is written unless every result is valid and refers to a known
    /// task. For each id only the first result in the list is applied, since
    /// that one reflects the final decided placement. Returns the number of
    /// tasks updated.
    pub fn apply(&mut self, results: &[MoveResult]) -> Result<usize> {
        if let Some(rejected) = results.iter().find(|r| !r.valid) {
            return Err(CascadeError::ConstraintViolation(Box::new(rejected.clone())));
        }
        if let Some(unknown) = results.iter().find(|r| !self.nodes.contains_key(&r.task.id)) {
            return Err(CascadeError::TaskNotFound(unknown.task.id));
        }

        let mut seen = HashSet::new();
        let mut applied = 0;
        for result in results.iter() {
            if !seen.insert(result.task.id) {
                continue;
            }
            if let Some(node) = self.nodes.get_mut(&result.task.id) {
                *node.task.schedule_mut() = *result.task.schedule();
                applied += 1;
                debug!(
                    task = result.task.id,
                    start = %result.task.start(),
                    end = %result.task.end(),
                    "applied move"
                );
            }
        }

        info!(applied, "committed cascade results");
        Ok(applied)
    }

    fn insert_node(&mut self, task: Task) {
        let id = task.id;
        match self.nodes.get_mut(&id) {
            Some(node) => node.task = task,
            None => {
                self.nodes.insert(id, TaskNode::new(task));
                self.order.push(id);
            }
        }
    }

    fn relink_children(&mut self) {
        for node in self.nodes.values_mut() {
            node.children.clear();
        }

        // clone to avoid borrowing issues while mutating
        let order = self.order.clone();
        for id in order {
            let parent = self.nodes.get(&id).and_then(|n| n.task.parent_id);
            if let Some(parent_node) = parent.and_then(|p| self.nodes.get_mut(&p)) {
                parent_node.children.push(id);
            }
        }

        for node in self.nodes.values_mut() {
            node.task.children = node.children.clone();
        }
    }
}

impl TaskRepository for InMemoryTaskRepository {
    fn get(&self, id: TaskId) -> Option<Task> {
        self.nodes.get(&id).map(|node| node.task.clone())
    }

    fn children(&self, id: TaskId) -> TaskIter<'_> {
        let ids: &[TaskId] = self
            .nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[]);
        Box::new(
            ids.iter()
                .filter_map(move |child| self.nodes.get(child))
                .map(|node| node.task.clone()),
        )
    }

    fn successor_dependencies(&self, id: TaskId) -> DependencyIter<'_> {
        let edges: &[Dependency] = self
            .nodes
            .get(&id)
            .map(|n| n.successors.as_slice())
            .unwrap_or(&[]);
        Box::new(edges.iter().copied())
    }

    fn predecessor_dependencies(&self, id: TaskId) -> DependencyIter<'_> {
        let edges: &[Dependency] = self
            .nodes
            .get(&id)
            .map(|n| n.predecessors.as_slice())
            .unwrap_or(&[]);
        Box::new(edges.iter().copied())
    }
}

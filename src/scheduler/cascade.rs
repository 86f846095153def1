// src/scheduler/cascade.rs

//! Move propagation.
//!
//! The moved task is placed first. Every task reachable from it through
//! successor edges is then layered by its longest path from the moved task,
//! so each edge points into a strictly deeper layer. Layers are settled in
//! order against one copy-on-write overlay holding every decision so far:
//! by the time a task is placed, all of its reachable predecessors are
//! final. Tasks within a layer are independent and may be placed
//! concurrently.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use anyhow::anyhow;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::errors::{CascadeError, Result};
use crate::model::{Dependency, MoveResult, Schedule, Task, TaskId};
use crate::repo::{TaskRepository, VolatileTaskRepository};
use crate::scheduler::bounds::Bounds;
use crate::scheduler::check::check_constraint;
use crate::scheduler::Scheduler;
use crate::types::{Anchor, FanOut, MoveSender};

impl<R: TaskRepository + ?Sized + 'static> Scheduler<R> {
    /// Propagate a move of `task` through its successors.
    ///
    /// `accumulator` holds results already decided for this move (newest
    /// first); they are visible to the cascade through the overlay and are
    /// returned at the tail of the output. On success the list holds one
    /// result per changed task, deepest descendants first, with `task`'s own
    /// result after the results it caused. Nothing is committed; apply the
    /// list yourself.
    ///
    /// With `MoveSender::User`, `task` is the caller's proposed placement and
    /// yields a result whenever it differs from the current one. With
    /// `MoveSender::Predecessor`, `task` only moves if a predecessor bound
    /// forces it to.
    ///
    /// Any constraint violation in the cascade rejects the whole move with
    /// [`CascadeError::ConstraintViolation`] carrying the violating result.
    pub async fn move_task(
        &self,
        task: Task,
        accumulator: Vec<MoveResult>,
        sender: MoveSender,
    ) -> Result<Vec<MoveResult>> {
        let overlay = VolatileTaskRepository::new(Arc::clone(&self.repo), Arc::new(accumulator));
        let earlier = Arc::clone(overlay.pending());

        info!(task = task.id, ?sender, fan_out = ?self.options.fan_out, "evaluating move");

        match self.cascade(task, overlay, sender).await {
            Ok(mut results) => {
                info!(changed = results.len(), "move accepted");
                results.extend(earlier.iter().cloned());
                Ok(results)
            }
            Err(err) => {
                warn!(error = %err, "move rejected");
                Err(err)
            }
        }
    }

    async fn cascade(
        &self,
        task: Task,
        overlay: VolatileTaskRepository<R>,
        sender: MoveSender,
    ) -> Result<Vec<MoveResult>> {
        let root = task.id;
        let Some(first) = self.place(&overlay, &task, sender)? else {
            return Ok(Vec::new());
        };

        let layers = self.layers(root)?;
        let mut overlay = Arc::new(overlay.with_result(first.clone()));
        let mut moved = HashSet::from([root]);
        let mut decided = vec![vec![first]];

        for (depth, layer) in layers.iter().enumerate().skip(1) {
            // Only tasks with a predecessor that moved in this cascade are
            // visited.
            let mut targets = Vec::new();
            for &id in layer {
                let pushed = self
                    .repo
                    .predecessor_dependencies(id)
                    .any(|dep| moved.contains(&dep.predecessor_id));
                if pushed {
                    targets.push(overlay.get(id).ok_or(CascadeError::TaskNotFound(id))?);
                }
            }
            if targets.is_empty() {
                continue;
            }
            if depth >= self.options.max_depth {
                return Err(CascadeError::DepthExceeded(self.options.max_depth));
            }

            debug!(depth, tasks = targets.len(), "settling layer");
            let results = match self.options.fan_out {
                FanOut::Sequential => self.settle_sequential(targets, &overlay)?,
                FanOut::Parallel => self.settle_parallel(targets, Arc::clone(&overlay)).await?,
            };
            if results.is_empty() {
                continue;
            }

            moved.extend(results.iter().map(|r| r.task.id));
            overlay = Arc::new(overlay.with_results(&results));
            decided.push(results);
        }

        Ok(decided.into_iter().rev().flatten().collect())
    }

    /// Tasks reachable from `root`, grouped by longest path from it. Layer 0
    /// is `root` alone; within a layer, tasks keep breadth-first discovery
    /// order over successor edges.
    fn layers(&self, root: TaskId) -> Result<Vec<Vec<TaskId>>> {
        let mut graph: DiGraphMap<TaskId, ()> = DiGraphMap::new();
        let mut discovered = vec![root];
        let mut queue = VecDeque::from([root]);
        graph.add_node(root);

        while let Some(id) = queue.pop_front() {
            for dep in self.repo.successor_dependencies(id) {
                let next = dep.successor_id;
                if !graph.contains_node(next) {
                    graph.add_node(next);
                    discovered.push(next);
                    queue.push_back(next);
                }
                graph.add_edge(id, next, ());
            }
        }

        let order = toposort(&graph, None).map_err(|cycle| {
            CascadeError::DependencyCycle(format!(
                "task {} is reachable from itself while cascading from task {root}",
                cycle.node_id()
            ))
        })?;

        let mut depth: HashMap<TaskId, usize> = HashMap::from([(root, 0)]);
        for id in order {
            let here = depth.get(&id).copied().unwrap_or(0);
            for next in graph.neighbors(id) {
                let slot = depth.entry(next).or_insert(0);
                *slot = (*slot).max(here + 1);
            }
        }

        let deepest = depth.values().copied().max().unwrap_or(0);
        let mut layers = vec![Vec::new(); deepest + 1];
        for id in discovered {
            layers[depth.get(&id).copied().unwrap_or(0)].push(id);
        }
        Ok(layers)
    }

    /// Decide the placement of a single task. `None` means it stays put.
    fn place(
        &self,
        overlay: &VolatileTaskRepository<R>,
        task: &Task,
        sender: MoveSender,
    ) -> Result<Option<MoveResult>> {
        let predecessors: Vec<Dependency> = overlay.predecessor_dependencies(task.id).collect();

        let proposed_by_user = match sender {
            MoveSender::User => overlay
                .get(task.id)
                .is_none_or(|current| current.schedule() != task.schedule()),
            MoveSender::Predecessor => false,
        };

        if predecessors.is_empty() && !proposed_by_user {
            debug!(task = task.id, ?sender, "no predecessors; nothing to move");
            return Ok(None);
        }

        let mut candidate = *task.schedule();
        let mut decision = None;

        if proposed_by_user {
            decision = Some(validate(task, &candidate)?);
        }

        let bounds = Bounds::collect(overlay, &predecessors)?;
        if bounds.is_empty() {
            return Ok(decision);
        }

        if let Some(min_start) = bounds.min_start {
            if candidate.start() < min_start {
                debug!(task = task.id, from = %candidate.start(), to = %min_start, "pushing start to predecessor bound");
                candidate = candidate.shifted_to(min_start, Anchor::Start)?;
                decision = Some(validate(task, &candidate)?);
            }
        }

        if let Some(max_end) = bounds.max_end {
            if candidate.end() < max_end {
                debug!(task = task.id, from = %candidate.end(), to = %max_end, "pushing end to predecessor bound");
                candidate = candidate.shifted_to(max_end, Anchor::End)?;
                decision = Some(validate(task, &candidate)?);
            }
        }

        match &decision {
            Some(result) => info!(
                task = task.id,
                start = %result.task.start(),
                end = %result.task.end(),
                "task rescheduled"
            ),
            None => debug!(task = task.id, "already satisfies predecessor bounds"),
        }

        Ok(decision)
    }

    fn settle_sequential(
        &self,
        targets: Vec<Task>,
        overlay: &VolatileTaskRepository<R>,
    ) -> Result<Vec<MoveResult>> {
        let mut results = Vec::new();
        for task in targets {
            if let Some(result) = self.place(overlay, &task, MoveSender::Predecessor)? {
                results.push(result);
            }
        }
        Ok(results)
    }

    async fn settle_parallel(
        &self,
        targets: Vec<Task>,
        overlay: Arc<VolatileTaskRepository<R>>,
    ) -> Result<Vec<MoveResult>> {
        let mut slots = vec![None; targets.len()];
        let mut set = JoinSet::new();

        for (slot, task) in targets.into_iter().enumerate() {
            let scheduler = self.clone();
            let overlay = Arc::clone(&overlay);
            set.spawn(async move {
                (slot, scheduler.place(&overlay, &task, MoveSender::Predecessor))
            });
        }

        while let Some(joined) = set.join_next().await {
            let (slot, outcome) = match joined {
                Ok(done) => done,
                Err(join_err) => {
                    set.abort_all();
                    return Err(CascadeError::Other(anyhow!(
                        "cascade branch did not complete: {join_err}"
                    )));
                }
            };

            match outcome {
                Ok(result) => slots[slot] = result,
                Err(err) => {
                    // First rejection wins; the rest of the layer is discarded.
                    set.abort_all();
                    return Err(err);
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

fn validate(task: &Task, candidate: &Schedule) -> Result<MoveResult> {
    let result = check_constraint(task, candidate);
    if result.valid {
        Ok(result)
    } else {
        warn!(task = task.id, reason = %result.explanation(), "constraint violated");
        Err(CascadeError::ConstraintViolation(Box::new(result)))
    }
}

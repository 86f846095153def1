// src/config/validate.rs

use std::collections::{HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{PlanFile, RawPlanFile};
use crate::errors::{CascadeError, Result};
use crate::model::TaskId;

impl TryFrom<RawPlanFile> for PlanFile {
    type Error = crate::errors::CascadeError;

    fn try_from(raw: RawPlanFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_plan(&raw)?;
        Ok(PlanFile::new_unchecked(raw.scheduler, raw.task, raw.dependency))
    }
}

fn validate_raw_plan(plan: &RawPlanFile) -> Result<()> {
    ensure_has_tasks(plan)?;
    validate_scheduler_section(plan)?;
    validate_task_ids(plan)?;
    validate_schedules(plan)?;
    validate_hierarchy(plan)?;
    validate_dependencies(plan)?;
    validate_dependency_dag(plan)?;
    Ok(())
}

fn ensure_has_tasks(plan: &RawPlanFile) -> Result<()> {
    if plan.task.is_empty() {
        return Err(CascadeError::ConfigError(
            "plan must contain at least one [[task]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_scheduler_section(plan: &RawPlanFile) -> Result<()> {
    if plan.scheduler.max_depth == 0 {
        return Err(CascadeError::ConfigError(
            "[scheduler].max_depth must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_task_ids(plan: &RawPlanFile) -> Result<()> {
    let mut seen = HashSet::new();
    for task in plan.task.iter() {
        if task.id == 0 {
            return Err(CascadeError::ConfigError(
                "task id 0 is reserved for \"no parent\"".to_string(),
            ));
        }
        if !seen.insert(task.id) {
            return Err(CascadeError::ConfigError(format!(
                "duplicate task id {}",
                task.id
            )));
        }
    }
    Ok(())
}

fn validate_schedules(plan: &RawPlanFile) -> Result<()> {
    for task in plan.task.iter() {
        task.schedule()?;
    }
    Ok(())
}

fn validate_hierarchy(plan: &RawPlanFile) -> Result<()> {
    let parents: HashMap<TaskId, Option<TaskId>> = plan
        .task
        .iter()
        .map(|t| (t.id, t.parent_id()))
        .collect();

    for (id, parent) in parents.iter() {
        let Some(parent) = parent else { continue };
        if !parents.contains_key(parent) {
            return Err(CascadeError::ConfigError(format!(
                "task {id} has unknown parent {parent}"
            )));
        }

        // Walk up; a hierarchy deeper than the task count must loop.
        let mut current = Some(*parent);
        let mut steps = 0;
        while let Some(ancestor) = current {
            if ancestor == *id || steps > parents.len() {
                return Err(CascadeError::ConfigError(format!(
                    "task {id} is its own ancestor"
                )));
            }
            current = parents.get(&ancestor).copied().flatten();
            steps += 1;
        }
    }
    Ok(())
}

fn validate_dependencies(plan: &RawPlanFile) -> Result<()> {
    let ids: HashSet<TaskId> = plan.task.iter().map(|t| t.id).collect();
    let mut edges = HashSet::new();

    for dep in plan.dependency.iter() {
        for endpoint in [dep.predecessor, dep.successor] {
            if !ids.contains(&endpoint) {
                return Err(CascadeError::ConfigError(format!(
                    "dependency {} -> {} references unknown task {}",
                    dep.predecessor, dep.successor, endpoint
                )));
            }
        }
        if dep.predecessor == dep.successor {
            return Err(CascadeError::ConfigError(format!(
                "task {} cannot depend on itself",
                dep.predecessor
            )));
        }
        if !edges.insert((dep.predecessor, dep.successor)) {
            return Err(CascadeError::ConfigError(format!(
                "duplicate dependency {} -> {}",
                dep.predecessor, dep.successor
            )));
        }
    }
    Ok(())
}

fn validate_dependency_dag(plan: &RawPlanFile) -> Result<()> {
    // Edge direction: predecessor -> successor.
    let mut graph: DiGraphMap<TaskId, ()> = DiGraphMap::new();

    for task in plan.task.iter() {
        graph.add_node(task.id);
    }

    for dep in plan.dependency.iter() {
        graph.add_edge(dep.predecessor, dep.successor, ());
    }

    // A topological sort will fail if there is a cycle.
    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(CascadeError::DependencyCycle(format!(
                "cycle detected in dependency graph involving task {}",
                node
            )))
        }
    }
}

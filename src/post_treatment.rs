//! BSA post-treatment: local-search improvement of a finished schedule.
//!
//! Walks processors from the one that goes idle first, and re-examines
//! each of its tasks: a task whose start exceeds its data-ready time was
//! delayed by processor contention, not by its dependencies, so it is a
//! migration candidate. Another processor takes it only when the move
//! strictly lowers the task's finish time and every successor's recorded
//! start still absorbs the new arrival. Accepted moves apply immediately
//! and later probes must beat the already-improved finish time.
//!
//! Non-regression of the makespan is a hard postcondition; a regression
//! means a defect in the search and surfaces as an error, never as a
//! usable schedule.

use crate::error::ScheduleError;
use crate::models::{comm_cost, Placement, Schedule, TaskGraph, TaskId};
use crate::timing::{compute_dft, compute_eft};

/// Processors ordered by ascending latest finish time; idle ones follow
/// in index order.
fn processor_order(graph: &TaskGraph, schedule: &Schedule) -> Vec<usize> {
    let mut used: Vec<(usize, f64)> = (0..graph.nbproc())
        .filter_map(|p| schedule.latest_finish_on(p).map(|f| (p, f)))
        .collect();
    used.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    let mut order: Vec<usize> = used.into_iter().map(|(p, _)| p).collect();
    for p in 0..graph.nbproc() {
        if !order.contains(&p) {
            order.push(p);
        }
    }
    order
}

/// Applies BSA to a complete schedule, returning the improved copy.
pub fn apply_bsa(graph: &TaskGraph, schedule: &Schedule) -> Result<Schedule, ScheduleError> {
    let exit = graph.exit_task();
    let before = schedule
        .get(exit)
        .ok_or(ScheduleError::TaskNotScheduled(exit))?
        .eft;
    let mut schedule = schedule.clone();
    for p in processor_order(graph, &schedule) {
        for t in schedule.tasks_on(p) {
            let Some(removed) = schedule.remove(t) else {
                continue;
            };
            let mut current = removed;
            let (dft, _) = compute_dft(graph, t, p, &schedule, false);
            if removed.est > dft {
                for py in (0..graph.nbproc()).filter(|&py| py != p) {
                    let (est, eft) = compute_eft(graph, t, py, &schedule, true, false);
                    if eft < current.eft && successors_feasible(graph, &schedule, t, py, eft) {
                        tracing::debug!(task = t, from = p, to = py, eft, "bsa migration");
                        current = Placement { proc: py, est, eft };
                    }
                }
            }
            schedule.assign(t, current);
        }
    }
    let after = schedule
        .get(exit)
        .ok_or(ScheduleError::TaskNotScheduled(exit))?
        .eft;
    if after > before {
        return Err(ScheduleError::PostTreatmentRegression { before, after });
    }
    Ok(schedule)
}

/// Whether every scheduled successor of `task` still starts no earlier
/// than the migrated finish plus the new communication cost.
fn successors_feasible(
    graph: &TaskGraph,
    schedule: &Schedule,
    task: TaskId,
    proc: usize,
    eft: f64,
) -> bool {
    graph.successors(task).all(|s| match schedule.get(s) {
        Some(sp) => sp.est >= eft + comm_cost(graph, task, s, proc, sp.proc),
        None => false,
    })
}

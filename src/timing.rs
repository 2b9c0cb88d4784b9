//! Earliest-time engine: data-ready time (DFT) and earliest start/finish
//! time (EST/EFT) of a task on a candidate processor, against a partial
//! schedule.
//!
//! The slot-insertion scan is deliberately first-fit at the data-ready
//! time: a gap between two committed intervals is taken only when the
//! earlier interval finishes no later than the DFT and the gap holds the
//! whole task starting exactly at the DFT. This reproduces the published
//! insertion policy, not an optimized best-fit.
//!
//! # Reference
//! Topcuoglu, Hariri & Wu (2002), "Performance-Effective and
//! Low-Complexity Task Scheduling for Heterogeneous Computing" (HEFT)

use crate::models::{comm_cost, Schedule, TaskGraph, TaskId};

/// Data-ready time of `task` on `proc`: the latest arrival over all
/// predecessors of (predecessor finish + communication cost). Also returns
/// the busy intervals already committed on `proc`, sorted by descending
/// start, as consumed by the insertion scan.
///
/// With `estimate` set, predecessors not yet scheduled are skipped — used
/// by lookahead probing against partially known futures. Without it, every
/// predecessor must already be scheduled.
pub fn compute_dft(
    graph: &TaskGraph,
    task: TaskId,
    proc: usize,
    schedule: &Schedule,
    estimate: bool,
) -> (f64, Vec<(f64, f64)>) {
    let mut dft = 0.0_f64;
    for &pred in graph.predecessors(task) {
        match schedule.get(pred) {
            Some(p) => {
                let arrival = p.eft + comm_cost(graph, pred, task, p.proc, proc);
                if arrival > dft {
                    dft = arrival;
                }
            }
            None => {
                debug_assert!(estimate, "predecessor {pred} of {task} not scheduled");
            }
        }
    }
    (dft, schedule.intervals_on(proc))
}

/// Earliest start and finish time of `task` on `proc`.
///
/// With `insertion`, scans committed intervals for a gap that fits the
/// task at its data-ready time; otherwise the task goes after the last
/// committed finish on the processor (or at the DFT on an idle one).
pub fn compute_eft(
    graph: &TaskGraph,
    task: TaskId,
    proc: usize,
    schedule: &Schedule,
    insertion: bool,
    estimate: bool,
) -> (f64, f64) {
    let (dft, on_proc) = compute_dft(graph, task, proc, schedule, estimate);
    let w = graph.cost(task, proc);
    let mut est = None;
    if insertion {
        // on_proc is sorted by descending start: [i + 1] is the earlier
        // interval of each consecutive pair.
        for pair in on_proc.windows(2) {
            let (later_start, earlier_end) = (pair[0].0, pair[1].1);
            if earlier_end <= dft && later_start - dft >= w {
                est = Some(dft);
                break;
            }
        }
    }
    let est = est.unwrap_or_else(|| {
        on_proc
            .iter()
            .map(|&(_, eft)| eft)
            .fold(f64::NEG_INFINITY, f64::max)
            .max(dft)
    });
    tracing::trace!(task, proc, est, eft = est + w, "eft candidate");
    (est, est + w)
}

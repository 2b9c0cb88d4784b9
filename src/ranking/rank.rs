//! Upward and downward ranks over the aggregated cost model.

use crate::models::{DerivedCosts, TaskGraph};

/// Upward rank of every task: aggregated cost of the task plus the
/// longest (cost + communication) path from it to the exit task. Computed
/// in reverse topological order; the exit task's rank is its own cost.
pub(crate) fn upward_rank(graph: &TaskGraph, derived: &DerivedCosts) -> Vec<f64> {
    let mut rku = vec![0.0; graph.task_count()];
    for &t in graph.topological_order().iter().rev() {
        let tail = graph
            .successors(t)
            .map(|s| derived.mean_comm_cost(graph, t, s) + rku[s - 1])
            .fold(0.0_f64, f64::max);
        rku[t - 1] = derived.comp(t) + tail;
    }
    rku
}

/// Downward rank of every task: the longest (cost + communication) path
/// from the entry task up to, but excluding, the task itself. The entry
/// task's rank is zero.
pub(crate) fn downward_rank(graph: &TaskGraph, derived: &DerivedCosts) -> Vec<f64> {
    let mut rkd = vec![0.0; graph.task_count()];
    for &t in &graph.topological_order() {
        rkd[t - 1] = graph
            .predecessors(t)
            .iter()
            .map(|&p| derived.mean_comm_cost(graph, p, t) + rkd[p - 1] + derived.comp(p))
            .fold(0.0_f64, f64::max);
    }
    rkd
}

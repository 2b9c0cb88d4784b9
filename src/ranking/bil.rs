//! Bottom-level matrix (BIL).
//!
//! Unlike the scalar ranks, BIL keeps the cost model exact: one value per
//! task per processor, with real inter-processor communication costs
//! instead of aggregates.
//!
//! # Reference
//! Oh & Ha (1996), "A Static Scheduling Heuristic for Heterogeneous
//! Processors"

use crate::models::{comm_cost, TaskGraph};

/// `bil[task - 1][proc]`: cost of `task` on `proc` plus, over its
/// successors, the largest best-case continuation — each successor placed
/// on whichever processor minimizes its own BIL plus the edge's
/// communication cost. The exit task's row is its cost row.
pub(crate) fn compute_bil(graph: &TaskGraph) -> Vec<Vec<f64>> {
    let q = graph.nbproc();
    let mut bil = vec![vec![0.0; q]; graph.task_count()];
    for &t in graph.topological_order().iter().rev() {
        for p in 0..q {
            let tail = graph
                .successors(t)
                .map(|s| {
                    (0..q)
                        .map(|n| bil[s - 1][n] + comm_cost(graph, t, s, p, n))
                        .fold(f64::INFINITY, f64::min)
                })
                .fold(0.0_f64, f64::max);
            bil[t - 1][p] = graph.cost(t, p) + tail;
        }
    }
    bil
}

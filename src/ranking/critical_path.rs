//! Critical-path extraction.
//!
//! A task lies on the critical path when its upward plus downward rank
//! equals the critical-path length (the entry task's total). The walk
//! starts at the entry and repeatedly takes the lowest-id successor whose
//! total matches, so the returned path is deterministic.

use crate::models::{DerivedCosts, TaskGraph, TaskId};
use crate::ranking::{downward_rank, upward_rank};

/// Relative comparison; rank totals accumulate float error along the path.
fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * b.abs().max(1.0)
}

/// The critical path from entry to exit under the aggregated cost model.
pub fn critical_path(graph: &TaskGraph, derived: &DerivedCosts) -> Vec<TaskId> {
    let rku = upward_rank(graph, derived);
    let rkd = downward_rank(graph, derived);
    let total = |t: TaskId| rku[t - 1] + rkd[t - 1];

    let exit = graph.exit_task();
    let cp_len = total(graph.entry_task());
    let mut path = vec![graph.entry_task()];
    let mut current = graph.entry_task();
    while current != exit {
        // successors are id-sorted; fall back to the largest total if
        // rounding pushed every candidate off the exact length
        let next = graph
            .successors(current)
            .find(|&s| approx_eq(total(s), cp_len))
            .or_else(|| {
                graph.successors(current).reduce(|best, s| {
                    if total(s) > total(best) {
                        s
                    } else {
                        best
                    }
                })
            })
            .unwrap_or(exit);
        path.push(next);
        current = next;
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostFunction, TaskGraphBuilder};

    #[test]
    fn test_heavy_branch_is_critical() {
        let g = TaskGraphBuilder::new(4, 2)
            .with_edge(1, 2, 1.0)
            .with_edge(1, 3, 1.0)
            .with_edge(2, 4, 1.0)
            .with_edge(3, 4, 1.0)
            .with_cost_matrix(vec![
                vec![2.0, 2.0],
                vec![1.0, 1.0],
                vec![5.0, 5.0],
                vec![2.0, 2.0],
            ])
            .with_uniform_links(1.0, 0.0)
            .build()
            .unwrap();
        let d = CostFunction::Mean.derive(&g);
        assert_eq!(critical_path(&g, &d), vec![1, 3, 4]);
    }

    #[test]
    fn test_tie_takes_lowest_id_branch() {
        let g = TaskGraphBuilder::new(4, 1)
            .with_edge(1, 2, 2.0)
            .with_edge(1, 3, 2.0)
            .with_edge(2, 4, 2.0)
            .with_edge(3, 4, 2.0)
            .with_cost_matrix(vec![vec![3.0]; 4])
            .with_uniform_links(1.0, 0.0)
            .build()
            .unwrap();
        let d = CostFunction::Mean.derive(&g);
        assert_eq!(critical_path(&g, &d), vec![1, 2, 4]);
    }

    #[test]
    fn test_chain_is_its_own_critical_path() {
        let g = TaskGraphBuilder::new(3, 2)
            .with_edge(1, 2, 1.0)
            .with_edge(2, 3, 1.0)
            .with_cost_matrix(vec![vec![1.0, 2.0]; 3])
            .with_uniform_links(1.0, 0.5)
            .build()
            .unwrap();
        let d = CostFunction::Mean.derive(&g);
        assert_eq!(critical_path(&g, &d), vec![1, 2, 3]);
    }
}

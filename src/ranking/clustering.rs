//! Link-cost clustering priority (cluHPS).
//!
//! Tasks are grouped by graph level (longest predecessor chain) and each
//! carries a link cost: the heaviest aggregated communication on its
//! inbound and outbound edges, accumulated along its heaviest-linked
//! ancestor. The order walks levels from the entry down, cheapest link
//! cost first within a level, so lightly-connected tasks get placed while
//! the heavily-connected ones still have slack.

use crate::models::{DerivedCosts, TaskGraph, TaskId};

/// Level of each task (indexed `task - 1`): 0 at the entry, otherwise one
/// past the deepest predecessor.
fn levels(graph: &TaskGraph) -> Vec<usize> {
    let mut level = vec![0usize; graph.task_count()];
    for &t in &graph.topological_order() {
        level[t - 1] = graph
            .predecessors(t)
            .iter()
            .map(|&p| level[p - 1] + 1)
            .max()
            .unwrap_or(0);
    }
    level
}

/// Priority order plus link-cost values.
pub(crate) fn link_cost_order(graph: &TaskGraph, derived: &DerivedCosts) -> (Vec<TaskId>, Vec<f64>) {
    let level = levels(graph);
    let mut lc = vec![0.0; graph.task_count()];
    for &t in &graph.topological_order() {
        let ulc = graph
            .successors(t)
            .map(|s| derived.mean_comm_cost(graph, t, s))
            .fold(0.0_f64, f64::max);
        let dlc = graph
            .predecessors(t)
            .iter()
            .map(|&p| derived.mean_comm_cost(graph, p, t))
            .fold(0.0_f64, f64::max);
        let max_pred_lc = graph
            .predecessors(t)
            .iter()
            .map(|&p| lc[p - 1])
            .fold(0.0_f64, f64::max);
        lc[t - 1] = max_pred_lc + ulc + dlc;
    }
    let mut order: Vec<TaskId> = graph.tasks().collect();
    order.sort_by(|&a, &b| {
        level[a - 1].cmp(&level[b - 1]).then(
            lc[a - 1]
                .partial_cmp(&lc[b - 1])
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });
    (order, lc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostFunction, TaskGraphBuilder};

    fn fork() -> TaskGraph {
        // 1 → {2 (light link), 3 (heavy link)} → 4
        TaskGraphBuilder::new(4, 2)
            .with_edge(1, 2, 1.0)
            .with_edge(1, 3, 8.0)
            .with_edge(2, 4, 1.0)
            .with_edge(3, 4, 1.0)
            .with_cost_matrix(vec![vec![2.0, 2.0]; 4])
            .with_uniform_links(1.0, 0.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_levels() {
        let g = fork();
        assert_eq!(levels(&g), vec![0, 1, 1, 2]);
    }

    #[test]
    fn test_light_link_first_within_level() {
        let g = fork();
        let d = CostFunction::Mean.derive(&g);
        let (order, lc) = link_cost_order(&g, &d);
        // lc: 1 → 8; 2 → 8+1+1 = 10; 3 → 8+1+8 = 17; 4 → 17+0+1 = 18
        assert_eq!(lc, vec![8.0, 10.0, 17.0, 18.0]);
        assert_eq!(order, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_levels_dominate_link_cost() {
        // deeper task never precedes a shallower one, however cheap
        let g = fork();
        let d = CostFunction::Mean.derive(&g);
        let (order, _) = link_cost_order(&g, &d);
        let lv = levels(&g);
        for w in order.windows(2) {
            assert!(lv[w[0] - 1] <= lv[w[1] - 1]);
        }
    }
}

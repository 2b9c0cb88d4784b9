//! Serial baseline: the whole graph on a single pivot processor.
//!
//! A serialization order is built around the critical path: each CP task
//! is emitted after all of its (transitively unplaced) predecessors, then
//! any leftover task joins in id order. The pivot is the processor with
//! the smallest total cost over all tasks, and everything is scheduled on
//! it in order, without insertion. Deliberately naive; the heuristics are
//! measured against it.

use crate::models::{Placement, Schedule, TaskId};
use crate::placement::PlacementContext;
use crate::ranking::critical_path;
use crate::timing::compute_eft;

/// Serialization order: the critical path interleaved with predecessor
/// closures. Predecessors are resolved lowest id first, iteratively.
fn serial_order(ctx: &PlacementContext<'_>) -> Vec<TaskId> {
    let graph = ctx.graph;
    let cp = critical_path(graph, ctx.derived);
    let mut order = Vec::with_capacity(graph.task_count());
    let mut placed = vec![false; graph.task_count()];
    order.push(cp[0]);
    placed[cp[0] - 1] = true;
    for &target in &cp[1..] {
        let mut stack = vec![target];
        while let Some(&t) = stack.last() {
            if placed[t - 1] {
                stack.pop();
                continue;
            }
            let missing: Vec<TaskId> = graph
                .predecessors(t)
                .iter()
                .copied()
                .filter(|&p| !placed[p - 1])
                .collect();
            if missing.is_empty() {
                placed[t - 1] = true;
                order.push(t);
                stack.pop();
            } else {
                // lowest id ends up on top
                stack.extend(missing.into_iter().rev());
            }
        }
    }
    for t in graph.tasks() {
        if !placed[t - 1] {
            order.push(t);
        }
    }
    order
}

/// Schedules every task on the cheapest single processor, in serial
/// order.
pub(super) fn place_serial(ctx: &PlacementContext<'_>) -> Schedule {
    let graph = ctx.graph;
    let order = serial_order(ctx);
    let mut pivot = 0;
    let mut total = f64::INFINITY;
    for p in 0..graph.nbproc() {
        let sum: f64 = order.iter().map(|&t| graph.cost(t, p)).sum();
        if sum < total {
            total = sum;
            pivot = p;
        }
    }
    tracing::debug!(pivot, total, "serial pivot");
    let mut schedule = Schedule::new(graph.task_count());
    for &t in &order {
        let (est, eft) = compute_eft(graph, t, pivot, &schedule, false, false);
        schedule.assign(
            t,
            Placement {
                proc: pivot,
                est,
                eft,
            },
        );
    }
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostFunction, TaskGraph, TaskGraphBuilder};
    use crate::ranking::{rank_tasks, PriorityStrategy};

    fn with_ctx<R>(g: &TaskGraph, f: impl FnOnce(&PlacementContext<'_>) -> R) -> R {
        let d = CostFunction::Mean.derive(g);
        let ranked = rank_tasks(g, &d, PriorityStrategy::UpwardRank);
        f(&PlacementContext {
            graph: g,
            derived: &d,
            ranks: &ranked.ranks,
        })
    }

    fn wide() -> TaskGraph {
        // 1 → {2, 3, 4} → 5; heavy 3 makes (1, 3, 5) the critical path
        TaskGraphBuilder::new(5, 2)
            .with_edge(1, 2, 1.0)
            .with_edge(1, 3, 1.0)
            .with_edge(1, 4, 1.0)
            .with_edge(2, 5, 1.0)
            .with_edge(3, 5, 1.0)
            .with_edge(4, 5, 1.0)
            .with_cost_matrix(vec![
                vec![2.0, 3.0],
                vec![1.0, 1.0],
                vec![6.0, 6.0],
                vec![1.0, 1.0],
                vec![2.0, 3.0],
            ])
            .with_uniform_links(1.0, 0.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_order_interleaves_cp_with_predecessors() {
        let g = wide();
        with_ctx(&g, |ctx| {
            let order = serial_order(ctx);
            // CP (1, 3, 5) drives the order; 5 pulls in 2 and 4 first
            assert_eq!(order, vec![1, 3, 2, 4, 5]);
        });
    }

    #[test]
    fn test_pivot_minimizes_total_cost() {
        let g = wide();
        with_ctx(&g, |ctx| {
            let s = place_serial(ctx);
            assert_eq!(s.used_processors(), vec![0]); // 12 vs 14
            // serial on one processor: makespan is the column sum
            assert_eq!(s.span(), 12.0);
        });
    }

    #[test]
    fn test_single_task_graph() {
        let g = TaskGraphBuilder::new(1, 2)
            .with_cost_matrix(vec![vec![4.0, 3.0]])
            .with_uniform_links(1.0, 0.0)
            .build()
            .unwrap();
        with_ctx(&g, |ctx| {
            let s = place_serial(ctx);
            assert!(s.is_complete());
            assert_eq!(s.get(1).unwrap().proc, 1);
            assert_eq!(s.span(), 3.0);
        });
    }
}

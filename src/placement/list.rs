//! Processor selection for the list-style rules (EFT, OLB, MET).

use crate::lookahead::{Lookahead, PlaceValue};
use crate::models::{Placement, Schedule, TaskId};
use crate::placement::PlacementContext;
use crate::timing::compute_eft;

/// Best processor for `task` by lookahead-adjusted finish time, or by
/// start time with `use_est` (OLB). Strict comparison: the lowest-index
/// processor wins ties. The returned placement carries the raw times.
pub(super) fn best_eft_proc(
    ctx: &PlacementContext<'_>,
    task: TaskId,
    schedule: &Schedule,
    lookahead: Lookahead,
    insertion: bool,
    use_est: bool,
    remaining: &[TaskId],
) -> Placement {
    let mut best = f64::INFINITY;
    let mut placement = Placement {
        proc: 0,
        est: 0.0,
        eft: 0.0,
    };
    for proc in 0..ctx.graph.nbproc() {
        let (est, eft) = compute_eft(ctx.graph, task, proc, schedule, insertion, false);
        let (kind, value) = if use_est {
            (PlaceValue::Est, est)
        } else {
            (PlaceValue::Eft, eft)
        };
        let adjusted = lookahead.apply(ctx, task, proc, remaining, kind, schedule, value);
        if adjusted < best {
            best = adjusted;
            placement = Placement { proc, est, eft };
        }
    }
    placement
}

/// Best processor for `task` by lookahead-adjusted raw computation cost,
/// communication ignored; earliest finish breaks ties.
pub(super) fn best_met_proc(
    ctx: &PlacementContext<'_>,
    task: TaskId,
    schedule: &Schedule,
    lookahead: Lookahead,
    insertion: bool,
    remaining: &[TaskId],
) -> Placement {
    let mut best = f64::INFINITY;
    let mut placement = Placement {
        proc: 0,
        est: 0.0,
        eft: 0.0,
    };
    for proc in 0..ctx.graph.nbproc() {
        let cost = ctx.graph.cost(task, proc);
        let adjusted = lookahead.apply(ctx, task, proc, remaining, PlaceValue::Met, schedule, cost);
        let (est, eft) = compute_eft(ctx.graph, task, proc, schedule, insertion, false);
        if adjusted < best || (adjusted == best && eft < placement.eft) {
            best = adjusted;
            placement = Placement { proc, est, eft };
        }
    }
    placement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostFunction, TaskGraph, TaskGraphBuilder};
    use crate::ranking::{rank_tasks, PriorityStrategy, RankedTasks};

    fn setup() -> (TaskGraph, crate::models::DerivedCosts, RankedTasks) {
        let g = TaskGraphBuilder::new(3, 2)
            .with_edge(1, 2, 2.0)
            .with_edge(2, 3, 2.0)
            .with_cost_matrix(vec![vec![2.0, 4.0], vec![2.0, 1.0], vec![2.0, 2.0]])
            .with_uniform_links(1.0, 1.0)
            .build()
            .unwrap();
        let d = CostFunction::Mean.derive(&g);
        let ranked = rank_tasks(&g, &d, PriorityStrategy::UpwardRank);
        (g, d, ranked)
    }

    #[test]
    fn test_eft_picks_minimum_finish() {
        let (g, d, ranked) = setup();
        let ctx = PlacementContext {
            graph: &g,
            derived: &d,
            ranks: &ranked.ranks,
        };
        let s = Schedule::new(3);
        // task 1: proc 0 finishes at 2, proc 1 at 4
        let p = best_eft_proc(&ctx, 1, &s, Lookahead::None, false, false, &[]);
        assert_eq!(p.proc, 0);
        assert_eq!(p.eft, 2.0);
    }

    #[test]
    fn test_olb_prefers_earlier_start_over_finish() {
        let (g, d, ranked) = setup();
        let ctx = PlacementContext {
            graph: &g,
            derived: &d,
            ranks: &ranked.ranks,
        };
        let mut s = Schedule::new(3);
        s.assign(
            1,
            Placement {
                proc: 0,
                est: 0.0,
                eft: 2.0,
            },
        );
        // task 2 on proc 0: est 2, eft 4; on proc 1: est 2 + 1 + 2/1 = 5, eft 6
        let est_pick = best_eft_proc(&ctx, 2, &s, Lookahead::None, false, true, &[]);
        assert_eq!(est_pick.proc, 0);
        assert_eq!(est_pick.est, 2.0);
    }

    #[test]
    fn test_met_ignores_communication() {
        let (g, d, ranked) = setup();
        let ctx = PlacementContext {
            graph: &g,
            derived: &d,
            ranks: &ranked.ranks,
        };
        let mut s = Schedule::new(3);
        s.assign(
            1,
            Placement {
                proc: 0,
                est: 0.0,
                eft: 2.0,
            },
        );
        // task 2 is cheapest on proc 1 despite the cross-proc transfer
        let p = best_met_proc(&ctx, 2, &s, Lookahead::None, false, &[]);
        assert_eq!(p.proc, 1);
        assert_eq!(p.est, 5.0);
        assert_eq!(p.eft, 6.0);
    }

    #[test]
    fn test_met_breaks_cost_ties_by_finish() {
        let g = TaskGraphBuilder::new(2, 2)
            .with_edge(1, 2, 2.0)
            .with_cost_matrix(vec![vec![2.0, 2.0], vec![3.0, 3.0]])
            .with_uniform_links(1.0, 1.0)
            .build()
            .unwrap();
        let d = CostFunction::Mean.derive(&g);
        let ranked = rank_tasks(&g, &d, PriorityStrategy::UpwardRank);
        let ctx = PlacementContext {
            graph: &g,
            derived: &d,
            ranks: &ranked.ranks,
        };
        let mut s = Schedule::new(2);
        s.assign(
            1,
            Placement {
                proc: 1,
                est: 0.0,
                eft: 2.0,
            },
        );
        // equal cost everywhere; proc 1 avoids the transfer and finishes first
        let p = best_met_proc(&ctx, 2, &s, Lookahead::None, false, &[]);
        assert_eq!(p.proc, 1);
        assert_eq!(p.eft, 5.0);
    }
}

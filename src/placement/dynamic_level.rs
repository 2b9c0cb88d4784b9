//! Dynamic level (DL) and generalized dynamic level (GDL) values.
//!
//! The dynamic level trades a task's static priority against the cost of
//! the processor under consideration: `dl = rank - est + meanCost - cost`.
//! A high dl means the task is urgent and the processor both free and
//! fast for it. GDL adds a correction for how much is lost by not taking
//! the preferred processor, making the choice robust across tasks.
//!
//! # Reference
//! Sih & Lee (1993), dynamic-level scheduling (DLS)

use crate::lookahead::{Lookahead, PlaceValue};
use crate::models::{Schedule, TaskId};
use crate::placement::PlacementContext;
use crate::timing::compute_eft;

/// DL of `task` on `proc` against the current schedule, lookahead
/// applied last. Per-processor ranks (BIL) are consulted per processor.
pub(crate) fn dynamic_level(
    ctx: &PlacementContext<'_>,
    task: TaskId,
    proc: usize,
    schedule: &Schedule,
    lookahead: Lookahead,
    insertion: bool,
    remaining: &[TaskId],
    estimate: bool,
) -> f64 {
    let rank = ctx.ranks.value(task, proc);
    let (est, _) = compute_eft(ctx.graph, task, proc, schedule, insertion, estimate);
    let dl = rank - est + ctx.derived.comp(task) - ctx.graph.cost(task, proc);
    lookahead.apply(ctx, task, proc, remaining, PlaceValue::Dl, schedule, dl)
}

/// Cost of denying `task` its preferred processor `pm`: its DL there
/// minus the best DL anywhere else. Computed on bare DL values, without
/// lookahead or insertion. With a single processor there is no
/// alternative and the DL itself is returned.
fn correction(ctx: &PlacementContext<'_>, task: TaskId, pm: usize, schedule: &Schedule) -> f64 {
    let dl_pm = dynamic_level(ctx, task, pm, schedule, Lookahead::None, false, &[], false);
    if ctx.graph.nbproc() == 1 {
        return dl_pm;
    }
    let best_other = (0..ctx.graph.nbproc())
        .filter(|&p| p != pm)
        .map(|p| dynamic_level(ctx, task, p, schedule, Lookahead::None, false, &[], false))
        .fold(f64::NEG_INFINITY, f64::max);
    dl_pm - best_other
}

/// GDL of `task`: DL on its preferred processor plus the correction, with
/// the preferred processor itself. Strict comparison: the lowest-index
/// processor wins DL ties.
pub(super) fn generalized_dynamic_level(
    ctx: &PlacementContext<'_>,
    task: TaskId,
    schedule: &Schedule,
    lookahead: Lookahead,
    insertion: bool,
    remaining: &[TaskId],
) -> (f64, usize) {
    let mut best = f64::NEG_INFINITY;
    let mut pm = 0;
    for p in 0..ctx.graph.nbproc() {
        let dl = dynamic_level(ctx, task, p, schedule, lookahead, insertion, remaining, false);
        if dl > best {
            best = dl;
            pm = p;
        }
    }
    (best + correction(ctx, task, pm, schedule), pm)
}

/// Best processor for `task` by DL alone; used by the BIM-selected DL
/// driver once the task is already chosen.
pub(super) fn best_dl_proc(
    ctx: &PlacementContext<'_>,
    task: TaskId,
    schedule: &Schedule,
    lookahead: Lookahead,
    insertion: bool,
    remaining: &[TaskId],
) -> usize {
    let mut best = f64::NEG_INFINITY;
    let mut pm = 0;
    for p in 0..ctx.graph.nbproc() {
        let dl = dynamic_level(ctx, task, p, schedule, lookahead, insertion, remaining, false);
        if dl > best {
            best = dl;
            pm = p;
        }
    }
    pm
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostFunction, DerivedCosts, Placement, TaskGraph, TaskGraphBuilder};
    use crate::ranking::{rank_tasks, PriorityStrategy, RankedTasks};

    fn setup() -> (TaskGraph, DerivedCosts, RankedTasks) {
        let g = TaskGraphBuilder::new(3, 2)
            .with_edge(1, 2, 2.0)
            .with_edge(2, 3, 2.0)
            .with_cost_matrix(vec![vec![2.0, 2.0], vec![1.0, 4.0], vec![2.0, 2.0]])
            .with_uniform_links(1.0, 0.0)
            .build()
            .unwrap();
        let d = CostFunction::Mean.derive(&g);
        let ranked = rank_tasks(&g, &d, PriorityStrategy::UpwardRank);
        (g, d, ranked)
    }

    #[test]
    fn test_dl_rewards_fast_free_processor() {
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
        // task 2: proc 0 → est 2, cost 1; proc 1 → est 2 + 2 = 4, cost 4
        let dl0 = dynamic_level(&ctx, 2, 0, &s, Lookahead::None, false, &[], false);
        let dl1 = dynamic_level(&ctx, 2, 1, &s, Lookahead::None, false, &[], false);
        assert_eq!(dl0 - dl1, (-2.0 - 1.0) - (-4.0 - 4.0));
        assert!(dl0 > dl1);
    }

    #[test]
    fn test_gdl_returns_preferred_processor() {
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
        let (gdl, pm) = generalized_dynamic_level(&ctx, 2, &s, Lookahead::None, false, &[]);
        assert_eq!(pm, 0);
        let dl0 = dynamic_level(&ctx, 2, 0, &s, Lookahead::None, false, &[], false);
        let dl1 = dynamic_level(&ctx, 2, 1, &s, Lookahead::None, false, &[], false);
        // gdl = dl(pm) + (dl(pm) - best other)
        assert_eq!(gdl, dl0 + (dl0 - dl1));
    }

    #[test]
    fn test_correction_on_single_processor_is_dl() {
        let g = TaskGraphBuilder::new(2, 1)
            .with_edge(1, 2, 1.0)
            .with_cost_matrix(vec![vec![2.0], vec![3.0]])
            .with_uniform_links(1.0, 0.0)
            .build()
            .unwrap();
        let d = CostFunction::Mean.derive(&g);
        let ranked = rank_tasks(&g, &d, PriorityStrategy::UpwardRank);
        let ctx = PlacementContext {
            graph: &g,
            derived: &d,
            ranks: &ranked.ranks,
        };
        let s = Schedule::new(2);
        let dl = dynamic_level(&ctx, 1, 0, &s, Lookahead::None, false, &[], false);
        let (gdl, pm) = generalized_dynamic_level(&ctx, 1, &s, Lookahead::None, false, &[]);
        assert_eq!(pm, 0);
        assert_eq!(gdl, 2.0 * dl);
    }
}

//! BIM ready-task selection and the BIM* placement value.
//!
//! BIM selection: with k ready tasks, each candidate is judged by the
//! k-th smallest of `priority + est` over the processors — an
//! anticipatory estimate of where the task would land once its k - 1
//! peers have claimed the better slots. BIM* is the companion placement
//! value: est plus the bottom-level term plus a contention penalty that
//! only bites once ready tasks outnumber processors.

use crate::lookahead::{Lookahead, PlaceValue};
use crate::models::{Placement, Schedule, TaskId};
use crate::placement::PlacementContext;
use crate::timing::compute_eft;

/// Picks the ready task minimizing the k-th smallest `priority + est`
/// across processors, k being the number of ready tasks (clamped to the
/// largest candidate when k exceeds the processor count). Strict
/// comparison: the earliest-listed ready task wins ties.
pub(super) fn bim_select(
    ctx: &PlacementContext<'_>,
    ready: &[TaskId],
    schedule: &Schedule,
    insertion: bool,
) -> TaskId {
    let k = ready.len();
    let mut best = f64::INFINITY;
    let mut pick = ready[0];
    for &t in ready {
        let mut values: Vec<f64> = (0..ctx.graph.nbproc())
            .map(|p| {
                let (est, _) = compute_eft(ctx.graph, t, p, schedule, insertion, false);
                ctx.ranks.value(t, p) + est
            })
            .collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let kth = values[k.min(values.len()) - 1];
        if kth < best {
            best = kth;
            pick = t;
        }
    }
    pick
}

/// BIM* value of `task` on `proc` against a (possibly tentative)
/// schedule, with its raw est/eft: `est + bilTerm + w * max(k/Q - 1, 0)`.
pub(crate) fn bim_star_value(
    ctx: &PlacementContext<'_>,
    task: TaskId,
    proc: usize,
    schedule: &Schedule,
    k: usize,
    insertion: bool,
    estimate: bool,
) -> (f64, f64, f64) {
    let (est, eft) = compute_eft(ctx.graph, task, proc, schedule, insertion, estimate);
    let q = ctx.graph.nbproc() as f64;
    let penalty = ctx.graph.cost(task, proc) * (k as f64 / q - 1.0).max(0.0);
    (est + ctx.ranks.value(task, proc) + penalty, est, eft)
}

/// Best processor for `task` by lookahead-adjusted BIM* value, earliest
/// finish breaking exact ties.
pub(super) fn best_bim_star_proc(
    ctx: &PlacementContext<'_>,
    task: TaskId,
    schedule: &Schedule,
    k: usize,
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
        let (bims, est, eft) = bim_star_value(ctx, task, proc, schedule, k, insertion, false);
        let adjusted =
            lookahead.apply(ctx, task, proc, remaining, PlaceValue::BimStar, schedule, bims);
        if adjusted <= best && (adjusted < best || eft < placement.eft) {
            best = adjusted;
            placement = Placement { proc, est, eft };
        }
    }
    placement
}

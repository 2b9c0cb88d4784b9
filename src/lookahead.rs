//! Lookahead extensions: additive corrections applied to a candidate
//! placement value before comparison.
//!
//! A lookahead never places anything itself. It adjusts the value a
//! placement strategy is about to compare, folding in how the current
//! choice constrains a descendant: DLS/DC charges the heaviest-data
//! successor's best continuation, DCP charges the estimated value of the
//! next task in the remaining order against the tentative schedule.
//!
//! # Reference
//! Sih & Lee (1993), "A Compile-Time Scheduling Heuristic for
//! Interconnection-Constrained Heterogeneous Processor Architectures"
//! (the DC term of DLS)

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::models::{comm_cost, Schedule, TaskId};
use crate::placement::{bim_star_value, dynamic_level, PlacementContext};
use crate::timing::compute_eft;

/// Lookahead strategies (closed enumeration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lookahead {
    /// Identity: the placement value is compared as-is.
    None,
    /// Descendant consideration of DLS: penalize placements that strand
    /// the heaviest-data successor.
    DlsDc,
    /// Charge the estimated placement value of the next task in the
    /// remaining order, probed against the tentative schedule.
    Dcp,
}

impl Lookahead {
    /// Canonical name, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            Lookahead::None => "none",
            Lookahead::DlsDc => "DLS/DC",
            Lookahead::Dcp => "DCP",
        }
    }
}

impl FromStr for Lookahead {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "none" => Ok(Lookahead::None),
            "DLS/DC" => Ok(Lookahead::DlsDc),
            "DCP" => Ok(Lookahead::Dcp),
            other => Err(ScheduleError::UnknownLookaheadStrategy(other.to_string())),
        }
    }
}

/// Which placement value the correction is being applied to. DCP probes
/// the next task under the same value kind the active strategy compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlaceValue {
    Eft,
    Est,
    BimStar,
    Met,
    Dl,
}

impl Lookahead {
    /// Adjusts `value`, the candidate placement value of `task` on `proc`.
    /// `remaining` is the not-yet-placed tail of the priority order.
    pub(crate) fn apply(
        self,
        ctx: &PlacementContext<'_>,
        task: TaskId,
        proc: usize,
        remaining: &[TaskId],
        kind: PlaceValue,
        schedule: &Schedule,
        value: f64,
    ) -> f64 {
        match self {
            Lookahead::None => value,
            Lookahead::DlsDc => value + descendant_consideration(ctx, task, Some(proc)),
            Lookahead::Dcp => value + dcp_term(ctx, task, proc, remaining, kind, schedule),
        }
    }
}

/// F(i, j, m): how quickly successor `j` completes once `i` runs on `m` —
/// the cheapest (communication + computation) over all processors. With
/// `m` unknown the aggregated analogue is used.
fn f_term(ctx: &PlacementContext<'_>, i: TaskId, j: TaskId, m: Option<usize>) -> f64 {
    match m {
        Some(m) => (0..ctx.graph.nbproc())
            .map(|p| comm_cost(ctx.graph, i, j, m, p) + ctx.graph.cost(j, p))
            .fold(f64::INFINITY, f64::min),
        None => ctx.derived.mean_comm_cost(ctx.graph, i, j) + ctx.derived.comp(j),
    }
}

/// DC(i, m): aggregated cost of the heaviest-data successor minus its
/// best continuation from `m`. Zero when no outgoing edge carries data.
fn descendant_consideration(ctx: &PlacementContext<'_>, i: TaskId, m: Option<usize>) -> f64 {
    let mut heaviest = 0.0;
    let mut j = None;
    for e in ctx.graph.succ_edges(i) {
        if e.weight > heaviest {
            heaviest = e.weight;
            j = Some(e.to);
        }
    }
    match j {
        Some(j) => ctx.derived.comp(j) - f_term(ctx, i, j, m),
        None => 0.0,
    }
}

/// DCP: the estimated value of the next remaining task that is a
/// successor of `task`, probed on the same processor with insertion
/// against the tentative schedule. Zero when no such task remains.
fn dcp_term(
    ctx: &PlacementContext<'_>,
    task: TaskId,
    proc: usize,
    remaining: &[TaskId],
    kind: PlaceValue,
    schedule: &Schedule,
) -> f64 {
    let next = remaining
        .iter()
        .copied()
        .find(|&t| ctx.graph.successors(task).any(|s| s == t));
    let Some(next) = next else {
        return 0.0;
    };
    match kind {
        PlaceValue::Eft => compute_eft(ctx.graph, next, proc, schedule, true, true).1,
        PlaceValue::Est => compute_eft(ctx.graph, next, proc, schedule, true, true).0,
        // ready-set size does not apply to a hypothetical future task
        PlaceValue::BimStar => bim_star_value(ctx, next, proc, schedule, 0, true, true).0,
        PlaceValue::Met => ctx.graph.cost(next, proc),
        PlaceValue::Dl => dynamic_level(
            ctx,
            next,
            proc,
            schedule,
            Lookahead::None,
            true,
            &[],
            true,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostFunction, TaskGraphBuilder, TaskGraph};
    use crate::ranking::{rank_tasks, PriorityStrategy};

    fn fork() -> TaskGraph {
        // 1 feeds 2 lightly and 3 heavily; both reach 4
        TaskGraphBuilder::new(4, 2)
            .with_edge(1, 2, 1.0)
            .with_edge(1, 3, 6.0)
            .with_edge(2, 4, 1.0)
            .with_edge(3, 4, 1.0)
            .with_cost_matrix(vec![
                vec![2.0, 2.0],
                vec![3.0, 3.0],
                vec![4.0, 8.0],
                vec![2.0, 2.0],
            ])
            .with_uniform_links(1.0, 0.5)
            .build()
            .unwrap()
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("".parse::<Lookahead>().unwrap(), Lookahead::None);
        assert_eq!("none".parse::<Lookahead>().unwrap(), Lookahead::None);
        assert_eq!("DLS/DC".parse::<Lookahead>().unwrap(), Lookahead::DlsDc);
        assert_eq!("DCP".parse::<Lookahead>().unwrap(), Lookahead::Dcp);
        assert!(matches!(
            "DPS".parse::<Lookahead>(),
            Err(ScheduleError::UnknownLookaheadStrategy(_))
        ));
    }

    #[test]
    fn test_none_is_identity() {
        let g = fork();
        let d = CostFunction::Mean.derive(&g);
        let ranked = rank_tasks(&g, &d, PriorityStrategy::UpwardRank);
        let ctx = PlacementContext {
            graph: &g,
            derived: &d,
            ranks: &ranked.ranks,
        };
        let s = Schedule::new(4);
        let v = Lookahead::None.apply(&ctx, 1, 0, &[2, 3, 4], PlaceValue::Eft, &s, 7.5);
        assert_eq!(v, 7.5);
    }

    #[test]
    fn test_dc_follows_heaviest_edge() {
        let g = fork();
        let d = CostFunction::Mean.derive(&g);
        let ranked = rank_tasks(&g, &d, PriorityStrategy::UpwardRank);
        let ctx = PlacementContext {
            graph: &g,
            derived: &d,
            ranks: &ranked.ranks,
        };
        // heaviest edge from 1 is (1, 3); F(1, 3, 0) = min(0 + 4, 0.5 + 6/1 + 8) = 4
        let dc = descendant_consideration(&ctx, 1, Some(0));
        assert_eq!(dc, d.comp(3) - 4.0); // 6 - 4
        // exit task has no successor
        assert_eq!(descendant_consideration(&ctx, 4, Some(0)), 0.0);
    }

    #[test]
    fn test_dcp_zero_without_remaining_successor() {
        let g = fork();
        let d = CostFunction::Mean.derive(&g);
        let ranked = rank_tasks(&g, &d, PriorityStrategy::UpwardRank);
        let ctx = PlacementContext {
            graph: &g,
            derived: &d,
            ranks: &ranked.ranks,
        };
        let s = Schedule::new(4);
        // remaining holds no successor of task 2
        let v = Lookahead::Dcp.apply(&ctx, 2, 0, &[3], PlaceValue::Eft, &s, 1.0);
        assert_eq!(v, 1.0);
    }

    #[test]
    fn test_dcp_charges_next_successor_estimate() {
        let g = fork();
        let d = CostFunction::Mean.derive(&g);
        let ranked = rank_tasks(&g, &d, PriorityStrategy::UpwardRank);
        let ctx = PlacementContext {
            graph: &g,
            derived: &d,
            ranks: &ranked.ranks,
        };
        let s = Schedule::new(4);
        // empty schedule, estimate mode: eft(3 on 0) = cost = 4
        let v = Lookahead::Dcp.apply(&ctx, 1, 0, &[3, 2, 4], PlaceValue::Eft, &s, 2.0);
        assert_eq!(v, 6.0);
    }
}

//! Placement strategies: turn a priority order into a schedule.
//!
//! Every strategy repeatedly asks the earliest-time engine for candidate
//! (processor, est, eft) triples and commits the winner. They differ in
//! the value they compare (EFT, EST, raw cost, BIM*, dynamic level) and
//! in whether the task order is fixed up front or picked dynamically from
//! the ready set.
//!
//! The BIM-selection variants replace fixed priority order with a
//! k-th-smallest selection among ready tasks; any non-serial placement
//! rule can be combined with it.

mod bim;
mod dynamic_level;
mod list;
mod serial;

pub(crate) use bim::bim_star_value;
pub(crate) use dynamic_level::dynamic_level;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::lookahead::Lookahead;
use crate::models::{DerivedCosts, Placement, Schedule, TaskGraph, TaskId};
use crate::ranking::TaskRanks;
use crate::timing::compute_eft;

/// Processor-selection strategies (closed enumeration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementStrategy {
    /// Minimize earliest finish time.
    Eft,
    /// Minimize earliest start time (load balancing).
    Olb,
    /// Minimize raw computation cost, eft tie-break.
    Met,
    /// Minimize est + bottom-level term + contention penalty.
    BimStar,
    /// Maximize the dynamic level over ready tasks and processors.
    DynamicLevel,
    /// Maximize dynamic level plus a preferred-processor correction.
    GeneralizedDynamicLevel,
    /// Critical-path pivot baseline: everything on one processor.
    Serial,
}

impl PlacementStrategy {
    /// Canonical name, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            PlacementStrategy::Eft => "eft",
            PlacementStrategy::Olb => "OLB",
            PlacementStrategy::Met => "MET",
            PlacementStrategy::BimStar => "BIM*",
            PlacementStrategy::DynamicLevel => "DL",
            PlacementStrategy::GeneralizedDynamicLevel => "GDL",
            PlacementStrategy::Serial => "serial",
        }
    }
}

impl FromStr for PlacementStrategy {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eft" => Ok(PlacementStrategy::Eft),
            "OLB" => Ok(PlacementStrategy::Olb),
            "MET" => Ok(PlacementStrategy::Met),
            "BIM*" => Ok(PlacementStrategy::BimStar),
            "DL" => Ok(PlacementStrategy::DynamicLevel),
            "GDL" => Ok(PlacementStrategy::GeneralizedDynamicLevel),
            "serial" => Ok(PlacementStrategy::Serial),
            other => Err(ScheduleError::UnknownPlacementStrategy(other.to_string())),
        }
    }
}

/// Everything a placement value needs about the problem: the graph, the
/// cost aggregates it was ranked under, and the rank values themselves.
pub struct PlacementContext<'a> {
    pub graph: &'a TaskGraph,
    pub derived: &'a DerivedCosts,
    pub ranks: &'a TaskRanks,
}

/// After `placed` is committed, promotes each of its successors whose
/// predecessors are all resolved (in neither `ready` nor `pending`).
/// With `deletion`, a promoted task also leaves `pending` — the
/// BIM-selection drivers consume tasks through the ready set, the
/// fixed-order drivers only observe it.
pub(crate) fn update_ready(
    graph: &TaskGraph,
    ready: &mut Vec<TaskId>,
    pending: &mut Vec<TaskId>,
    placed: TaskId,
    deletion: bool,
) {
    for s in graph.successors(placed) {
        let resolved = graph
            .predecessors(s)
            .iter()
            .all(|p| !ready.contains(p) && !pending.contains(p));
        if resolved {
            if !ready.contains(&s) {
                ready.push(s);
            }
            if deletion {
                pending.retain(|&t| t != s);
            }
        }
    }
}

/// Commits `task` on `proc` at its earliest times and retires it from the
/// pending and ready lists. Used by the dynamic-order drivers.
fn place_node(
    ctx: &PlacementContext<'_>,
    task: TaskId,
    proc: usize,
    schedule: &mut Schedule,
    pending: &mut Vec<TaskId>,
    ready: &mut Vec<TaskId>,
    insertion: bool,
) {
    let (est, eft) = compute_eft(ctx.graph, task, proc, schedule, insertion, false);
    schedule.assign(task, Placement { proc, est, eft });
    pending.retain(|&t| t != task);
    ready.retain(|&t| t != task);
    update_ready(ctx.graph, ready, pending, task, false);
}

/// Runs a placement strategy over a priority order, producing a complete
/// schedule. `bim_selection` swaps the fixed order for the dynamic
/// k-th-smallest ready-task selection (ignored by `serial`).
pub fn place(
    ctx: &PlacementContext<'_>,
    order: &[TaskId],
    strategy: PlacementStrategy,
    lookahead: Lookahead,
    bim_selection: bool,
    insertion: bool,
) -> Schedule {
    match strategy {
        PlacementStrategy::Serial => serial::place_serial(ctx),
        _ if bim_selection => place_bim_selected(ctx, order, strategy, lookahead, insertion),
        PlacementStrategy::Eft | PlacementStrategy::Olb | PlacementStrategy::Met => {
            place_fixed_order(ctx, order, strategy, lookahead, insertion)
        }
        PlacementStrategy::BimStar => place_bim_star(ctx, order, lookahead, insertion),
        PlacementStrategy::DynamicLevel | PlacementStrategy::GeneralizedDynamicLevel => {
            place_dynamic(ctx, order, strategy, lookahead, insertion)
        }
    }
}

/// EFT / OLB / MET: tasks strictly in priority order.
fn place_fixed_order(
    ctx: &PlacementContext<'_>,
    order: &[TaskId],
    strategy: PlacementStrategy,
    lookahead: Lookahead,
    insertion: bool,
) -> Schedule {
    let mut schedule = Schedule::new(ctx.graph.task_count());
    for (i, &task) in order.iter().enumerate() {
        let remaining = &order[i + 1..];
        let placement = match strategy {
            PlacementStrategy::Olb => {
                list::best_eft_proc(ctx, task, &schedule, lookahead, insertion, true, remaining)
            }
            PlacementStrategy::Met => {
                list::best_met_proc(ctx, task, &schedule, lookahead, insertion, remaining)
            }
            _ => list::best_eft_proc(ctx, task, &schedule, lookahead, insertion, false, remaining),
        };
        schedule.assign(task, placement);
    }
    schedule
}

/// BIM* with fixed task order; the ready set is tracked only to size the
/// contention penalty's k.
fn place_bim_star(
    ctx: &PlacementContext<'_>,
    order: &[TaskId],
    lookahead: Lookahead,
    insertion: bool,
) -> Schedule {
    let mut schedule = Schedule::new(ctx.graph.task_count());
    let mut ready = vec![order[0]];
    let mut pending: Vec<TaskId> = order[1..].to_vec();
    for (i, &task) in order.iter().enumerate() {
        let k = ready.len();
        let remaining = &order[i + 1..];
        let placement =
            bim::best_bim_star_proc(ctx, task, &schedule, k, lookahead, insertion, remaining);
        schedule.assign(task, placement);
        ready.retain(|&t| t != task);
        pending.retain(|&t| t != task);
        update_ready(ctx.graph, &mut ready, &mut pending, task, false);
    }
    schedule
}

/// Any non-serial rule under BIM selection: the next task is picked from
/// the ready set by the k-th-smallest criterion, then placed by the rule.
fn place_bim_selected(
    ctx: &PlacementContext<'_>,
    order: &[TaskId],
    strategy: PlacementStrategy,
    lookahead: Lookahead,
    insertion: bool,
) -> Schedule {
    let mut schedule = Schedule::new(ctx.graph.task_count());
    let mut ready = vec![order[0]];
    let mut pending: Vec<TaskId> = order[1..].to_vec();
    while !ready.is_empty() {
        let k = ready.len();
        let task = bim::bim_select(ctx, &ready, &schedule, insertion);
        ready.retain(|&t| t != task);
        match strategy {
            PlacementStrategy::DynamicLevel => {
                let proc = dynamic_level::best_dl_proc(
                    ctx, task, &schedule, lookahead, insertion, &pending,
                );
                place_node(ctx, task, proc, &mut schedule, &mut pending, &mut ready, insertion);
                continue;
            }
            PlacementStrategy::GeneralizedDynamicLevel => {
                let (_, proc) = dynamic_level::generalized_dynamic_level(
                    ctx, task, &schedule, lookahead, insertion, &pending,
                );
                place_node(ctx, task, proc, &mut schedule, &mut pending, &mut ready, insertion);
                continue;
            }
            _ => {}
        }
        let placement = match strategy {
            PlacementStrategy::Olb => {
                list::best_eft_proc(ctx, task, &schedule, lookahead, insertion, true, &pending)
            }
            PlacementStrategy::Met => {
                list::best_met_proc(ctx, task, &schedule, lookahead, insertion, &pending)
            }
            PlacementStrategy::BimStar => {
                bim::best_bim_star_proc(ctx, task, &schedule, k, lookahead, insertion, &pending)
            }
            _ => list::best_eft_proc(ctx, task, &schedule, lookahead, insertion, false, &pending),
        };
        schedule.assign(task, placement);
        update_ready(ctx.graph, &mut ready, &mut pending, task, true);
    }
    schedule
}

/// DL / GDL with their native dynamic order: at each step the best
/// (ready task, processor) pair by the level value is committed.
fn place_dynamic(
    ctx: &PlacementContext<'_>,
    order: &[TaskId],
    strategy: PlacementStrategy,
    lookahead: Lookahead,
    insertion: bool,
) -> Schedule {
    let mut schedule = Schedule::new(ctx.graph.task_count());
    let mut pending: Vec<TaskId> = order.to_vec();
    let mut ready = vec![order[0]];
    while !pending.is_empty() {
        let (task, proc) = match strategy {
            PlacementStrategy::GeneralizedDynamicLevel => {
                let mut best = f64::NEG_INFINITY;
                let mut pick = (ready[0], 0);
                for &t in &ready {
                    let (gdl, pm) = dynamic_level::generalized_dynamic_level(
                        ctx, t, &schedule, lookahead, insertion, &pending,
                    );
                    if gdl > best {
                        best = gdl;
                        pick = (t, pm);
                    }
                }
                pick
            }
            _ => {
                let mut best = f64::NEG_INFINITY;
                let mut pick = (ready[0], 0);
                for &t in &ready {
                    for p in 0..ctx.graph.nbproc() {
                        let dl = dynamic_level(
                            ctx, t, p, &schedule, lookahead, insertion, &pending, false,
                        );
                        if dl > best {
                            best = dl;
                            pick = (t, p);
                        }
                    }
                }
                pick
            }
        };
        place_node(ctx, task, proc, &mut schedule, &mut pending, &mut ready, insertion);
    }
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostFunction, TaskGraphBuilder};
    use crate::ranking::{rank_tasks, PriorityStrategy};

    fn diamond_no_comm() -> TaskGraph {
        TaskGraphBuilder::new(4, 2)
            .with_edge(1, 2, 0.0)
            .with_edge(1, 3, 0.0)
            .with_edge(2, 4, 0.0)
            .with_edge(3, 4, 0.0)
            .with_cost_matrix(vec![vec![2.0, 2.0]; 4])
            .with_uniform_links(1.0, 0.0)
            .build()
            .unwrap()
    }

    fn schedule_with(
        g: &TaskGraph,
        strategy: PlacementStrategy,
        bim_selection: bool,
        insertion: bool,
    ) -> Schedule {
        let d = CostFunction::Mean.derive(g);
        let ranked = rank_tasks(g, &d, PriorityStrategy::UpwardRank);
        let ctx = PlacementContext {
            graph: g,
            derived: &d,
            ranks: &ranked.ranks,
        };
        place(
            &ctx,
            &ranked.order,
            strategy,
            Lookahead::None,
            bim_selection,
            insertion,
        )
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(
            "BIM*".parse::<PlacementStrategy>().unwrap(),
            PlacementStrategy::BimStar
        );
        assert_eq!(
            "serial".parse::<PlacementStrategy>().unwrap(),
            PlacementStrategy::Serial
        );
        assert!(matches!(
            "HEFT".parse::<PlacementStrategy>(),
            Err(ScheduleError::UnknownPlacementStrategy(_))
        ));
    }

    #[test]
    fn test_eft_overlaps_parallel_branches() {
        // two cost-2 branches with free communication run side by side
        let g = diamond_no_comm();
        let s = schedule_with(&g, PlacementStrategy::Eft, false, false);
        assert!(s.is_complete());
        assert_eq!(s.get(4).unwrap().eft, 6.0);
        // branches 2 and 3 land on different processors
        assert_ne!(s.get(2).unwrap().proc, s.get(3).unwrap().proc);
    }

    #[test]
    fn test_every_strategy_completes() {
        let g = diamond_no_comm();
        for strategy in [
            PlacementStrategy::Eft,
            PlacementStrategy::Olb,
            PlacementStrategy::Met,
            PlacementStrategy::BimStar,
            PlacementStrategy::DynamicLevel,
            PlacementStrategy::GeneralizedDynamicLevel,
            PlacementStrategy::Serial,
        ] {
            for bim_selection in [false, true] {
                let s = schedule_with(&g, strategy, bim_selection, true);
                assert!(s.is_complete(), "{} incomplete", strategy.name());
            }
        }
    }

    #[test]
    fn test_update_ready_waits_for_all_predecessors() {
        let g = diamond_no_comm();
        let mut ready = vec![2, 3];
        let mut pending = vec![4];
        // 4 has predecessor 3 still in the ready list
        update_ready(&g, &mut ready, &mut pending, 2, true);
        ready.retain(|&t| t != 2);
        assert_eq!(ready, vec![3]);
        assert_eq!(pending, vec![4]);
        ready.retain(|&t| t != 3);
        update_ready(&g, &mut ready, &mut pending, 3, true);
        assert_eq!(ready, vec![4]);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_serial_uses_single_processor() {
        let g = diamond_no_comm();
        let s = schedule_with(&g, PlacementStrategy::Serial, false, false);
        assert_eq!(s.used_processors().len(), 1);
        assert_eq!(s.span(), 8.0);
    }

    #[test]
    fn test_met_prefers_cheapest_processor() {
        let g = TaskGraphBuilder::new(2, 2)
            .with_edge(1, 2, 1.0)
            .with_cost_matrix(vec![vec![5.0, 1.0], vec![1.0, 5.0]])
            .with_uniform_links(1.0, 0.0)
            .build()
            .unwrap();
        let s = schedule_with(&g, PlacementStrategy::Met, false, false);
        assert_eq!(s.get(1).unwrap().proc, 1);
        assert_eq!(s.get(2).unwrap().proc, 0);
    }
}

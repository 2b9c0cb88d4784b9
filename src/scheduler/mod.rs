//! Orchestration: one heuristic configuration, one entry point.
//!
//! `HeuristicConfig` names a full combination — priority strategy, cost
//! aggregation, placement rule, lookahead, BIM selection, insertion, BSA
//! — and `compute_schedule` runs it end to end: derive costs, rank, fix
//! the entry task at the head of the order, place, optionally improve.
//! This is the only module that knows every strategy by name.

pub mod metrics;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::lookahead::Lookahead;
use crate::models::{CostFunction, Schedule, TaskGraph};
use crate::placement::{place, PlacementContext, PlacementStrategy};
use crate::post_treatment::apply_bsa;
use crate::ranking::{rank_tasks, PriorityStrategy};

/// A complete heuristic combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeuristicConfig {
    pub priority: PriorityStrategy,
    pub cost_function: CostFunction,
    pub placement: PlacementStrategy,
    pub lookahead: Lookahead,
    /// Replace fixed priority order with k-th-smallest ready selection.
    pub bim_selection: bool,
    /// Allow slot insertion in the earliest-time engine.
    pub insertion: bool,
    /// Run the BSA improver on the finished schedule.
    pub post_treatment: bool,
}

impl Default for HeuristicConfig {
    /// Plain HEFT: upward rank, mean costs, EFT placement with insertion.
    fn default() -> Self {
        Self {
            priority: PriorityStrategy::UpwardRank,
            cost_function: CostFunction::Mean,
            placement: PlacementStrategy::Eft,
            lookahead: Lookahead::None,
            bim_selection: false,
            insertion: true,
            post_treatment: false,
        }
    }
}

impl HeuristicConfig {
    pub fn with_priority(mut self, priority: PriorityStrategy) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_cost_function(mut self, cost_function: CostFunction) -> Self {
        self.cost_function = cost_function;
        self
    }

    pub fn with_placement(mut self, placement: PlacementStrategy) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_lookahead(mut self, lookahead: Lookahead) -> Self {
        self.lookahead = lookahead;
        self
    }

    pub fn with_bim_selection(mut self, bim_selection: bool) -> Self {
        self.bim_selection = bim_selection;
        self
    }

    pub fn with_insertion(mut self, insertion: bool) -> Self {
        self.insertion = insertion;
        self
    }

    pub fn with_post_treatment(mut self, post_treatment: bool) -> Self {
        self.post_treatment = post_treatment;
        self
    }

    /// Compact identifier used in result tables:
    /// `prio-cost-placement[-BIM][-ins][-bsa]`.
    pub fn name(&self) -> String {
        let mut name = format!(
            "{}-{}-{}",
            self.priority.name(),
            self.cost_function.name(),
            self.placement.name()
        );
        if self.bim_selection {
            name.push_str("-BIM");
        }
        if self.insertion {
            name.push_str("-ins");
        }
        if self.post_treatment {
            name.push_str("-bsa");
        }
        name
    }
}

/// Runs one heuristic combination over a graph.
pub fn compute_schedule(
    graph: &TaskGraph,
    config: &HeuristicConfig,
) -> Result<Schedule, ScheduleError> {
    tracing::debug!(heuristic = %config.name(), tasks = graph.task_count(), "scheduling");
    let derived = config.cost_function.derive(graph);
    let ranked = rank_tasks(graph, &derived, config.priority);

    // the entry task leads regardless of its rank; nothing can be placed
    // before it anyway
    let entry = graph.entry_task();
    let mut order = ranked.order;
    order.retain(|&t| t != entry);
    order.insert(0, entry);

    let ctx = PlacementContext {
        graph,
        derived: &derived,
        ranks: &ranked.ranks,
    };
    let schedule = place(
        &ctx,
        &order,
        config.placement,
        config.lookahead,
        config.bim_selection,
        config.insertion,
    );
    let schedule = if config.post_treatment {
        apply_bsa(graph, &schedule)?
    } else {
        schedule
    };
    tracing::debug!(makespan = schedule.span(), "scheduled");
    Ok(schedule)
}

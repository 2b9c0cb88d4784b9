//! Schedule quality metrics.
//!
//! All of them normalize the makespan against some reference: SLR against
//! an optimistic critical-path lower bound, speedup against the best
//! single-processor run, the efficiency variants against the processor
//! budget (all of them, or only those the schedule touched).

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::models::{CostFunction, Schedule, TaskGraph};
use crate::ranking::critical_path;

/// Quality numbers for a finished schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMetrics {
    /// Finish time of the exit task.
    pub makespan: f64,
    /// Makespan over the min-cost critical-path length. 1.0 is the
    /// unreachable ideal; lower is better.
    pub slr: f64,
    /// Best sequential makespan over this makespan; higher is better.
    pub speedup: f64,
    /// Speedup divided by the total processor count.
    pub general_efficiency: f64,
    /// Speedup divided by the number of processors actually used.
    pub specific_efficiency: f64,
}

impl ScheduleMetrics {
    /// Computes all metrics for a complete schedule.
    pub fn calculate(graph: &TaskGraph, schedule: &Schedule) -> Result<Self, ScheduleError> {
        let exit = graph.exit_task();
        let makespan = schedule
            .get(exit)
            .ok_or(ScheduleError::TaskNotScheduled(exit))?
            .eft;

        // optimistic bound: every critical-path task at its cheapest
        let derived = CostFunction::MinMin.derive(graph);
        let cp_floor: f64 = critical_path(graph, &derived)
            .iter()
            .map(|&t| {
                graph
                    .cost_row(t)
                    .iter()
                    .copied()
                    .fold(f64::INFINITY, f64::min)
            })
            .sum();

        let sequential = sequential_schedule_length(graph);
        let speedup = sequential / makespan;
        Ok(Self {
            makespan,
            slr: makespan / cp_floor,
            speedup,
            general_efficiency: speedup / graph.nbproc() as f64,
            specific_efficiency: speedup / schedule.used_processors().len() as f64,
        })
    }
}

/// Makespan of running every task on the single processor minimizing the
/// total, the sequential baseline of the speedup metrics.
pub fn sequential_schedule_length(graph: &TaskGraph) -> f64 {
    (0..graph.nbproc())
        .map(|p| graph.tasks().map(|t| graph.cost(t, p)).sum())
        .fold(f64::INFINITY, f64::min)
}

//! Priority assignment: orders tasks before (or during) placement.
//!
//! Every strategy produces a `RankedTasks`: a priority order over all
//! tasks plus the rank values behind it. Ranks are scalar for most
//! strategies; the BIL strategy keeps one value per processor and exposes
//! them through the same `TaskRanks` accessor, which placement values
//! (BIM*, DL) consult per processor when available.
//!
//! Ties are broken by ascending task id everywhere: rank computations
//! traverse a deterministic lowest-id-first topological order and the
//! final sorts are stable over id-ordered input.
//!
//! # References
//!
//! - Topcuoglu, Hariri & Wu (2002), HEFT/CPOP upward and downward ranks
//! - Oh & Ha (1996), "A Static Scheduling Heuristic for Heterogeneous
//!   Processors" (BIL)

mod bil;
mod clustering;
mod critical_path;
mod rank;

pub use critical_path::critical_path;
pub(crate) use rank::{downward_rank, upward_rank};

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::models::{DerivedCosts, TaskGraph, TaskId};

/// Priority-assignment strategies (closed enumeration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityStrategy {
    /// Upward rank (`rku`): distance to the exit task.
    UpwardRank,
    /// Downward rank (`rkd`): distance from the entry task.
    DownwardRank,
    /// `rku - rkd`.
    UpwardMinusDownward,
    /// `rku + rkd`; the order is by `rku` alone, the combined value is
    /// what the ranks carry (and what critical-path extraction uses).
    UpwardPlusDownward,
    /// Bottom-level matrix (BIL): one value per task per processor.
    BottomLevel,
    /// Link-cost clustering by graph levels (cluHPS).
    LinkClustering,
    /// Plain topological order; rank = position. Tie-break baseline.
    Topological,
}

impl PriorityStrategy {
    /// Canonical name, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            PriorityStrategy::UpwardRank => "rku",
            PriorityStrategy::DownwardRank => "rkd",
            PriorityStrategy::UpwardMinusDownward => "rkusd",
            PriorityStrategy::UpwardPlusDownward => "rkuad",
            PriorityStrategy::BottomLevel => "BIL",
            PriorityStrategy::LinkClustering => "cluHPS",
            PriorityStrategy::Topological => "random",
        }
    }
}

impl FromStr for PriorityStrategy {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rku" => Ok(PriorityStrategy::UpwardRank),
            "rkd" => Ok(PriorityStrategy::DownwardRank),
            "rkusd" => Ok(PriorityStrategy::UpwardMinusDownward),
            "rkuad" => Ok(PriorityStrategy::UpwardPlusDownward),
            "BIL" => Ok(PriorityStrategy::BottomLevel),
            "cluHPS" => Ok(PriorityStrategy::LinkClustering),
            "random" => Ok(PriorityStrategy::Topological),
            other => Err(ScheduleError::UnknownPriorityStrategy(other.to_string())),
        }
    }
}

/// Rank values produced by a priority strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskRanks {
    /// One value per task.
    Scalar(Vec<f64>),
    /// One value per task per processor (BIL).
    PerProcessor(Vec<Vec<f64>>),
}

impl TaskRanks {
    /// Rank of `task` as seen from `proc`: the per-processor entry when
    /// the strategy keeps one, the scalar otherwise.
    #[inline]
    pub fn value(&self, task: TaskId, proc: usize) -> f64 {
        match self {
            TaskRanks::Scalar(v) => v[task - 1],
            TaskRanks::PerProcessor(m) => m[task - 1][proc],
        }
    }
}

/// A priority order over all tasks plus the ranks that induced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTasks {
    /// All task ids, highest priority first.
    pub order: Vec<TaskId>,
    /// The rank values behind the order.
    pub ranks: TaskRanks,
}

/// Runs a priority strategy over a graph.
pub fn rank_tasks(
    graph: &TaskGraph,
    derived: &DerivedCosts,
    strategy: PriorityStrategy,
) -> RankedTasks {
    match strategy {
        PriorityStrategy::UpwardRank => {
            let rku = upward_rank(graph, derived);
            let order = sorted_by(graph, &rku, true);
            RankedTasks {
                order,
                ranks: TaskRanks::Scalar(rku),
            }
        }
        PriorityStrategy::DownwardRank => {
            let rkd = downward_rank(graph, derived);
            let order = sorted_by(graph, &rkd, false);
            RankedTasks {
                order,
                ranks: TaskRanks::Scalar(rkd),
            }
        }
        PriorityStrategy::UpwardMinusDownward => {
            let rku = upward_rank(graph, derived);
            let rkd = downward_rank(graph, derived);
            let diff: Vec<f64> = rku.iter().zip(&rkd).map(|(u, d)| u - d).collect();
            let order = sorted_by(graph, &diff, true);
            RankedTasks {
                order,
                ranks: TaskRanks::Scalar(diff),
            }
        }
        PriorityStrategy::UpwardPlusDownward => {
            // Sorted by rku alone; the stored ranks are the combined
            // totals consumed by critical-path extraction and BIM*.
            let rku = upward_rank(graph, derived);
            let order = sorted_by(graph, &rku, true);
            let rkd = downward_rank(graph, derived);
            let total: Vec<f64> = rku.iter().zip(&rkd).map(|(u, d)| u + d).collect();
            RankedTasks {
                order,
                ranks: TaskRanks::Scalar(total),
            }
        }
        PriorityStrategy::BottomLevel => {
            let bil = bil::compute_bil(graph);
            let min_bil: Vec<f64> = bil
                .iter()
                .map(|row| row.iter().copied().fold(f64::INFINITY, f64::min))
                .collect();
            let order = sorted_by(graph, &min_bil, true);
            RankedTasks {
                order,
                ranks: TaskRanks::PerProcessor(bil),
            }
        }
        PriorityStrategy::LinkClustering => {
            let (order, lc) = clustering::link_cost_order(graph, derived);
            RankedTasks {
                order,
                ranks: TaskRanks::Scalar(lc),
            }
        }
        PriorityStrategy::Topological => {
            let order = graph.topological_order();
            let mut position = vec![0.0; graph.task_count()];
            for (i, &t) in order.iter().enumerate() {
                position[t - 1] = i as f64;
            }
            RankedTasks {
                order,
                ranks: TaskRanks::Scalar(position),
            }
        }
    }
}

/// All task ids sorted by rank value; stable, so equal ranks stay in
/// ascending id order.
fn sorted_by(graph: &TaskGraph, values: &[f64], descending: bool) -> Vec<TaskId> {
    let mut order: Vec<TaskId> = graph.tasks().collect();
    order.sort_by(|&a, &b| {
        let cmp = values[a - 1]
            .partial_cmp(&values[b - 1])
            .unwrap_or(std::cmp::Ordering::Equal);
        if descending {
            cmp.reverse()
        } else {
            cmp
        }
    });
    order
}

//! Cost aggregation and the communication-cost model.
//!
//! Heuristics that rank tasks before placement cannot know which processor
//! a task will land on, so they work with scalar aggregates of the cost
//! matrices. `CostFunction` selects the aggregation; `DerivedCosts` is the
//! resulting value object, threaded explicitly through ranking and
//! placement (no shared mutable graph attributes).
//!
//! Compound names such as `maxmin` split into a computation-side prefix
//! and a communication-side suffix: `maxmin` aggregates computation costs
//! with `max` and bandwidth/latency with `min`. `mean` and `median` apply
//! to both sides.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::models::{TaskGraph, TaskId};

/// Aggregation applied to the computation and communication cost matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostFunction {
    /// Arithmetic mean on both sides.
    Mean,
    /// Median on both sides.
    Median,
    /// `min` computation / `min` communication.
    MinMin,
    /// `min` computation / `max` communication.
    MinMax,
    /// `max` computation / `min` communication.
    MaxMin,
    /// `max` computation / `max` communication.
    MaxMax,
}

impl CostFunction {
    /// Canonical name, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            CostFunction::Mean => "mean",
            CostFunction::Median => "median",
            CostFunction::MinMin => "minmin",
            CostFunction::MinMax => "minmax",
            CostFunction::MaxMin => "maxmin",
            CostFunction::MaxMax => "maxmax",
        }
    }

    /// Aggregates a computation-cost row.
    fn comp_aggregate(self, values: &[f64]) -> f64 {
        match self {
            CostFunction::Mean => mean(values),
            CostFunction::Median => median(values),
            CostFunction::MinMin | CostFunction::MinMax => min(values),
            CostFunction::MaxMin | CostFunction::MaxMax => max(values),
        }
    }

    /// Aggregates bandwidth or latency values.
    fn comm_aggregate(self, values: &[f64]) -> f64 {
        match self {
            CostFunction::Mean => mean(values),
            CostFunction::Median => median(values),
            CostFunction::MinMin | CostFunction::MaxMin => min(values),
            CostFunction::MinMax | CostFunction::MaxMax => max(values),
        }
    }

    /// Computes the derived cost aggregates for a graph.
    pub fn derive(self, graph: &TaskGraph) -> DerivedCosts {
        let mean_comp = graph
            .tasks()
            .map(|t| self.comp_aggregate(graph.cost_row(t)))
            .collect();
        let flat: Vec<f64> = graph
            .bandwidth_matrix()
            .iter()
            .flat_map(|row| row.iter().copied())
            .collect();
        DerivedCosts {
            mean_comp,
            mean_bandwidth: self.comm_aggregate(&flat),
            mean_latency: self.comm_aggregate(graph.latency_vector()),
        }
    }
}

impl FromStr for CostFunction {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mean" => Ok(CostFunction::Mean),
            "median" => Ok(CostFunction::Median),
            "minmin" => Ok(CostFunction::MinMin),
            "minmax" => Ok(CostFunction::MinMax),
            "maxmin" => Ok(CostFunction::MaxMin),
            "maxmax" => Ok(CostFunction::MaxMax),
            other => Err(ScheduleError::UnknownCostFunction(other.to_string())),
        }
    }
}

/// Scalar cost aggregates derived from a graph under one `CostFunction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedCosts {
    /// Aggregated computation cost per task (indexed `task - 1`).
    pub mean_comp: Vec<f64>,
    /// Aggregated bandwidth over all processor pairs.
    pub mean_bandwidth: f64,
    /// Aggregated startup latency over all processors.
    pub mean_latency: f64,
}

impl DerivedCosts {
    /// Aggregated computation cost of a task.
    #[inline]
    pub fn comp(&self, task: TaskId) -> f64 {
        self.mean_comp[task - 1]
    }

    /// Processor-agnostic communication cost of edge (i, j).
    #[inline]
    pub fn mean_comm_cost(&self, graph: &TaskGraph, i: TaskId, j: TaskId) -> f64 {
        self.mean_latency + graph.weight(i, j) / self.mean_bandwidth
    }
}

/// Exact communication cost of edge (i, j) between processors m and n.
///
/// Zero when both tasks share a processor, otherwise startup latency of
/// the sender plus transfer time at the pair's bandwidth. Allocation-free;
/// this sits on the hottest path of the EFT engine.
#[inline]
pub fn comm_cost(graph: &TaskGraph, i: TaskId, j: TaskId, m: usize, n: usize) -> f64 {
    if m == n {
        0.0
    } else {
        graph.latency(m) + graph.weight(i, j) / graph.bandwidth(m, n)
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

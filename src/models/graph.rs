//! Task-graph model.
//!
//! A `TaskGraph` is a directed acyclic graph over task identifiers
//! `1..=n`, annotated with per-task-per-processor computation costs and a
//! latency/bandwidth communication model between processor pairs.
//!
//! Graphs are immutable after construction: `TaskGraphBuilder::build`
//! validates dimensions, acyclicity, and the single-entry/single-exit
//! precondition, and caches the entry and exit tasks. A graph that fails
//! validation never reaches a scheduling strategy.
//!
//! # Reference
//! Kwok & Ahmad (1999), "Static Scheduling Algorithms for Allocating
//! Directed Task Graphs to Multiprocessors"

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Task identifier, 1-based (`1..=n`).
pub type TaskId = usize;

/// A weighted precedence edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Successor task.
    pub to: TaskId,
    /// Data volume transferred along the edge (non-negative).
    pub weight: f64,
}

/// A validated task DAG with heterogeneous cost annotations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskGraph {
    n: usize,
    nbproc: usize,
    succ: Vec<Vec<Edge>>,
    pred: Vec<Vec<TaskId>>,
    cost_matrix: Vec<Vec<f64>>,
    bandwidth: Vec<Vec<f64>>,
    latency: Vec<f64>,
    entry: TaskId,
    exit: TaskId,
}

impl TaskGraph {
    /// Number of tasks.
    #[inline]
    pub fn task_count(&self) -> usize {
        self.n
    }

    /// Number of processors.
    #[inline]
    pub fn nbproc(&self) -> usize {
        self.nbproc
    }

    /// All task ids, ascending.
    pub fn tasks(&self) -> impl Iterator<Item = TaskId> {
        1..=self.n
    }

    /// Entry task (the unique task without predecessors).
    #[inline]
    pub fn entry_task(&self) -> TaskId {
        self.entry
    }

    /// Exit task (the unique task without successors).
    #[inline]
    pub fn exit_task(&self) -> TaskId {
        self.exit
    }

    /// Outgoing edges of a task, ascending by successor id.
    #[inline]
    pub fn succ_edges(&self, task: TaskId) -> &[Edge] {
        &self.succ[task - 1]
    }

    /// Successor ids of a task, ascending.
    pub fn successors(&self, task: TaskId) -> impl Iterator<Item = TaskId> + '_ {
        self.succ[task - 1].iter().map(|e| e.to)
    }

    /// Predecessor ids of a task, ascending.
    #[inline]
    pub fn predecessors(&self, task: TaskId) -> &[TaskId] {
        &self.pred[task - 1]
    }

    /// Data volume on edge (i, j). Zero when the edge does not exist.
    #[inline]
    pub fn weight(&self, i: TaskId, j: TaskId) -> f64 {
        self.succ[i - 1]
            .iter()
            .find(|e| e.to == j)
            .map_or(0.0, |e| e.weight)
    }

    /// Computation cost of `task` on `proc`.
    #[inline]
    pub fn cost(&self, task: TaskId, proc: usize) -> f64 {
        self.cost_matrix[task - 1][proc]
    }

    /// Full cost row of a task (one entry per processor).
    #[inline]
    pub fn cost_row(&self, task: TaskId) -> &[f64] {
        &self.cost_matrix[task - 1]
    }

    /// Bandwidth between two processors.
    #[inline]
    pub fn bandwidth(&self, m: usize, n: usize) -> f64 {
        self.bandwidth[m][n]
    }

    /// Full bandwidth matrix.
    #[inline]
    pub fn bandwidth_matrix(&self) -> &[Vec<f64>] {
        &self.bandwidth
    }

    /// Communication startup latency of a processor.
    #[inline]
    pub fn latency(&self, m: usize) -> f64 {
        self.latency[m]
    }

    /// Full latency vector.
    #[inline]
    pub fn latency_vector(&self) -> &[f64] {
        &self.latency
    }

    /// Topological order with ascending-id tie-break.
    ///
    /// Kahn's algorithm over a min-heap of ready tasks, so the order is
    /// deterministic: among simultaneously available tasks the lowest id
    /// comes first.
    pub fn topological_order(&self) -> Vec<TaskId> {
        let mut indegree: Vec<usize> = (1..=self.n).map(|t| self.pred[t - 1].len()).collect();
        let mut heap: BinaryHeap<Reverse<TaskId>> = (1..=self.n)
            .filter(|&t| indegree[t - 1] == 0)
            .map(Reverse)
            .collect();
        let mut order = Vec::with_capacity(self.n);
        while let Some(Reverse(t)) = heap.pop() {
            order.push(t);
            for e in &self.succ[t - 1] {
                indegree[e.to - 1] -= 1;
                if indegree[e.to - 1] == 0 {
                    heap.push(Reverse(e.to));
                }
            }
        }
        order
    }
}

/// Builder for `TaskGraph` with build-time validation.
///
/// # Example
/// ```
/// use hetsched::models::TaskGraphBuilder;
///
/// let graph = TaskGraphBuilder::new(3, 2)
///     .with_edge(1, 2, 4.0)
///     .with_edge(2, 3, 1.0)
///     .with_cost_matrix(vec![vec![2.0, 3.0], vec![1.0, 1.0], vec![4.0, 2.0]])
///     .with_uniform_links(1.0, 0.0)
///     .build()
///     .unwrap();
/// assert_eq!(graph.entry_task(), 1);
/// assert_eq!(graph.exit_task(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct TaskGraphBuilder {
    n: usize,
    nbproc: usize,
    edges: Vec<(TaskId, TaskId, f64)>,
    cost_matrix: Vec<Vec<f64>>,
    bandwidth: Vec<Vec<f64>>,
    latency: Vec<f64>,
}

impl TaskGraphBuilder {
    /// Starts a builder for `n` tasks on `nbproc` processors.
    pub fn new(n: usize, nbproc: usize) -> Self {
        Self {
            n,
            nbproc,
            edges: Vec::new(),
            cost_matrix: Vec::new(),
            bandwidth: Vec::new(),
            latency: Vec::new(),
        }
    }

    /// Adds a precedence edge carrying `weight` units of data.
    pub fn with_edge(mut self, from: TaskId, to: TaskId, weight: f64) -> Self {
        self.edges.push((from, to, weight));
        self
    }

    /// Sets the n×Q computation-cost matrix.
    pub fn with_cost_matrix(mut self, matrix: Vec<Vec<f64>>) -> Self {
        self.cost_matrix = matrix;
        self
    }

    /// Sets the Q×Q bandwidth matrix.
    pub fn with_bandwidth(mut self, bandwidth: Vec<Vec<f64>>) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    /// Sets the per-processor latency vector.
    pub fn with_latency(mut self, latency: Vec<f64>) -> Self {
        self.latency = latency;
        self
    }

    /// Sets a uniform communication model: every processor pair gets the
    /// same bandwidth and every processor the same startup latency.
    pub fn with_uniform_links(mut self, bandwidth: f64, latency: f64) -> Self {
        self.bandwidth = vec![vec![bandwidth; self.nbproc]; self.nbproc];
        self.latency = vec![latency; self.nbproc];
        self
    }

    /// Validates and builds the graph.
    ///
    /// # Errors
    /// `ScheduleError::MalformedGraph` when dimensions are inconsistent,
    /// an edge endpoint is out of range, the graph has a cycle, or there
    /// is not exactly one entry and one exit task.
    pub fn build(self) -> Result<TaskGraph, ScheduleError> {
        let malformed = |msg: String| Err(ScheduleError::MalformedGraph(msg));
        let (n, q) = (self.n, self.nbproc);
        if n == 0 {
            return malformed("graph has no tasks".into());
        }
        if q == 0 {
            return malformed("graph has no processors".into());
        }
        if self.cost_matrix.len() != n || self.cost_matrix.iter().any(|row| row.len() != q) {
            return malformed(format!("cost matrix is not {n}x{q}"));
        }
        if self.bandwidth.len() != q || self.bandwidth.iter().any(|row| row.len() != q) {
            return malformed(format!("bandwidth matrix is not {q}x{q}"));
        }
        if self.latency.len() != q {
            return malformed(format!("latency vector does not have {q} entries"));
        }

        let mut succ: Vec<Vec<Edge>> = vec![Vec::new(); n];
        let mut pred: Vec<Vec<TaskId>> = vec![Vec::new(); n];
        for &(from, to, weight) in &self.edges {
            if from == 0 || from > n || to == 0 || to > n {
                return malformed(format!("edge ({from}, {to}) references an unknown task"));
            }
            if weight < 0.0 {
                return malformed(format!("edge ({from}, {to}) has negative weight {weight}"));
            }
            succ[from - 1].push(Edge { to, weight });
            pred[to - 1].push(from);
        }
        for list in &mut succ {
            list.sort_by_key(|e| e.to);
        }
        for list in &mut pred {
            list.sort_unstable();
        }

        let entries: Vec<TaskId> = (1..=n).filter(|&t| pred[t - 1].is_empty()).collect();
        let exits: Vec<TaskId> = (1..=n).filter(|&t| succ[t - 1].is_empty()).collect();
        if entries.len() != 1 {
            return malformed(format!(
                "expected exactly one entry task, found {:?}",
                entries
            ));
        }
        if exits.len() != 1 {
            return malformed(format!("expected exactly one exit task, found {:?}", exits));
        }

        let graph = TaskGraph {
            n,
            nbproc: q,
            succ,
            pred,
            cost_matrix: self.cost_matrix,
            bandwidth: self.bandwidth,
            latency: self.latency,
            entry: entries[0],
            exit: exits[0],
        };
        if graph.topological_order().len() != n {
            return malformed("precedence graph contains a cycle".into());
        }
        Ok(graph)
    }
}

//! Static list scheduling of task DAGs onto heterogeneous processors.
//!
//! Maps the tasks of a single-entry/single-exit DAG, with per-processor
//! computation costs and a bandwidth/latency link model, onto a fixed set
//! of processors so the exit task finishes early. A heuristic combination
//! is a priority strategy (rku, rkd, BIL, link clustering, ...), a cost
//! aggregation, a placement rule (EFT, OLB, MET, BIM*, DL, GDL, serial),
//! an optional lookahead, and optional BSA post-treatment.
//!
//! # Modules
//!
//! - **`models`**: `TaskGraph`, cost aggregation, `Schedule`
//! - **`ranking`**: priority strategies and critical-path extraction
//! - **`timing`**: the DFT/EFT engine with slot insertion
//! - **`placement`**: processor-selection strategies
//! - **`lookahead`**: DLS/DC and DCP placement-value corrections
//! - **`post_treatment`**: the BSA schedule improver
//! - **`validation`**: precedence/timing invariant checks
//! - **`scheduler`**: configuration, orchestration, metrics
//!
//! # Example
//!
//! ```
//! use hetsched::{compute_schedule, HeuristicConfig, TaskGraphBuilder};
//!
//! let graph = TaskGraphBuilder::new(3, 2)
//!     .with_edge(1, 2, 4.0)
//!     .with_edge(2, 3, 2.0)
//!     .with_cost_matrix(vec![vec![2.0, 3.0]; 3])
//!     .with_uniform_links(1.0, 0.5)
//!     .build()?;
//! let schedule = compute_schedule(&graph, &HeuristicConfig::default())?;
//! assert!(schedule.is_complete());
//! # Ok::<(), hetsched::ScheduleError>(())
//! ```
//!
//! # References
//!
//! - Topcuoglu, Hariri & Wu (2002), "Performance-Effective and
//!   Low-Complexity Task Scheduling for Heterogeneous Computing"
//! - Sih & Lee (1993), "A Compile-Time Scheduling Heuristic for
//!   Interconnection-Constrained Heterogeneous Processor Architectures"
//! - Oh & Ha (1996), "A Static Scheduling Heuristic for Heterogeneous
//!   Processors"

pub mod error;
pub mod lookahead;
pub mod models;
pub mod placement;
pub mod post_treatment;
pub mod ranking;
pub mod scheduler;
pub mod timing;
pub mod validation;

pub use error::{ScheduleError, ViolationKind};
pub use lookahead::Lookahead;
pub use models::{
    comm_cost, CostFunction, DerivedCosts, Edge, Placement, Schedule, TaskGraph, TaskGraphBuilder,
    TaskId,
};
pub use placement::{place, PlacementContext, PlacementStrategy};
pub use post_treatment::apply_bsa;
pub use ranking::{critical_path, rank_tasks, PriorityStrategy, RankedTasks, TaskRanks};
pub use scheduler::metrics::{sequential_schedule_length, ScheduleMetrics};
pub use scheduler::{compute_schedule, HeuristicConfig};
pub use validation::validate_schedule;

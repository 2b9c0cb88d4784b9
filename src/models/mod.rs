//! Scheduling domain models.
//!
//! Core data types for the scheduling problem and its solutions:
//!
//! | Type | Role |
//! |------|------|
//! | `TaskGraph` | validated task DAG with computation/communication costs |
//! | `CostFunction` / `DerivedCosts` | scalar cost aggregation for ranking |
//! | `Schedule` / `Placement` | task → (processor, est, eft) solution |

mod costs;
mod graph;
mod schedule;

pub use costs::{comm_cost, CostFunction, DerivedCosts};
pub use graph::{Edge, TaskGraph, TaskGraphBuilder, TaskId};
pub use schedule::{Placement, Schedule};

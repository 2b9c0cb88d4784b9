//! Error taxonomy for the scheduling engine.
//!
//! Strategy-selection errors (`Unknown*`) mean the caller passed a name
//! outside the closed strategy enumeration — they fail fast, never fall
//! back to a default. `InvariantViolation` and `PostTreatmentRegression`
//! indicate an algorithmic bug in a placement strategy or in BSA and abort
//! the current scheduling attempt.

use thiserror::Error;

use crate::models::TaskId;

/// Errors produced by the scheduling core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    /// Unrecognized cost-aggregation function name.
    #[error("unknown cost function `{0}`")]
    UnknownCostFunction(String),

    /// Unrecognized priority-assignment strategy name.
    #[error("unknown priority strategy `{0}`")]
    UnknownPriorityStrategy(String),

    /// Unrecognized placement strategy name.
    #[error("unknown placement strategy `{0}`")]
    UnknownPlacementStrategy(String),

    /// Unrecognized lookahead strategy name.
    #[error("unknown lookahead strategy `{0}`")]
    UnknownLookaheadStrategy(String),

    /// The task graph breaks a structural precondition (dimensions,
    /// acyclicity, single entry/exit). Detected at build time, before any
    /// strategy runs.
    #[error("malformed task graph: {0}")]
    MalformedGraph(String),

    /// A completed schedule breaks a timing or precedence invariant.
    #[error("schedule invariant violated for task {task} on processor {proc}: {kind}")]
    InvariantViolation {
        task: TaskId,
        proc: usize,
        kind: ViolationKind,
    },

    /// A task is missing from a schedule that should be complete.
    #[error("task {0} missing from the final schedule")]
    TaskNotScheduled(TaskId),

    /// BSA produced a worse makespan than its input — a hard internal
    /// consistency error, never returned as a usable schedule.
    #[error("post-treatment regressed makespan from {before} to {after}")]
    PostTreatmentRegression { before: f64, after: f64 },
}

/// Which invariant a schedule broke, with the violated bound.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViolationKind {
    /// The task starts before all predecessor data has arrived.
    #[error("starts at {start} before data-ready time {data_ready}")]
    StartsBeforeDataReady { data_ready: f64, start: f64 },

    /// The task starts before a specific predecessor's data arrives.
    #[error("starts at {start} before predecessor {pred} delivers at {required}")]
    PrecedenceGap {
        pred: TaskId,
        required: f64,
        start: f64,
    },

    /// Recorded finish time disagrees with start + processor cost.
    #[error("finishes at {actual_eft}, expected {expected_eft}")]
    WrongDuration { expected_eft: f64, actual_eft: f64 },

    /// Two tasks on the same processor occupy overlapping intervals.
    #[error("overlaps task {other} on the same processor")]
    Overlap { other: TaskId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = ScheduleError::UnknownPlacementStrategy("pft".into());
        assert_eq!(e.to_string(), "unknown placement strategy `pft`");

        let e = ScheduleError::InvariantViolation {
            task: 3,
            proc: 1,
            kind: ViolationKind::PrecedenceGap {
                pred: 2,
                required: 5.0,
                start: 4.0,
            },
        };
        let msg = e.to_string();
        assert!(msg.contains("task 3"));
        assert!(msg.contains("processor 1"));
        assert!(msg.contains("predecessor 2"));
    }

    #[test]
    fn test_regression_message() {
        let e = ScheduleError::PostTreatmentRegression {
            before: 10.0,
            after: 11.5,
        };
        assert!(e.to_string().contains("10"));
        assert!(e.to_string().contains("11.5"));
    }
}

//! Schedule validator.
//!
//! Checks a finished schedule against the correctness invariants every
//! placement strategy must uphold: completeness, duration consistency,
//! data-readiness, per-predecessor precedence, and same-processor
//! interval disjointness. A violation is a bug in a strategy, not bad
//! input, so validation stops at the first one and reports the task,
//! processor, and violated bound.

use crate::error::{ScheduleError, ViolationKind};
use crate::models::{comm_cost, Schedule, TaskGraph, TaskId};
use crate::timing::compute_dft;

const EPS: f64 = 1e-6;

/// Validates a complete schedule, failing on the first broken invariant.
pub fn validate_schedule(graph: &TaskGraph, schedule: &Schedule) -> Result<(), ScheduleError> {
    for t in graph.tasks() {
        if !schedule.contains(t) {
            return Err(ScheduleError::TaskNotScheduled(t));
        }
    }
    for t in graph.tasks() {
        check_task(graph, schedule, t)?;
    }
    for proc in 0..graph.nbproc() {
        check_disjoint(graph, schedule, proc)?;
    }
    Ok(())
}

fn check_task(graph: &TaskGraph, schedule: &Schedule, t: TaskId) -> Result<(), ScheduleError> {
    let p = schedule.get(t).ok_or(ScheduleError::TaskNotScheduled(t))?;
    let expected_eft = p.est + graph.cost(t, p.proc);
    if (p.eft - expected_eft).abs() > EPS {
        return Err(ScheduleError::InvariantViolation {
            task: t,
            proc: p.proc,
            kind: ViolationKind::WrongDuration {
                expected_eft,
                actual_eft: p.eft,
            },
        });
    }
    let (dft, _) = compute_dft(graph, t, p.proc, schedule, false);
    if p.est < dft - EPS {
        return Err(ScheduleError::InvariantViolation {
            task: t,
            proc: p.proc,
            kind: ViolationKind::StartsBeforeDataReady {
                data_ready: dft,
                start: p.est,
            },
        });
    }
    for &pred in graph.predecessors(t) {
        let pp = schedule
            .get(pred)
            .ok_or(ScheduleError::TaskNotScheduled(pred))?;
        let required = pp.eft + comm_cost(graph, pred, t, pp.proc, p.proc);
        if p.est < required - EPS {
            return Err(ScheduleError::InvariantViolation {
                task: t,
                proc: p.proc,
                kind: ViolationKind::PrecedenceGap {
                    pred,
                    required,
                    start: p.est,
                },
            });
        }
    }
    Ok(())
}

fn check_disjoint(graph: &TaskGraph, schedule: &Schedule, proc: usize) -> Result<(), ScheduleError> {
    let mut on_proc: Vec<(TaskId, f64, f64)> = graph
        .tasks()
        .filter_map(|t| {
            schedule
                .get(t)
                .filter(|p| p.proc == proc)
                .map(|p| (t, p.est, p.eft))
        })
        .collect();
    on_proc.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    for w in on_proc.windows(2) {
        let (earlier, later) = (w[0], w[1]);
        if earlier.2 > later.1 + EPS {
            return Err(ScheduleError::InvariantViolation {
                task: later.0,
                proc,
                kind: ViolationKind::Overlap { other: earlier.0 },
            });
        }
    }
    Ok(())
}

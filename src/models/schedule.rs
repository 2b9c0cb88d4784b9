//! Schedule (solution) model.
//!
//! A schedule maps each task to a `Placement` (processor, earliest start,
//! earliest finish). It is built incrementally by placement strategies and
//! remembers assignment order, which the BSA post-treatment relies on when
//! it walks tasks "in original order" per processor.
//!
//! Entries are never mutated in place; the post-treatment replaces them
//! atomically via `remove` + `assign`.

use serde::{Deserialize, Serialize};

use crate::models::TaskId;

/// A single task assignment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Processor index (`0..Q`).
    pub proc: usize,
    /// Earliest start time.
    pub est: f64,
    /// Earliest finish time, `est + cost(task, proc)`.
    pub eft: f64,
}

/// A (partial or complete) schedule for a task graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    slots: Vec<Option<Placement>>,
    order: Vec<TaskId>,
}

impl Schedule {
    /// Creates an empty schedule for `task_count` tasks.
    pub fn new(task_count: usize) -> Self {
        Self {
            slots: vec![None; task_count],
            order: Vec::with_capacity(task_count),
        }
    }

    /// Number of tasks the schedule can hold.
    #[inline]
    pub fn task_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of tasks currently assigned.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no task is assigned yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether every task is assigned.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.order.len() == self.slots.len()
    }

    /// Assigns a task. A re-assignment of an already scheduled task moves
    /// it to the end of the assignment order.
    pub fn assign(&mut self, task: TaskId, placement: Placement) {
        if self.slots[task - 1].is_some() {
            self.order.retain(|&t| t != task);
        }
        self.slots[task - 1] = Some(placement);
        self.order.push(task);
    }

    /// Removes a task's assignment, returning it if present.
    pub fn remove(&mut self, task: TaskId) -> Option<Placement> {
        let removed = self.slots[task - 1].take();
        if removed.is_some() {
            self.order.retain(|&t| t != task);
        }
        removed
    }

    /// The placement of a task, if scheduled.
    #[inline]
    pub fn get(&self, task: TaskId) -> Option<&Placement> {
        self.slots[task - 1].as_ref()
    }

    /// Whether a task is scheduled.
    #[inline]
    pub fn contains(&self, task: TaskId) -> bool {
        self.slots[task - 1].is_some()
    }

    /// Scheduled tasks with their placements, in assignment order.
    pub fn tasks(&self) -> impl Iterator<Item = (TaskId, &Placement)> {
        self.order
            .iter()
            .map(|&t| (t, self.slots[t - 1].as_ref().expect("ordered task present")))
    }

    /// Tasks assigned to a processor, in assignment order.
    pub fn tasks_on(&self, proc: usize) -> Vec<TaskId> {
        self.order
            .iter()
            .copied()
            .filter(|&t| self.slots[t - 1].is_some_and(|p| p.proc == proc))
            .collect()
    }

    /// Busy intervals `(est, eft)` on a processor, sorted by descending
    /// start time — the shape the slot-insertion scan expects.
    pub fn intervals_on(&self, proc: usize) -> Vec<(f64, f64)> {
        let mut intervals: Vec<(f64, f64)> = self
            .slots
            .iter()
            .flatten()
            .filter(|p| p.proc == proc)
            .map(|p| (p.est, p.eft))
            .collect();
        intervals.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        intervals
    }

    /// Latest finish time on a processor, `None` when idle.
    pub fn latest_finish_on(&self, proc: usize) -> Option<f64> {
        self.slots
            .iter()
            .flatten()
            .filter(|p| p.proc == proc)
            .map(|p| p.eft)
            .fold(None, |acc, eft| Some(acc.map_or(eft, |a: f64| a.max(eft))))
    }

    /// Latest finish time across all assignments (0.0 when empty).
    pub fn span(&self) -> f64 {
        self.slots
            .iter()
            .flatten()
            .map(|p| p.eft)
            .fold(0.0, f64::max)
    }

    /// Distinct processors with at least one task, in first-use order.
    pub fn used_processors(&self) -> Vec<usize> {
        let mut procs = Vec::new();
        for &t in &self.order {
            if let Some(p) = self.slots[t - 1] {
                if !procs.contains(&p.proc) {
                    procs.push(p.proc);
                }
            }
        }
        procs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Schedule {
        let mut s = Schedule::new(4);
        s.assign(
            1,
            Placement {
                proc: 0,
                est: 0.0,
                eft: 2.0,
            },
        );
        s.assign(
            3,
            Placement {
                proc: 1,
                est: 2.5,
                eft: 4.5,
            },
        );
        s.assign(
            2,
            Placement {
                proc: 0,
                est: 2.0,
                eft: 4.0,
            },
        );
        s
    }

    #[test]
    fn test_assignment_order_preserved() {
        let s = sample();
        let order: Vec<TaskId> = s.tasks().map(|(t, _)| t).collect();
        assert_eq!(order, vec![1, 3, 2]);
        assert_eq!(s.tasks_on(0), vec![1, 2]);
    }

    #[test]
    fn test_intervals_sorted_descending() {
        let s = sample();
        assert_eq!(s.intervals_on(0), vec![(2.0, 4.0), (0.0, 2.0)]);
        assert!(s.intervals_on(3).is_empty());
    }

    #[test]
    fn test_remove_and_reassign_moves_to_end() {
        let mut s = sample();
        let old = s.remove(1).unwrap();
        assert_eq!(old.proc, 0);
        assert!(!s.contains(1));
        s.assign(
            1,
            Placement {
                proc: 1,
                est: 0.0,
                eft: 2.0,
            },
        );
        let order: Vec<TaskId> = s.tasks().map(|(t, _)| t).collect();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[test]
    fn test_span_and_latest_finish() {
        let s = sample();
        assert_eq!(s.span(), 4.5);
        assert_eq!(s.latest_finish_on(0), Some(4.0));
        assert_eq!(s.latest_finish_on(1), Some(4.5));
        assert_eq!(Schedule::new(2).latest_finish_on(0), None);
    }

    #[test]
    fn test_completeness() {
        let mut s = sample();
        assert!(!s.is_complete());
        s.assign(
            4,
            Placement {
                proc: 0,
                est: 6.0,
                eft: 8.0,
            },
        );
        assert!(s.is_complete());
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn test_used_processors_first_use_order() {
        let s = sample();
        assert_eq!(s.used_processors(), vec![0, 1]);
    }

    #[test]
    fn test_serde_round_trip() {
        let s = sample();
        let json = serde_json::to_string(&s).unwrap();
        let back: Schedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}

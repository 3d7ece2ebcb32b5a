//! Roster and assignment records.
//!
//! A roster is the engine's output for one iteration: an ordered list of
//! assignment records plus aggregate totals. It is rebuilt from scratch
//! every iteration; nothing here mutates a prior roster.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{EmploymentClass, Station, HORIZON_DAYS};

/// How an assignment's day is categorized on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentStatus {
    Scheduled,
    Weekend,
}

/// One worker on one shift on one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub date: NaiveDate,
    /// Weekday name for the date, denormalized for output.
    pub weekday: String,
    pub worker_id: String,
    pub worker_name: String,
    pub class: EmploymentClass,
    pub shift_code: String,
    /// Wall-clock range string from the catalog, or empty when uncatalogued.
    pub shift_time: String,
    pub hours: f64,
    pub store: String,
    pub station: Station,
    pub manager: String,
    pub status: AssignmentStatus,
}

/// A complete generated schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    pub assignments: Vec<Assignment>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Total number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Sum of assigned hours across the roster.
    pub fn total_hours(&self) -> f64 {
        self.assignments.iter().map(|a| a.hours).sum()
    }

    /// Number of distinct workers holding at least one shift.
    pub fn distinct_workers(&self) -> usize {
        self.assignments
            .iter()
            .map(|a| a.worker_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// The assignment held by a worker on a date, if any.
    pub fn assignment_for(&self, worker_id: &str, date: NaiveDate) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| a.worker_id == worker_id && a.date == date)
    }

    /// All assignments held by a worker, in insertion order.
    pub fn assignments_for_worker(&self, worker_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.worker_id == worker_id)
            .collect()
    }
}

/// Maps a calendar date to its 1-based day index within the horizon.
///
/// Returns `None` for dates before the start or past day 14.
pub fn day_index(start: NaiveDate, date: NaiveDate) -> Option<u8> {
    let offset = (date - start).num_days();
    if (0..HORIZON_DAYS as i64).contains(&offset) {
        Some(offset as u8 + 1)
    } else {
        None
    }
}

/// Whether a date falls on Saturday or Sunday.
pub(crate) fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun)
}

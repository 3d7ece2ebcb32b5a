//! Run context.
//!
//! One value threaded through a whole run, collecting what the engine
//! declined to assign and per-iteration statistics. This replaces any
//! ambient state: two runs never share anything.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Why the engine declined to assign a worker on a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The (worker, date) pair is blacklisted from a prior iteration.
    Blacklisted,
    /// A problematic shift code with no workable substitute, late in the run.
    UnresolvedProblematic,
    /// The date was rest-flagged for this worker in a prior iteration.
    RestFlagged,
    /// Assigning would leave too little rest before or after a neighbor shift.
    InsufficientRest { observed_hours: f64, required_hours: f64 },
    /// Assigning would push the worker past the daily hour cap.
    DailyCap { would_be_hours: f64 },
    /// Assigning would push the worker past their ISO-week cap.
    WeeklyCap { would_be_hours: f64, cap: f64 },
    /// Every eligible store already has this station at its ceiling.
    StationSaturated { store: String, station: String },
}

/// One declined assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkipRecord {
    pub iteration: u32,
    pub worker_id: String,
    pub date: NaiveDate,
    pub reason: SkipReason,
}

/// Per-iteration summary recorded by the controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationStats {
    pub iteration: u32,
    pub assignments: usize,
    pub violations: usize,
    /// Violations not previously seen this run.
    pub new_violations: usize,
}

/// Mutable observability state for one scheduling run.
#[derive(Debug, Default)]
pub struct RunContext {
    pub skips: Vec<SkipRecord>,
    pub iterations: Vec<IterationStats>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a declined assignment.
    pub fn record_skip(
        &mut self,
        iteration: u32,
        worker_id: &str,
        date: NaiveDate,
        reason: SkipReason,
    ) {
        log::debug!("iteration {iteration}: skipped {worker_id} on {date}: {reason:?}");
        self.skips.push(SkipRecord {
            iteration,
            worker_id: worker_id.to_string(),
            date,
            reason,
        });
    }

    /// Skips recorded during one iteration.
    pub fn skips_in(&self, iteration: u32) -> impl Iterator<Item = &SkipRecord> {
        self.skips.iter().filter(move |s| s.iteration == iteration)
    }
}

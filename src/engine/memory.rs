//! Violation memory carried across iterations.
//!
//! After each validation pass the controller feeds the findings in here.
//! The engine consults the derived structures on the next pass so the same
//! mistake is not repeated: blacklisted days, problematic shift codes,
//! learned code preferences, rest-flagged dates, and length corrections.

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

use crate::models::{LengthBound, Severity, Station, Violation, ViolationKey, ViolationKind};

/// What previous iterations taught the engine.
#[derive(Debug, Default)]
pub struct IterationMemory {
    /// (worker, date) pairs to never assign again.
    blacklist: HashSet<(String, NaiveDate)>,
    /// Learned shift-code preference per (worker, date).
    preferred: HashMap<(String, NaiveDate), String>,
    /// (worker, date, shift code) combinations that drew a violation.
    problematic: HashSet<(String, NaiveDate, String)>,
    /// Dates with rest findings, per worker.
    rest_flagged: HashMap<String, HashSet<NaiveDate>>,
    /// Observed out-of-band durations per (worker, date).
    length_issues: HashMap<(String, NaiveDate), (f64, LengthBound)>,
    /// Stations reported under-staffed somewhere in the horizon.
    deficient_stations: HashSet<Station>,
    /// Every violation key seen this run, for deduplication.
    seen: HashSet<ViolationKey>,
}

impl IterationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a validation pass into memory.
    ///
    /// Returns how many findings were new this run; repeats of an already
    /// seen (worker, date, kind, code) key count as zero.
    pub fn absorb(&mut self, violations: &[Violation]) -> usize {
        let mut newly_seen = 0;
        for v in violations {
            if self.seen.insert(v.key()) {
                newly_seen += 1;
            }
            self.index(v);
        }
        newly_seen
    }

    fn index(&mut self, v: &Violation) {
        match (&v.kind, &v.worker, v.date) {
            (ViolationKind::Availability { requested }, Some(worker), Some(date)) => {
                // Only a critical finding (unrequested day) blacklists the
                // pair; a code mismatch just marks the combination and
                // records the code the worker wanted.
                if v.severity == Severity::Critical {
                    self.blacklist.insert((worker.clone(), date));
                }
                if let Some(code) = &v.shift_code {
                    self.problematic.insert((worker.clone(), date, code.to_uppercase()));
                }
                if let Some(req) = requested {
                    self.preferred.insert((worker.clone(), date), req.to_uppercase());
                }
            }
            (ViolationKind::RestPeriod { .. }, Some(worker), Some(date)) => {
                self.rest_flagged.entry(worker.clone()).or_default().insert(date);
            }
            (ViolationKind::ShiftLength { observed_hours, bound }, Some(worker), Some(date)) => {
                self.length_issues
                    .insert((worker.clone(), date), (*observed_hours, *bound));
            }
            (ViolationKind::StoreCoverage { missing, .. }, _, _) => {
                for station in missing {
                    self.deficient_stations.insert(Station::from(station.as_str()));
                }
            }
            _ => {}
        }
    }

    pub fn is_blacklisted(&self, worker: &str, date: NaiveDate) -> bool {
        self.blacklist.contains(&(worker.to_string(), date))
    }

    pub fn preferred_for(&self, worker: &str, date: NaiveDate) -> Option<&str> {
        self.preferred
            .get(&(worker.to_string(), date))
            .map(String::as_str)
    }

    pub fn is_problematic(&self, worker: &str, date: NaiveDate, code: &str) -> bool {
        self.problematic
            .contains(&(worker.to_string(), date, code.to_uppercase()))
    }

    pub fn is_rest_flagged(&self, worker: &str, date: NaiveDate) -> bool {
        self.rest_flagged
            .get(worker)
            .is_some_and(|dates| dates.contains(&date))
    }

    pub fn length_issue(&self, worker: &str, date: NaiveDate) -> Option<(f64, LengthBound)> {
        self.length_issues
            .get(&(worker.to_string(), date))
            .copied()
    }

    pub fn is_deficient(&self, station: &Station) -> bool {
        self.deficient_stations.contains(station)
    }

    /// Distinct violations absorbed so far this run.
    pub fn total_seen(&self) -> usize {
        self.seen.len()
    }
}

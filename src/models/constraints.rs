//! Constraint parameters.
//!
//! Every numeric limit the engine and validator enforce lives here so a run
//! can tighten or relax them without touching the algorithms.

use serde::{Deserialize, Serialize};

use super::EmploymentClass;

/// Rest threshold per controller iteration, hours.
///
/// Early iterations accept short rests to get coverage up; later iterations
/// escalate toward the statutory minimum. Indexed by iteration, with the
/// last entry applying from iteration 5 onward (capped at `min_rest_hours`).
const REST_ESCALATION: [f64; 5] = [7.0, 8.0, 8.5, 9.0, 9.5];

/// Numeric limits for a scheduling run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintParams {
    /// Shortest shift an accepted roster may contain, hours.
    pub min_shift_hours: f64,
    /// Longest shift an accepted roster may contain, hours.
    pub max_shift_hours: f64,
    /// Statutory minimum rest between consecutive working days, hours.
    pub min_rest_hours: f64,
    /// Total hours a worker may accumulate on one calendar day.
    pub daily_hour_cap: f64,
    /// ISO-week cap for full-time workers, hours.
    pub weekly_cap_full_time: f64,
    /// ISO-week cap for part-time workers, hours.
    pub weekly_cap_part_time: f64,
    /// ISO-week cap for casual workers, hours.
    pub weekly_cap_casual: f64,
    /// Distinct managers allowed per store per day.
    pub max_managers_per_store_per_day: usize,
}

impl Default for ConstraintParams {
    fn default() -> Self {
        Self {
            min_shift_hours: 3.0,
            max_shift_hours: 12.0,
            min_rest_hours: 10.0,
            daily_hour_cap: 12.0,
            weekly_cap_full_time: 38.0,
            weekly_cap_part_time: 30.0,
            weekly_cap_casual: 40.0,
            max_managers_per_store_per_day: 10,
        }
    }
}

impl ConstraintParams {
    /// The ISO-week hour cap for an employment class.
    pub fn weekly_cap(&self, class: EmploymentClass) -> f64 {
        match class {
            EmploymentClass::FullTime => self.weekly_cap_full_time,
            EmploymentClass::PartTime => self.weekly_cap_part_time,
            EmploymentClass::Casual => self.weekly_cap_casual,
        }
    }

    /// The rest threshold the engine enforces at a given iteration.
    ///
    /// Monotone non-decreasing in the iteration number and never above
    /// `min_rest_hours`.
    pub fn rest_threshold(&self, iteration: u32) -> f64 {
        let raw = REST_ESCALATION
            .get(iteration as usize)
            .copied()
            .unwrap_or(self.min_rest_hours);
        raw.min(self.min_rest_hours)
    }
}

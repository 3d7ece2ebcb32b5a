//! Typed compliance violations.
//!
//! The validator emits these; the controller keys its memory off them. Each
//! variant carries the data the engine needs to react, so no downstream code
//! ever has to parse a message string.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How serious a violation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Must be repaired before a roster can be approved.
    Critical,
    /// Should be repaired; does not block approval on its own.
    Warning,
}

/// Which end of the shift-length band was crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthBound {
    BelowMinimum,
    AboveMaximum,
}

/// The category of a violation, with its typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViolationKind {
    /// Assigned on a day the worker did not request, or a mismatched code.
    Availability { requested: Option<String> },
    /// A (store, date) with assignments but no manager on duty.
    ManagerCoverage { shift_time: String },
    /// A shift outside the legal duration band.
    ShiftLength { observed_hours: f64, bound: LengthBound },
    /// Too little rest between consecutive working days.
    RestPeriod { observed_hours: f64, required_hours: f64 },
    /// A store below its declared station minimums on a date.
    StoreCoverage { store: String, missing: Vec<String> },
}

/// One compliance finding against a roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub severity: Severity,
    /// Worker id, when the violation concerns a single worker.
    pub worker: Option<String>,
    pub date: Option<NaiveDate>,
    pub shift_code: Option<String>,
    pub message: String,
    pub recommendation: String,
}

/// Deduplication key for accumulating violations across iterations.
///
/// Two findings with the same worker, date, kind, and shift code are the
/// same problem regardless of which iteration surfaced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViolationKey {
    pub worker: Option<String>,
    pub date: Option<NaiveDate>,
    pub kind_label: &'static str,
    pub shift_code: Option<String>,
}

impl ViolationKind {
    /// Stable category label, used in keys and rendered output.
    pub fn label(&self) -> &'static str {
        match self {
            ViolationKind::Availability { .. } => "availability",
            ViolationKind::ManagerCoverage { .. } => "manager_coverage",
            ViolationKind::ShiftLength { .. } => "shift_length",
            ViolationKind::RestPeriod { .. } => "rest_period",
            ViolationKind::StoreCoverage { .. } => "store_coverage",
        }
    }
}

impl Violation {
    /// A worker scheduled outside their requested availability.
    ///
    /// Assigning an unrequested day is critical; a mismatched shift code on
    /// a requested day is a warning.
    pub fn availability(
        worker: impl Into<String>,
        date: NaiveDate,
        shift_code: impl Into<String>,
        requested: Option<String>,
    ) -> Self {
        let worker = worker.into();
        let shift_code = shift_code.into();
        let (message, severity) = match &requested {
            Some(req) => (
                format!("{worker} assigned {shift_code} on {date} but requested {req}"),
                Severity::Warning,
            ),
            None => (
                format!("{worker} assigned {shift_code} on {date} without requesting any shift"),
                Severity::Critical,
            ),
        };
        Self {
            kind: ViolationKind::Availability { requested },
            severity,
            worker: Some(worker),
            date: Some(date),
            shift_code: Some(shift_code),
            message,
            recommendation: "Reassign to a requested day or honor the requested shift code"
                .to_string(),
        }
    }

    /// A store/date with assignments but no manager on duty.
    pub fn manager_coverage(
        store: impl Into<String>,
        date: NaiveDate,
        shift_time: impl Into<String>,
    ) -> Self {
        let store = store.into();
        let shift_time = shift_time.into();
        Self {
            message: format!("No manager on duty at {store} on {date} ({shift_time})"),
            kind: ViolationKind::ManagerCoverage { shift_time },
            severity: Severity::Critical,
            worker: None,
            date: Some(date),
            shift_code: None,
            recommendation: format!("Assign a manager to {store} for that day"),
        }
    }

    /// A shift shorter than the minimum or longer than the maximum.
    pub fn shift_length(
        worker: impl Into<String>,
        date: NaiveDate,
        shift_code: impl Into<String>,
        observed_hours: f64,
        bound: LengthBound,
        limit: f64,
    ) -> Self {
        let worker = worker.into();
        let shift_code = shift_code.into();
        let message = match bound {
            LengthBound::BelowMinimum => format!(
                "{worker}'s {shift_code} shift on {date} is {observed_hours:.1}h, below the {limit:.1}h minimum"
            ),
            LengthBound::AboveMaximum => format!(
                "{worker}'s {shift_code} shift on {date} is {observed_hours:.1}h, above the {limit:.1}h maximum"
            ),
        };
        Self {
            kind: ViolationKind::ShiftLength { observed_hours, bound },
            severity: Severity::Critical,
            worker: Some(worker),
            date: Some(date),
            shift_code: Some(shift_code),
            message,
            recommendation: "Adjust the shift duration into the legal band".to_string(),
        }
    }

    /// Insufficient rest between two consecutive working days.
    pub fn rest_period(
        worker: impl Into<String>,
        date: NaiveDate,
        shift_code: impl Into<String>,
        observed_hours: f64,
        required_hours: f64,
    ) -> Self {
        let worker = worker.into();
        Self {
            message: format!(
                "{worker} has {observed_hours:.1}h rest before {date}, under the {required_hours:.1}h minimum"
            ),
            kind: ViolationKind::RestPeriod { observed_hours, required_hours },
            severity: Severity::Critical,
            worker: Some(worker),
            date: Some(date),
            shift_code: Some(shift_code.into()),
            recommendation: "Move one of the adjacent shifts to restore the rest period"
                .to_string(),
        }
    }

    /// A store below its declared station minimums on a date.
    pub fn store_coverage(
        store: impl Into<String>,
        date: NaiveDate,
        missing: Vec<String>,
    ) -> Self {
        let store = store.into();
        let stations = missing.join(", ");
        Self {
            message: format!("{store} is under minimum staffing on {date}: {stations}"),
            kind: ViolationKind::StoreCoverage { store, missing },
            severity: Severity::Warning,
            worker: None,
            date: Some(date),
            shift_code: None,
            recommendation: format!("Assign additional workers to: {stations}"),
        }
    }

    /// The deduplication key for this violation.
    pub fn key(&self) -> ViolationKey {
        ViolationKey {
            worker: self.worker.clone(),
            date: self.date,
            kind_label: self.kind.label(),
            shift_code: self.shift_code.clone(),
        }
    }
}

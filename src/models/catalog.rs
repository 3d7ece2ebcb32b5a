//! Shift catalog.
//!
//! Maps short shift codes (e.g. "1F") to a display name, a wall-clock time
//! range, and a duration in hours. Shift times are stored as raw strings and
//! parsed lazily: input data routinely carries placeholders like "TBD", and
//! an unparsable time must never block assignment. Checks that need a
//! parsed range simply skip entries that have none.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Codes workers treat as interchangeable full/half-day variants.
///
/// An assignment whose code differs from the request is not flagged when
/// either code belongs to this set.
const FLEXIBLE_CODES: [&str; 3] = ["1F", "2F", "3F"];

/// Whether a shift code belongs to the worker-flexible equivalence set.
pub fn is_flexible_code(code: &str) -> bool {
    FLEXIBLE_CODES.iter().any(|c| c.eq_ignore_ascii_case(code))
}

/// A catalog entry: one shift type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftDefinition {
    /// Short code (e.g. "1F", "S", "SC").
    pub code: String,
    /// Display name (e.g. "First Full Shift").
    pub name: String,
    /// Wall-clock range, "HH:MM - HH:MM". May be a placeholder.
    pub time: String,
    /// Duration in hours. Zero means unknown.
    pub hours: f64,
}

/// The full shift catalog for a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftCatalog {
    shifts: HashMap<String, ShiftDefinition>,
}

impl ShiftDefinition {
    /// Creates a catalog entry.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        time: impl Into<String>,
        hours: f64,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            time: time.into(),
            hours,
        }
    }

    /// Parses the stored time range, if it is well-formed.
    pub fn time_range(&self) -> Option<(NaiveTime, NaiveTime)> {
        parse_time_range(&self.time)
    }
}

impl ShiftCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a shift definition, keyed case-insensitively by code.
    pub fn with_shift(mut self, shift: ShiftDefinition) -> Self {
        self.shifts.insert(shift.code.to_uppercase(), shift);
        self
    }

    /// Looks up a shift by code (case-insensitive).
    pub fn get(&self, code: &str) -> Option<&ShiftDefinition> {
        self.shifts.get(&code.to_uppercase())
    }

    /// Number of catalogued shifts.
    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    /// The wall-clock range string for a code, if catalogued.
    pub fn shift_time(&self, code: &str) -> Option<&str> {
        self.get(code).map(|s| s.time.as_str())
    }

    /// Resolves the duration for a shift code.
    ///
    /// Uses the catalogued hours when present and positive. Otherwise falls
    /// back to name/code pattern heuristics, and finally to the minimum
    /// shift length so the engine never assigns a zero-hour shift.
    pub fn resolve_hours(&self, code: &str, min_shift_hours: f64) -> f64 {
        match self.get(code) {
            Some(def) if def.hours > 0.0 => def.hours,
            Some(def) => fallback_hours(code, &def.name, min_shift_hours),
            None => fallback_hours(code, "", min_shift_hours),
        }
    }
}

/// Duration heuristics for codes the catalog cannot resolve.
fn fallback_hours(code: &str, name: &str, min_shift_hours: f64) -> f64 {
    let code = code.to_lowercase();
    let name = name.to_lowercase();

    if name.contains("full") || code.contains("3f") {
        12.0
    } else if name.contains("half") || code.contains("1f") || code.contains("2f") {
        9.0
    } else if name.contains("shift change") || code.contains("sc") {
        9.0
    } else if code == "s" || name.contains("day") {
        8.5
    } else if code == "m" || name.contains("meeting") {
        8.0
    } else {
        min_shift_hours
    }
}

/// Parses a "HH:MM - HH:MM" range.
///
/// Returns `None` for anything malformed; callers treat that as "no time
/// information" rather than an error.
pub fn parse_time_range(s: &str) -> Option<(NaiveTime, NaiveTime)> {
    let (start, end) = s.split_once(" - ")?;
    let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").ok()?;
    let end = NaiveTime::parse_from_str(end.trim(), "%H:%M").ok()?;
    Some((start, end))
}

//! Worker model.
//!
//! A worker is the entity shifts are assigned to: an identity, an employment
//! class (which determines the weekly hour cap), a home station, and a
//! day-by-day availability map over the 14-day horizon.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Station, HORIZON_DAYS};

/// Raw availability values that mean "not available".
const OFF_MARKERS: [&str; 3] = ["/", "NA", ""];

/// A worker that can be assigned shifts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    /// Unique worker identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Employment classification (determines the weekly hour cap).
    pub class: EmploymentClass,
    /// Home station within a store.
    pub station: Station,
    /// Requested shift codes per horizon day.
    pub availability: Availability,
}

/// Employment classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentClass {
    /// Permanent full-time.
    FullTime,
    /// Permanent part-time.
    PartTime,
    /// Casual / on-call.
    Casual,
}

/// A worker's requested shifts across the horizon.
///
/// Maps day index (1..=14) to the requested shift code. An absent day means
/// the worker is unavailable; absence is a valid state, not an error. Off
/// markers in raw input ("/", "NA", blank) normalize to absence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Availability {
    days: BTreeMap<u8, String>,
}

impl Worker {
    /// Creates a worker with empty availability.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        class: EmploymentClass,
        station: Station,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            class,
            station,
            availability: Availability::default(),
        }
    }

    /// Sets the full availability map.
    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    /// Marks the worker as available for `code` on `day` (1..=14).
    pub fn available(mut self, day: u8, code: impl Into<String>) -> Self {
        self.availability.set(day, code);
        self
    }
}

impl std::fmt::Display for EmploymentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EmploymentClass::FullTime => "Full-Time",
            EmploymentClass::PartTime => "Part-Time",
            EmploymentClass::Casual => "Casual",
        };
        f.write_str(s)
    }
}

impl Availability {
    /// Creates an empty availability map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the requested shift code for a day.
    ///
    /// Off markers and days outside the horizon are ignored.
    pub fn set(&mut self, day: u8, code: impl Into<String>) {
        if day == 0 || day > HORIZON_DAYS {
            return;
        }
        let code = code.into();
        let trimmed = code.trim();
        if OFF_MARKERS.contains(&trimmed) {
            return;
        }
        self.days.insert(day, trimmed.to_string());
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, day: u8, code: impl Into<String>) -> Self {
        self.set(day, code);
        self
    }

    /// The requested shift code for a day, if the worker is available.
    pub fn requested(&self, day: u8) -> Option<&str> {
        self.days.get(&day).map(String::as_str)
    }

    /// Whether the worker requested `code` on any day of the horizon.
    pub fn offers(&self, code: &str) -> bool {
        self.days.values().any(|c| c.eq_ignore_ascii_case(code))
    }

    /// Number of days the worker is available.
    pub fn slot_count(&self) -> usize {
        self.days.len()
    }

    /// Iterates (day, requested code) in day order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &str)> {
        self.days.iter().map(|(&d, c)| (d, c.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_builder() {
        let w = Worker::new("E01", "Mia Chen", EmploymentClass::FullTime, Station::Kitchen)
            .available(1, "1F")
            .available(2, "S")
            .available(3, "/");

        assert_eq!(w.id, "E01");
        assert_eq!(w.availability.requested(1), Some("1F"));
        assert_eq!(w.availability.requested(2), Some("S"));
        assert_eq!(w.availability.requested(3), None);
        assert_eq!(w.availability.slot_count(), 2);
    }

    #[test]
    fn test_off_markers_normalized() {
        let mut a = Availability::new();
        a.set(1, "NA");
        a.set(2, "  ");
        a.set(3, "/");
        a.set(4, "3F");
        assert_eq!(a.slot_count(), 1);
        assert_eq!(a.requested(4), Some("3F"));
    }

    #[test]
    fn test_out_of_horizon_ignored() {
        let a = Availability::new().with(0, "1F").with(15, "1F").with(14, "1F");
        assert_eq!(a.slot_count(), 1);
        assert_eq!(a.requested(14), Some("1F"));
    }

    #[test]
    fn test_offers_case_insensitive() {
        let a = Availability::new().with(5, "1f");
        assert!(a.offers("1F"));
        assert!(a.offers("1f"));
        assert!(!a.offers("2F"));
    }

    #[test]
    fn test_iter_ordered() {
        let a = Availability::new().with(9, "S").with(2, "1F").with(5, "M");
        let days: Vec<u8> = a.iter().map(|(d, _)| d).collect();
        assert_eq!(days, vec![2, 5, 9]);
    }

    #[test]
    fn test_class_display() {
        assert_eq!(EmploymentClass::FullTime.to_string(), "Full-Time");
        assert_eq!(EmploymentClass::Casual.to_string(), "Casual");
    }
}

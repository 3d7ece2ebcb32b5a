//! Store profiles.
//!
//! A store declares per-station staffing minimums, a relative traffic
//! weight, and peak windows. The engine uses these to spread assignments
//! across stores; the validator and reporter check the minimums.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A work station within a store.
///
/// Serializes as its display string so station-keyed maps stay plain JSON
/// objects. Parsing is substring-based and tolerant of naming variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Station {
    Kitchen,
    Counter,
    Cafe,
    Dessert,
    /// Any station the built-in set does not cover.
    Other(String),
}

/// A daily window of elevated demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// A store and its staffing requirements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreProfile {
    /// Store name, used as its identifier.
    pub name: String,
    /// Minimum headcount per station, per day.
    pub station_minimums: BTreeMap<Station, u32>,
    /// Relative share of assignments this store should attract.
    pub traffic_weight: f64,
    /// Windows where overlapping shifts are favored.
    pub peak_windows: Vec<PeakWindow>,
}

impl Station {
    /// Display label, also the serialized form.
    pub fn label(&self) -> &str {
        match self {
            Station::Kitchen => "Kitchen",
            Station::Counter => "Counter",
            Station::Cafe => "Cafe",
            Station::Dessert => "Dessert",
            Station::Other(s) => s,
        }
    }
}

impl From<String> for Station {
    fn from(s: String) -> Self {
        let lower = s.to_lowercase();
        if lower.contains("kitchen") {
            Station::Kitchen
        } else if lower.contains("counter") {
            Station::Counter
        } else if lower.contains("cafe") || lower.contains("mccafe") {
            Station::Cafe
        } else if lower.contains("dessert") {
            Station::Dessert
        } else {
            Station::Other(s)
        }
    }
}

impl From<&str> for Station {
    fn from(s: &str) -> Self {
        Station::from(s.to_string())
    }
}

impl From<Station> for String {
    fn from(s: Station) -> Self {
        s.label().to_string()
    }
}

impl std::fmt::Display for Station {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl PeakWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Whether a shift's wall-clock range overlaps this window.
    pub fn overlaps(&self, shift_start: NaiveTime, shift_end: NaiveTime) -> bool {
        shift_start < self.end && self.start < shift_end
    }
}

impl StoreProfile {
    /// Creates a store with no minimums and unit traffic weight.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            station_minimums: BTreeMap::new(),
            traffic_weight: 1.0,
            peak_windows: Vec::new(),
        }
    }

    /// Declares a per-day minimum headcount for a station.
    pub fn with_minimum(mut self, station: Station, headcount: u32) -> Self {
        self.station_minimums.insert(station, headcount);
        self
    }

    /// Sets the relative traffic weight.
    pub fn with_traffic_weight(mut self, weight: f64) -> Self {
        self.traffic_weight = weight;
        self
    }

    /// Adds a peak demand window.
    pub fn with_peak_window(mut self, window: PeakWindow) -> Self {
        self.peak_windows.push(window);
        self
    }

    /// The declared minimum for a station, zero if undeclared.
    pub fn required(&self, station: &Station) -> u32 {
        self.station_minimums.get(station).copied().unwrap_or(0)
    }

    /// Whether this store declares a minimum for the station.
    pub fn declares(&self, station: &Station) -> bool {
        self.station_minimums.contains_key(station)
    }
}

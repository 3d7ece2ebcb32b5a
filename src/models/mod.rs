//! Rostering domain models.
//!
//! Provides the core data types for representing a shift-rostering problem
//! and its solution: workers with day-by-day availability, a shift catalog,
//! store profiles with station minimums, constraint parameters, the roster
//! itself, and typed compliance violations.
//!
//! Every type here is a plain immutable record. The engine, validator,
//! controller, and reporter all consume and produce these types only.

mod catalog;
mod constraints;
mod roster;
mod store;
mod violation;
mod worker;

pub use catalog::{is_flexible_code, parse_time_range, ShiftCatalog, ShiftDefinition};
pub use constraints::ConstraintParams;
pub use roster::{day_index, Assignment, AssignmentStatus, Roster};
pub(crate) use roster::is_weekend;
pub use store::{PeakWindow, Station, StoreProfile};
pub use violation::{LengthBound, Severity, Violation, ViolationKey, ViolationKind};
pub use worker::{Availability, EmploymentClass, Worker};

/// Fixed scheduling window: day indices run 1..=14 from the run's start date.
pub const HORIZON_DAYS: u8 = 14;

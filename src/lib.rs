//! Constraint-driven worker shift rostering.
//!
//! `shiftplan` assigns workers to shifts across a fixed 14-day horizon:
//! a greedy [`AssignmentEngine`] builds a roster from worker availability,
//! the [`validator`] checks it against legal and staffing constraints, and
//! the [`IterationController`] feeds the findings back into the next pass
//! until the roster is clean or the iteration bound is reached. A final
//! [`CoverageReport`] audits the result against the full availability
//! matrix.
//!
//! Generation is deterministic for a given input: all randomness comes from
//! an RNG seeded off the iteration number.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use shiftplan::models::{
//!     EmploymentClass, ShiftCatalog, ShiftDefinition, Station, StoreProfile, Worker,
//! };
//! use shiftplan::{CoverageReport, IterationController, RosterRequest, RunContext};
//!
//! let start = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
//! let req = RosterRequest::new(start)
//!     .with_catalog(
//!         ShiftCatalog::new()
//!             .with_shift(ShiftDefinition::new("1F", "First Full Shift", "06:00 - 15:00", 9.0)),
//!     )
//!     .with_store(StoreProfile::new("Riverside").with_minimum(Station::Kitchen, 1))
//!     .with_worker(
//!         Worker::new("E01", "Mia Chen", EmploymentClass::FullTime, Station::Kitchen)
//!             .available(1, "1F")
//!             .available(3, "1F"),
//!     );
//!
//! let mut ctx = RunContext::new();
//! let outcome = IterationController::new().run(&req, &mut ctx)?;
//! let report = CoverageReport::build(&outcome.roster, &req);
//!
//! assert_eq!(outcome.roster.assignment_count(), 2);
//! println!("{}", report.render());
//! # Ok::<(), shiftplan::RosterError>(())
//! ```

pub mod context;
pub mod controller;
pub mod engine;
pub mod error;
pub mod models;
pub mod report;
pub mod validator;

pub use context::{RunContext, SkipReason};
pub use controller::{IterationController, RosterOutcome};
pub use engine::{AssignmentEngine, IterationMemory, RosterRequest};
pub use error::RosterError;
pub use report::{CoverageReport, RosterStatus};
pub use validator::validate;

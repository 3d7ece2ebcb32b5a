//! Run-level errors.
//!
//! Only conditions that make a run impossible surface as errors. Everything
//! the engine merely declines to do is a [`SkipRecord`](crate::context::SkipRecord),
//! and everything the validator finds is a [`Violation`](crate::models::Violation).

use thiserror::Error;

/// Fatal conditions detected before the first iteration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("no workers available to schedule")]
    NoWorkers,
    #[error("no store profiles supplied")]
    NoStores,
}

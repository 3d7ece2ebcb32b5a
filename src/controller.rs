//! Iteration control.
//!
//! Drives the generate/validate loop: each pass rebuilds the roster from
//! scratch, validates it, folds the findings into memory, and either loops
//! or finalizes. The loop always terminates: a clean roster, the iteration
//! bound, or the optional early-stop heuristic ends it.

use crate::context::{IterationStats, RunContext};
use crate::engine::{AssignmentEngine, IterationMemory, RosterRequest};
use crate::error::RosterError;
use crate::models::{Roster, Violation};
use crate::validator::validate;

const DEFAULT_MAX_ITERATIONS: u32 = 5;

/// Early stop requires at least this many completed iterations.
const EARLY_STOP_MIN_ITERATION: u32 = 3;

/// Early stop requires coverage at or above this percentage.
const EARLY_STOP_COVERAGE: f64 = 90.0;

/// Early stop tolerates at most this many open violations.
const EARLY_STOP_MAX_VIOLATIONS: usize = 10;

/// Runs the generate/validate loop to a final roster.
#[derive(Debug, Clone)]
pub struct IterationController {
    max_iterations: u32,
    early_stop: bool,
}

/// The final roster and how the loop ended.
#[derive(Debug)]
pub struct RosterOutcome {
    pub roster: Roster,
    /// Violations still open against the final roster.
    pub violations: Vec<Violation>,
    /// Iterations actually executed.
    pub iterations: u32,
    /// Whether the final roster validated clean.
    pub converged: bool,
}

impl Default for IterationController {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            early_stop: false,
        }
    }
}

impl IterationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hard iteration bound (at least 1).
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    /// Enables stopping once coverage is high and few violations remain.
    pub fn with_early_stop(mut self, enabled: bool) -> Self {
        self.early_stop = enabled;
        self
    }

    /// Runs the loop and returns the final roster.
    ///
    /// Fails only when the request has no workers or no stores; every other
    /// problem surfaces as violations on the outcome.
    pub fn run(
        &self,
        req: &RosterRequest,
        ctx: &mut RunContext,
    ) -> Result<RosterOutcome, RosterError> {
        if req.workers.is_empty() {
            return Err(RosterError::NoWorkers);
        }
        if req.stores.is_empty() {
            return Err(RosterError::NoStores);
        }

        let engine = AssignmentEngine::new();
        let mut memory = IterationMemory::new();
        let total_slots: usize = req
            .workers
            .iter()
            .map(|w| w.availability.slot_count())
            .sum();

        let mut iteration = 0;
        loop {
            let roster = engine.generate(req, &memory, iteration, ctx);
            let violations = validate(&roster, req);
            let new_violations = memory.absorb(&violations);
            ctx.iterations.push(IterationStats {
                iteration,
                assignments: roster.assignment_count(),
                violations: violations.len(),
                new_violations,
            });
            log::info!(
                "iteration {iteration}: {} violations ({new_violations} new)",
                violations.len()
            );

            if violations.is_empty() {
                return Ok(RosterOutcome {
                    roster,
                    violations,
                    iterations: iteration + 1,
                    converged: true,
                });
            }

            let coverage = if total_slots == 0 {
                100.0
            } else {
                roster.assignment_count() as f64 / total_slots as f64 * 100.0
            };
            let stop_early = self.early_stop
                && iteration >= EARLY_STOP_MIN_ITERATION
                && coverage >= EARLY_STOP_COVERAGE
                && violations.len() <= EARLY_STOP_MAX_VIOLATIONS;

            if stop_early || iteration + 1 >= self.max_iterations {
                return Ok(RosterOutcome {
                    roster,
                    violations,
                    iterations: iteration + 1,
                    converged: false,
                });
            }
            iteration += 1;
        }
    }
}

//! Assignment engine.
//!
//! Builds a fresh roster for one iteration: seeded shuffle of workers, a
//! per-day greedy pass honoring availability, legal limits, and everything
//! the violation memory learned from prior iterations. All randomness comes
//! from a single RNG seeded off the iteration number, so a given iteration
//! always produces the same roster for the same inputs.

mod managers;
mod memory;
mod stores;

pub use managers::ManagerPool;
pub use memory::IterationMemory;
pub use stores::select_store;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

use crate::context::{RunContext, SkipReason};
use crate::models::{
    is_weekend, parse_time_range, Assignment, AssignmentStatus, ConstraintParams, LengthBound,
    Roster, ShiftCatalog, Station, StoreProfile, Worker, HORIZON_DAYS,
};

/// Base of the per-iteration RNG seed (seed = base + iteration).
pub const BASE_SEED: u64 = 42;

/// From this iteration on, a problematic shift with no workable substitute
/// is dropped instead of retried.
const PROBLEMATIC_SKIP_ITERATION: u32 = 4;

/// From this iteration on, rest-flagged dates are skipped outright.
const REST_FLAG_SKIP_ITERATION: u32 = 3;

/// Station capacity ceiling as a multiple of the declared minimum.
const STATION_CEILING_FACTOR: u32 = 3;

/// Ceiling for stations with no declared minimum.
const UNDECLARED_STATION_CEILING: u32 = 10;

/// A sibling station below this fraction of its minimum makes a saturated
/// station refuse further workers.
const CRITICAL_UNDERSTAFFING_RATIO: f64 = 0.5;

/// Everything a scheduling run needs as input.
#[derive(Debug, Clone)]
pub struct RosterRequest {
    pub workers: Vec<Worker>,
    pub stores: Vec<StoreProfile>,
    pub catalog: ShiftCatalog,
    pub params: ConstraintParams,
    /// Day 1 of the 14-day horizon.
    pub start_date: NaiveDate,
}

impl RosterRequest {
    /// Creates a request with default constraint parameters.
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            workers: Vec::new(),
            stores: Vec::new(),
            catalog: ShiftCatalog::new(),
            params: ConstraintParams::default(),
            start_date,
        }
    }

    pub fn with_worker(mut self, worker: Worker) -> Self {
        self.workers.push(worker);
        self
    }

    pub fn with_workers(mut self, workers: Vec<Worker>) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_store(mut self, store: StoreProfile) -> Self {
        self.stores.push(store);
        self
    }

    pub fn with_catalog(mut self, catalog: ShiftCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_params(mut self, params: ConstraintParams) -> Self {
        self.params = params;
        self
    }

    /// The calendar date for a 1-based horizon day index.
    pub fn date_for(&self, day: u8) -> NaiveDate {
        self.start_date + Duration::days(day as i64 - 1)
    }
}

/// The greedy roster generator.
#[derive(Debug, Default)]
pub struct AssignmentEngine;

impl AssignmentEngine {
    pub fn new() -> Self {
        Self
    }

    /// Generates the roster for one iteration.
    ///
    /// Never fails: every worker/day the engine cannot place becomes a skip
    /// record in the run context.
    ///
    /// # Panics
    ///
    /// Panics if the request names workers but no stores; go through
    /// [`IterationController::run`](crate::IterationController::run), which
    /// rejects that case up front.
    pub fn generate(
        &self,
        req: &RosterRequest,
        memory: &IterationMemory,
        iteration: u32,
        ctx: &mut RunContext,
    ) -> Roster {
        let mut rng = SmallRng::seed_from_u64(BASE_SEED + iteration as u64);
        let pool = ManagerPool::generate((req.workers.len() / 2).max(20), &mut rng);

        let mut shuffled: Vec<&Worker> = req.workers.iter().collect();
        shuffled.shuffle(&mut rng);

        let mut roster = Roster::new();
        let mut weekly: HashMap<(String, i32, u32), f64> = HashMap::new();
        let mut station_counts: HashMap<(String, NaiveDate, Station), u32> = HashMap::new();
        let mut managers: HashMap<(String, NaiveDate), Vec<String>> = HashMap::new();

        for day in 1..=HORIZON_DAYS {
            let date = req.date_for(day);
            // Workers on stations still short of a minimum today (or flagged
            // under-staffed by a prior iteration) go first, shuffle order
            // otherwise preserved.
            let (deficient, others): (Vec<&Worker>, Vec<&Worker>) =
                shuffled.iter().copied().partition(|w| {
                    memory.is_deficient(&w.station)
                        || station_deficient(&req.stores, date, &w.station, &station_counts)
                });
            let order: Vec<&Worker> = deficient.into_iter().chain(others).collect();
            for worker in &order {
                let Some(requested) = worker.availability.requested(day) else {
                    continue;
                };
                if memory.is_blacklisted(&worker.id, date) {
                    ctx.record_skip(iteration, &worker.id, date, SkipReason::Blacklisted);
                    continue;
                }

                let mut code = requested.to_uppercase();
                if memory.is_problematic(&worker.id, date, &code) {
                    match memory.preferred_for(&worker.id, date) {
                        Some(pref) if worker.availability.offers(pref) => {
                            code = pref.to_string();
                        }
                        _ if iteration >= PROBLEMATIC_SKIP_ITERATION => {
                            ctx.record_skip(
                                iteration,
                                &worker.id,
                                date,
                                SkipReason::UnresolvedProblematic,
                            );
                            continue;
                        }
                        _ => {}
                    }
                } else if let Some(pref) = memory.preferred_for(&worker.id, date) {
                    if requested.eq_ignore_ascii_case(pref) {
                        code = pref.to_string();
                    }
                }

                let mut hours = req.catalog.resolve_hours(&code, req.params.min_shift_hours);
                if let Some((_, bound)) = memory.length_issue(&worker.id, date) {
                    hours = match bound {
                        LengthBound::BelowMinimum => req.params.min_shift_hours,
                        LengthBound::AboveMaximum => req.params.max_shift_hours,
                    };
                }
                hours = hours.clamp(req.params.min_shift_hours, req.params.max_shift_hours);

                if hours > req.params.daily_hour_cap {
                    ctx.record_skip(
                        iteration,
                        &worker.id,
                        date,
                        SkipReason::DailyCap { would_be_hours: hours },
                    );
                    continue;
                }

                let week = date.iso_week();
                let week_key = (worker.id.clone(), week.year(), week.week());
                let cap = req.params.weekly_cap(worker.class);
                let would_be = weekly.get(&week_key).copied().unwrap_or(0.0) + hours;
                if would_be > cap {
                    ctx.record_skip(
                        iteration,
                        &worker.id,
                        date,
                        SkipReason::WeeklyCap { would_be_hours: would_be, cap },
                    );
                    continue;
                }

                if memory.is_rest_flagged(&worker.id, date)
                    && iteration >= REST_FLAG_SKIP_ITERATION
                {
                    ctx.record_skip(iteration, &worker.id, date, SkipReason::RestFlagged);
                    continue;
                }
                let shift_range = req
                    .catalog
                    .shift_time(&code)
                    .and_then(parse_time_range);
                if let Some((start, _)) = shift_range {
                    if let Some(rest) =
                        rest_before(&roster, &worker.id, date, start)
                    {
                        let required = req.params.rest_threshold(iteration);
                        if rest < required {
                            ctx.record_skip(
                                iteration,
                                &worker.id,
                                date,
                                SkipReason::InsufficientRest {
                                    observed_hours: rest,
                                    required_hours: required,
                                },
                            );
                            continue;
                        }
                    }
                }

                let store = select_store(
                    &req.stores,
                    &worker.station,
                    shift_range,
                    iteration,
                    &mut rng,
                );
                let station_key = (store.name.clone(), date, worker.station.clone());
                let at_station = station_counts.get(&station_key).copied().unwrap_or(0);
                let declared = store.required(&worker.station);
                let ceiling = if declared > 0 {
                    declared * STATION_CEILING_FACTOR
                } else {
                    UNDECLARED_STATION_CEILING
                };
                if at_station >= ceiling
                    && sibling_critical(store, date, &worker.station, &station_counts)
                {
                    ctx.record_skip(
                        iteration,
                        &worker.id,
                        date,
                        SkipReason::StationSaturated {
                            store: store.name.clone(),
                            station: worker.station.to_string(),
                        },
                    );
                    continue;
                }

                let shift_time = req
                    .catalog
                    .shift_time(&code)
                    .unwrap_or_default()
                    .to_string();
                let on_duty = managers.entry((store.name.clone(), date)).or_default();
                let manager = if on_duty.len() < req.params.max_managers_per_store_per_day {
                    let name = pool.pick_new(on_duty, &mut rng).to_string();
                    on_duty.push(name.clone());
                    name
                } else {
                    on_duty[rng.random_range(0..on_duty.len())].clone()
                };

                *weekly.entry(week_key).or_insert(0.0) += hours;
                *station_counts.entry(station_key).or_insert(0) += 1;
                roster.push(Assignment {
                    date,
                    weekday: date.format("%A").to_string(),
                    worker_id: worker.id.clone(),
                    worker_name: worker.name.clone(),
                    class: worker.class,
                    shift_code: code,
                    shift_time,
                    hours,
                    store: store.name.clone(),
                    station: worker.station.clone(),
                    manager,
                    status: if is_weekend(date) {
                        AssignmentStatus::Weekend
                    } else {
                        AssignmentStatus::Scheduled
                    },
                });
            }
        }

        log::info!(
            "iteration {iteration}: generated {} assignments for {} workers",
            roster.assignment_count(),
            roster.distinct_workers()
        );
        roster
    }
}

/// Rest between the previous day's shift end and this shift's start, hours.
///
/// `None` when there is no previous-day assignment or its time range does
/// not parse; an unknown rest never blocks assignment.
fn rest_before(
    roster: &Roster,
    worker_id: &str,
    date: NaiveDate,
    shift_start: NaiveTime,
) -> Option<f64> {
    let prev = roster.assignment_for(worker_id, date - Duration::days(1))?;
    let (_, prev_end) = parse_time_range(&prev.shift_time)?;
    let prev_end_min = prev_end.hour() * 60 + prev_end.minute();
    let start_min = shift_start.hour() * 60 + shift_start.minute();
    Some(((24 * 60 - prev_end_min) + start_min) as f64 / 60.0)
}

/// Whether any store is still short of its declared minimum for this
/// station on this date.
fn station_deficient(
    stores: &[StoreProfile],
    date: NaiveDate,
    station: &Station,
    counts: &HashMap<(String, NaiveDate, Station), u32>,
) -> bool {
    stores.iter().any(|store| {
        let min = store.required(station);
        min > 0
            && counts
                .get(&(store.name.clone(), date, station.clone()))
                .copied()
                .unwrap_or(0)
                < min
    })
}

/// Whether any other declared station at this store/date sits below half
/// its minimum.
fn sibling_critical(
    store: &StoreProfile,
    date: NaiveDate,
    station: &Station,
    counts: &HashMap<(String, NaiveDate, Station), u32>,
) -> bool {
    store.station_minimums.iter().any(|(sibling, &min)| {
        sibling != station && {
            let staffed = counts
                .get(&(store.name.clone(), date, sibling.clone()))
                .copied()
                .unwrap_or(0);
            (staffed as f64) < min as f64 * CRITICAL_UNDERSTAFFING_RATIO
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmploymentClass, ShiftDefinition, Violation};
    use std::collections::HashSet;

    fn start() -> NaiveDate {
        // A Monday.
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    fn catalog() -> ShiftCatalog {
        ShiftCatalog::new()
            .with_shift(ShiftDefinition::new("1F", "First Full Shift", "06:00 - 15:00", 9.0))
            .with_shift(ShiftDefinition::new("3F", "Third Full Shift", "10:00 - 22:00", 12.0))
            .with_shift(ShiftDefinition::new("L", "Late Shift", "14:00 - 21:48", 7.8))
            .with_shift(ShiftDefinition::new("E", "Early Shift", "06:00 - 15:00", 9.0))
    }

    fn base_request() -> RosterRequest {
        RosterRequest::new(start())
            .with_store(StoreProfile::new("Riverside").with_traffic_weight(1.0))
            .with_catalog(catalog())
    }

    fn generate(req: &RosterRequest, memory: &IterationMemory, iteration: u32) -> Roster {
        let mut ctx = RunContext::new();
        AssignmentEngine::new().generate(req, memory, iteration, &mut ctx)
    }

    #[test]
    fn test_single_request_single_assignment() {
        let req = base_request().with_worker(
            Worker::new("E01", "Mia Chen", EmploymentClass::FullTime, Station::Kitchen)
                .available(1, "1F"),
        );
        let roster = generate(&req, &IterationMemory::new(), 0);

        assert_eq!(roster.assignment_count(), 1);
        let a = &roster.assignments[0];
        assert_eq!(a.date, start());
        assert_eq!(a.shift_code, "1F");
        assert_eq!(a.shift_time, "06:00 - 15:00");
        assert_eq!(a.hours, 9.0);
        assert_eq!(a.status, AssignmentStatus::Scheduled);
        assert!(!a.manager.is_empty());
    }

    #[test]
    fn test_blacklisted_pair_not_reassigned() {
        let req = base_request().with_worker(
            Worker::new("E01", "Mia Chen", EmploymentClass::FullTime, Station::Kitchen)
                .available(1, "1F")
                .available(3, "1F"),
        );

        let mut memory = IterationMemory::new();
        memory.absorb(&[Violation::availability("E01", start(), "1F", None)]);

        let mut ctx = RunContext::new();
        let roster = AssignmentEngine::new().generate(&req, &memory, 1, &mut ctx);

        assert!(roster.assignment_for("E01", start()).is_none());
        assert!(roster.assignment_for("E01", req.date_for(3)).is_some());
        assert!(ctx
            .skips
            .iter()
            .any(|s| s.worker_id == "E01" && s.reason == SkipReason::Blacklisted));
    }

    #[test]
    fn test_uncatalogued_full_day_code_gets_twelve_hours() {
        let req = RosterRequest::new(start())
            .with_store(StoreProfile::new("Riverside"))
            .with_worker(
                Worker::new("E01", "Mia Chen", EmploymentClass::FullTime, Station::Kitchen)
                    .available(1, "3F"),
            );
        // Catalog has no 3F entry at all.
        let roster = generate(&req, &IterationMemory::new(), 0);

        assert_eq!(roster.assignment_count(), 1);
        assert_eq!(roster.assignments[0].hours, 12.0);
    }

    #[test]
    fn test_rest_threshold_escalates_across_iterations() {
        // L ends 21:48, E starts 06:00 next day: 8.2h rest.
        let req = base_request().with_worker(
            Worker::new("E01", "Mia Chen", EmploymentClass::FullTime, Station::Kitchen)
                .available(1, "L")
                .available(2, "E"),
        );

        let early = generate(&req, &IterationMemory::new(), 0);
        assert_eq!(early.assignment_count(), 2);

        let mut ctx = RunContext::new();
        let late = AssignmentEngine::new().generate(&req, &IterationMemory::new(), 5, &mut ctx);
        assert_eq!(late.assignment_count(), 1);
        assert!(matches!(
            ctx.skips[0].reason,
            SkipReason::InsufficientRest { observed_hours, required_hours }
                if (observed_hours - 8.2).abs() < 1e-9 && required_hours == 10.0
        ));
    }

    #[test]
    fn test_weekly_cap_enforced() {
        // Full-time cap 38h, 12h shifts: at most 3 per ISO week.
        let mut worker =
            Worker::new("E01", "Mia Chen", EmploymentClass::FullTime, Station::Kitchen);
        for day in 1..=5 {
            worker = worker.available(day, "3F");
        }
        let req = base_request().with_worker(worker);
        let mut ctx = RunContext::new();
        let roster = AssignmentEngine::new().generate(&req, &IterationMemory::new(), 0, &mut ctx);

        assert_eq!(roster.assignment_count(), 3);
        assert_eq!(
            ctx.skips
                .iter()
                .filter(|s| matches!(s.reason, SkipReason::WeeklyCap { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_manager_cap_per_store_day() {
        let mut req = base_request();
        for i in 0..15 {
            req = req.with_worker(
                Worker::new(format!("E{i:02}"), format!("Worker {i}"), EmploymentClass::Casual, Station::Kitchen)
                    .available(1, "1F"),
            );
        }
        let roster = generate(&req, &IterationMemory::new(), 0);

        assert_eq!(roster.assignment_count(), 15);
        let managers: HashSet<&str> = roster
            .assignments
            .iter()
            .map(|a| a.manager.as_str())
            .collect();
        assert!(managers.len() <= 10);
    }

    #[test]
    fn test_deficient_station_workers_go_first() {
        let mut req = base_request();
        for i in 0..6 {
            req = req.with_worker(
                Worker::new(format!("C{i}"), format!("Counter {i}"), EmploymentClass::Casual, Station::Counter)
                    .available(1, "1F"),
            );
        }
        req = req.with_worker(
            Worker::new("K1", "Kitchen One", EmploymentClass::Casual, Station::Kitchen)
                .available(1, "1F"),
        );

        let mut memory = IterationMemory::new();
        memory.absorb(&[Violation::store_coverage(
            "Riverside",
            start(),
            vec!["Kitchen".to_string()],
        )]);

        let roster = generate(&req, &memory, 1);
        assert_eq!(roster.assignments[0].station, Station::Kitchen);
    }

    #[test]
    fn test_under_minimum_station_prioritized_within_run() {
        // Dessert has a declared minimum the run has not met yet, so the
        // dessert worker is considered before everyone else each day.
        let mut req = RosterRequest::new(start())
            .with_store(
                StoreProfile::new("Riverside").with_minimum(Station::Dessert, 6),
            )
            .with_catalog(catalog());
        for i in 0..6 {
            req = req.with_worker(
                Worker::new(format!("C{i}"), format!("Counter {i}"), EmploymentClass::Casual, Station::Counter)
                    .available(1, "1F"),
            );
        }
        req = req.with_worker(
            Worker::new("D1", "Dessert One", EmploymentClass::Casual, Station::Dessert)
                .available(1, "1F"),
        );

        let roster = generate(&req, &IterationMemory::new(), 0);
        assert_eq!(roster.assignments[0].station, Station::Dessert);
    }

    #[test]
    fn test_saturated_station_refused_when_sibling_starved() {
        let store = StoreProfile::new("Riverside")
            .with_minimum(Station::Kitchen, 1)
            .with_minimum(Station::Counter, 2);
        let mut req = RosterRequest::new(start())
            .with_store(store)
            .with_catalog(catalog());
        // Kitchen ceiling is 3; Counter stays empty and is critically short.
        for i in 0..5 {
            req = req.with_worker(
                Worker::new(format!("K{i}"), format!("Kitchen {i}"), EmploymentClass::Casual, Station::Kitchen)
                    .available(1, "1F"),
            );
        }

        let mut ctx = RunContext::new();
        let roster = AssignmentEngine::new().generate(&req, &IterationMemory::new(), 0, &mut ctx);

        assert_eq!(roster.assignment_count(), 3);
        assert!(ctx
            .skips
            .iter()
            .all(|s| matches!(s.reason, SkipReason::StationSaturated { .. })));
        assert_eq!(ctx.skips.len(), 2);
    }

    #[test]
    fn test_same_iteration_is_deterministic() {
        let mut req = base_request();
        for i in 0..8 {
            req = req.with_worker(
                Worker::new(format!("E{i:02}"), format!("Worker {i}"), EmploymentClass::PartTime, Station::Counter)
                    .available(1, "1F")
                    .available(2, "E")
                    .available(4, "L"),
            );
        }
        let a = generate(&req, &IterationMemory::new(), 2);
        let b = generate(&req, &IterationMemory::new(), 2);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_one_assignment_per_worker_per_date() {
        let mut req = base_request();
        for i in 0..5 {
            let mut w = Worker::new(
                format!("E{i:02}"),
                format!("Worker {i}"),
                EmploymentClass::Casual,
                Station::Counter,
            );
            for day in 1..=14 {
                w = w.available(day, "1F");
            }
            req = req.with_worker(w);
        }
        let roster = generate(&req, &IterationMemory::new(), 0);

        let mut seen = HashSet::new();
        for a in &roster.assignments {
            assert!(seen.insert((a.worker_id.clone(), a.date)));
        }
    }
}

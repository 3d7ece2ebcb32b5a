//! Roster validation.
//!
//! A pure scan of a completed roster against the request it was built from.
//! No mutation, no randomness: the same roster and request always yield the
//! same violations in the same order.

use chrono::{Duration, NaiveDateTime};
use std::collections::BTreeMap;

use crate::engine::RosterRequest;
use crate::models::{
    day_index, is_flexible_code, parse_time_range, Assignment, LengthBound, Roster, Violation,
    Worker, HORIZON_DAYS,
};

/// Checks a roster and returns every compliance finding.
pub fn validate(roster: &Roster, req: &RosterRequest) -> Vec<Violation> {
    let mut violations = Vec::new();
    let workers: BTreeMap<&str, &Worker> =
        req.workers.iter().map(|w| (w.id.as_str(), w)).collect();

    check_availability(roster, req, &workers, &mut violations);
    check_shift_lengths(roster, req, &mut violations);
    check_rest_periods(roster, req, &mut violations);
    check_manager_coverage(roster, &mut violations);
    check_store_coverage(roster, req, &mut violations);

    violations
}

/// (a) Every assignment must land on a requested day with the requested
/// code; a differing code is flagged only when neither code belongs to the
/// flexible set.
fn check_availability(
    roster: &Roster,
    req: &RosterRequest,
    workers: &BTreeMap<&str, &Worker>,
    out: &mut Vec<Violation>,
) {
    for a in &roster.assignments {
        let Some(worker) = workers.get(a.worker_id.as_str()) else {
            continue;
        };
        let Some(day) = day_index(req.start_date, a.date) else {
            continue;
        };
        match worker.availability.requested(day) {
            None => {
                out.push(Violation::availability(&a.worker_id, a.date, &a.shift_code, None));
            }
            Some(requested) => {
                let matches = requested.eq_ignore_ascii_case(&a.shift_code)
                    || is_flexible_code(requested)
                    || is_flexible_code(&a.shift_code);
                if !matches {
                    out.push(Violation::availability(
                        &a.worker_id,
                        a.date,
                        &a.shift_code,
                        Some(requested.to_uppercase()),
                    ));
                }
            }
        }
    }
}

/// (c) Shift durations must sit inside the legal band.
fn check_shift_lengths(roster: &Roster, req: &RosterRequest, out: &mut Vec<Violation>) {
    for a in &roster.assignments {
        if a.hours < req.params.min_shift_hours {
            out.push(Violation::shift_length(
                &a.worker_id,
                a.date,
                &a.shift_code,
                a.hours,
                LengthBound::BelowMinimum,
                req.params.min_shift_hours,
            ));
        } else if a.hours > req.params.max_shift_hours {
            out.push(Violation::shift_length(
                &a.worker_id,
                a.date,
                &a.shift_code,
                a.hours,
                LengthBound::AboveMaximum,
                req.params.max_shift_hours,
            ));
        }
    }
}

/// (d) Consecutive working days need the statutory rest between shift end
/// and next shift start. Assignments whose times do not parse are skipped.
fn check_rest_periods(roster: &Roster, req: &RosterRequest, out: &mut Vec<Violation>) {
    let mut by_worker: BTreeMap<&str, Vec<&Assignment>> = BTreeMap::new();
    for a in &roster.assignments {
        by_worker.entry(a.worker_id.as_str()).or_default().push(a);
    }

    for assignments in by_worker.values_mut() {
        assignments.sort_by_key(|a| a.date);
        for pair in assignments.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if next.date - prev.date != Duration::days(1) {
                continue;
            }
            let Some(end) = shift_end(prev) else { continue };
            let Some(start) = shift_start(next) else { continue };
            let rest = (start - end).num_minutes() as f64 / 60.0;
            if rest < req.params.min_rest_hours {
                out.push(Violation::rest_period(
                    &next.worker_id,
                    next.date,
                    &next.shift_code,
                    rest,
                    req.params.min_rest_hours,
                ));
            }
        }
    }
}

/// (b) Every (date, shift time) group with assignments needs a manager on
/// duty. Grouping by shift time keeps a staffed morning shift from masking
/// a manager-less evening shift on the same day.
fn check_manager_coverage(roster: &Roster, out: &mut Vec<Violation>) {
    let mut groups: BTreeMap<(chrono::NaiveDate, &str), Vec<&Assignment>> = BTreeMap::new();
    for a in &roster.assignments {
        groups
            .entry((a.date, a.shift_time.as_str()))
            .or_default()
            .push(a);
    }
    for ((date, shift_time), assignments) in groups {
        if assignments.iter().all(|a| a.manager.trim().is_empty()) {
            out.push(Violation::manager_coverage(
                &assignments[0].store,
                date,
                shift_time,
            ));
        }
    }
}

/// (e) Every store must meet its declared station minimums on each day the
/// roster has activity.
fn check_store_coverage(roster: &Roster, req: &RosterRequest, out: &mut Vec<Violation>) {
    for day in 1..=HORIZON_DAYS {
        let date = req.date_for(day);
        if !roster.assignments.iter().any(|a| a.date == date) {
            continue;
        }
        for store in &req.stores {
            let mut missing = Vec::new();
            for (station, &min) in &store.station_minimums {
                let staffed = roster
                    .assignments
                    .iter()
                    .filter(|a| a.date == date && a.store == store.name && a.station == *station)
                    .count() as u32;
                if staffed < min {
                    missing.push(station.label().to_string());
                }
            }
            if !missing.is_empty() {
                out.push(Violation::store_coverage(&store.name, date, missing));
            }
        }
    }
}

fn shift_start(a: &Assignment) -> Option<NaiveDateTime> {
    let (start, _) = parse_time_range(&a.shift_time)?;
    Some(a.date.and_time(start))
}

/// Shift end as a full datetime; an end time earlier than the start means
/// the shift crosses midnight.
fn shift_end(a: &Assignment) -> Option<NaiveDateTime> {
    let (start, end) = parse_time_range(&a.shift_time)?;
    let mut dt = a.date.and_time(end);
    if end <= start {
        dt += Duration::days(1);
    }
    Some(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AssignmentStatus, EmploymentClass, Severity, ShiftCatalog, ShiftDefinition, Station,
        StoreProfile, ViolationKind,
    };
    use chrono::NaiveDate;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    fn request() -> RosterRequest {
        RosterRequest::new(start())
            .with_store(
                StoreProfile::new("Riverside")
                    .with_minimum(Station::Kitchen, 1)
                    .with_minimum(Station::Counter, 2),
            )
            .with_catalog(
                ShiftCatalog::new()
                    .with_shift(ShiftDefinition::new("1F", "First Full Shift", "06:00 - 15:00", 9.0))
                    .with_shift(ShiftDefinition::new("2F", "Second Full Shift", "13:00 - 22:00", 9.0)),
            )
            .with_worker(
                Worker::new("E01", "Mia Chen", EmploymentClass::FullTime, Station::Kitchen)
                    .available(1, "1F")
                    .available(2, "1F"),
            )
    }

    fn assignment(
        worker_id: &str,
        date: NaiveDate,
        code: &str,
        time: &str,
        hours: f64,
        station: Station,
    ) -> Assignment {
        Assignment {
            date,
            weekday: date.format("%A").to_string(),
            worker_id: worker_id.to_string(),
            worker_name: worker_id.to_string(),
            class: EmploymentClass::FullTime,
            shift_code: code.to_string(),
            shift_time: time.to_string(),
            hours,
            store: "Riverside".to_string(),
            station,
            manager: "Alex Doyle".to_string(),
            status: AssignmentStatus::Scheduled,
        }
    }

    #[test]
    fn test_clean_single_day_roster() {
        let req = request()
            .with_worker(
                Worker::new("E02", "Ben Ortiz", EmploymentClass::PartTime, Station::Counter)
                    .available(1, "1F"),
            )
            .with_worker(
                Worker::new("E03", "Ada Okoye", EmploymentClass::Casual, Station::Counter)
                    .available(1, "1F"),
            );
        let mut roster = Roster::new();
        roster.push(assignment("E01", start(), "1F", "06:00 - 15:00", 9.0, Station::Kitchen));
        roster.push(assignment("E02", start(), "1F", "06:00 - 15:00", 9.0, Station::Counter));
        roster.push(assignment("E03", start(), "1F", "06:00 - 15:00", 9.0, Station::Counter));

        assert!(validate(&roster, &req).is_empty());
    }

    #[test]
    fn test_unrequested_day_flagged() {
        let req = request();
        let mut roster = Roster::new();
        // Day 5 was never requested.
        let date = req.date_for(5);
        roster.push(assignment("E01", date, "1F", "06:00 - 15:00", 9.0, Station::Kitchen));

        let violations = validate(&roster, &req);
        assert!(violations.iter().any(|v| matches!(
            &v.kind,
            ViolationKind::Availability { requested: None }
        )));
    }

    #[test]
    fn test_flexible_codes_substitute_silently() {
        let req = request();
        let mut roster = Roster::new();
        // Requested 1F, assigned 2F: both flexible, no finding.
        roster.push(assignment("E01", start(), "2F", "13:00 - 22:00", 9.0, Station::Kitchen));
        roster.push(assignment("E01", req.date_for(2), "1F", "06:00 - 15:00", 9.0, Station::Kitchen));

        let violations = validate(&roster, &req);
        assert!(!violations
            .iter()
            .any(|v| matches!(v.kind, ViolationKind::Availability { .. })));
    }

    #[test]
    fn test_flexible_request_accepts_any_code() {
        // Requested 1F, assigned S: one flexible code is enough to suppress
        // the mismatch.
        let req = request().with_catalog(
            ShiftCatalog::new()
                .with_shift(ShiftDefinition::new("S", "Day Shift", "08:30 - 17:00", 8.5)),
        );
        let mut roster = Roster::new();
        roster.push(assignment("E01", start(), "S", "08:30 - 17:00", 8.5, Station::Kitchen));

        let violations = validate(&roster, &req);
        assert!(
            !violations
                .iter()
                .any(|v| matches!(v.kind, ViolationKind::Availability { .. })),
            "mismatch flagged despite flexible requested code"
        );
    }

    #[test]
    fn test_inflexible_mismatch_flagged() {
        let req = request().with_worker(
            Worker::new("E04", "Lea Brandt", EmploymentClass::PartTime, Station::Counter)
                .available(1, "S"),
        );
        let mut roster = Roster::new();
        roster.push(assignment("E04", start(), "M", "08:00 - 16:00", 8.0, Station::Counter));

        let violations = validate(&roster, &req);
        let found: Vec<_> = violations
            .iter()
            .filter(|v| matches!(v.kind, ViolationKind::Availability { .. }))
            .collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::Warning);
        match &found[0].kind {
            ViolationKind::Availability { requested } => {
                assert_eq!(requested.as_deref(), Some("S"));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_shift_length_bounds() {
        let req = request();
        let mut roster = Roster::new();
        roster.push(assignment("E01", start(), "1F", "06:00 - 15:00", 2.0, Station::Kitchen));
        roster.push(assignment("E01", req.date_for(2), "1F", "06:00 - 15:00", 13.5, Station::Kitchen));

        let violations = validate(&roster, &req);
        let lengths: Vec<_> = violations
            .iter()
            .filter_map(|v| match &v.kind {
                ViolationKind::ShiftLength { observed_hours, bound } => {
                    Some((*observed_hours, *bound))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            lengths,
            vec![(2.0, LengthBound::BelowMinimum), (13.5, LengthBound::AboveMaximum)]
        );
    }

    #[test]
    fn test_rest_period_flagged_on_later_day() {
        let req = request();
        let mut roster = Roster::new();
        roster.push(assignment("E01", start(), "2F", "13:00 - 22:00", 9.0, Station::Kitchen));
        roster.push(assignment("E01", req.date_for(2), "1F", "06:00 - 15:00", 9.0, Station::Kitchen));

        let violations = validate(&roster, &req);
        let rest: Vec<_> = violations
            .iter()
            .filter(|v| matches!(v.kind, ViolationKind::RestPeriod { .. }))
            .collect();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].date, Some(req.date_for(2)));
        assert_eq!(rest[0].severity, Severity::Critical);
        match &rest[0].kind {
            ViolationKind::RestPeriod { observed_hours, required_hours } => {
                assert_eq!(*observed_hours, 8.0);
                assert_eq!(*required_hours, 10.0);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_unparsable_times_skip_rest_check() {
        let req = request();
        let mut roster = Roster::new();
        roster.push(assignment("E01", start(), "1F", "TBD", 9.0, Station::Kitchen));
        roster.push(assignment("E01", req.date_for(2), "1F", "TBD", 9.0, Station::Kitchen));

        let violations = validate(&roster, &req);
        assert!(!violations
            .iter()
            .any(|v| matches!(v.kind, ViolationKind::RestPeriod { .. })));
    }

    #[test]
    fn test_missing_manager_flagged() {
        let req = request();
        let mut roster = Roster::new();
        let mut a = assignment("E01", start(), "1F", "06:00 - 15:00", 9.0, Station::Kitchen);
        a.manager = String::new();
        roster.push(a);

        let violations = validate(&roster, &req);
        assert!(violations
            .iter()
            .any(|v| matches!(v.kind, ViolationKind::ManagerCoverage { .. })
                && v.severity == Severity::Critical));
    }

    #[test]
    fn test_manager_checked_per_shift_time() {
        // A managed morning shift must not mask a manager-less evening
        // shift on the same day.
        let req = request().with_worker(
            Worker::new("E02", "Ben Ortiz", EmploymentClass::PartTime, Station::Counter)
                .available(1, "2F"),
        );
        let mut roster = Roster::new();
        roster.push(assignment("E01", start(), "1F", "06:00 - 15:00", 9.0, Station::Kitchen));
        let mut evening = assignment("E02", start(), "2F", "13:00 - 22:00", 9.0, Station::Counter);
        evening.manager = String::new();
        roster.push(evening);

        let violations = validate(&roster, &req);
        let coverage: Vec<_> = violations
            .iter()
            .filter_map(|v| match &v.kind {
                ViolationKind::ManagerCoverage { shift_time } => Some(shift_time.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(coverage, vec!["13:00 - 22:00".to_string()]);
    }

    #[test]
    fn test_understaffed_station_flagged() {
        let req = request();
        let mut roster = Roster::new();
        // Kitchen met (min 1), Counter empty (min 2).
        roster.push(assignment("E01", start(), "1F", "06:00 - 15:00", 9.0, Station::Kitchen));

        let violations = validate(&roster, &req);
        let coverage: Vec<_> = violations
            .iter()
            .filter_map(|v| match &v.kind {
                ViolationKind::StoreCoverage { missing, .. } => Some(missing.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(coverage, vec![vec!["Counter".to_string()]]);
    }

    #[test]
    fn test_validation_is_deterministic() {
        let req = request();
        let mut roster = Roster::new();
        roster.push(assignment("E01", start(), "2F", "13:00 - 22:00", 2.0, Station::Kitchen));
        roster.push(assignment("E01", req.date_for(2), "1F", "06:00 - 15:00", 9.0, Station::Kitchen));
        roster.push(assignment("E01", req.date_for(5), "1F", "06:00 - 15:00", 9.0, Station::Kitchen));

        let a = validate(&roster, &req);
        let b = validate(&roster, &req);
        let render = |vs: &[Violation]| {
            vs.iter().map(|v| v.message.clone()).collect::<Vec<_>>()
        };
        assert_eq!(render(&a), render(&b));
        assert!(!a.is_empty());
    }
}

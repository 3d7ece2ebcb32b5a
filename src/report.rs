//! Final coverage report.
//!
//! After the loop finishes, the reporter audits the final roster against the
//! full availability matrix and the store minimums, independent of anything
//! the validator found along the way. The verdict is strict: one unfilled
//! slot, one mismatched code, or one under-minimum station-day means the
//! roster needs review.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::engine::RosterRequest;
use crate::models::{is_flexible_code, Roster, Station, HORIZON_DAYS};

/// Gap counts at or below these read as minor in the summary text.
const MINOR_UNFILLED: usize = 5;
const MINOR_UNDERSTAFFED: usize = 3;

/// The final verdict on a roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RosterStatus {
    Approved,
    NeedsReview,
}

/// How one requested availability slot was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotStatus {
    /// Assigned the requested code, or a flexible equivalent.
    Filled,
    /// The worker requested the day but got nothing.
    Unfilled,
    /// Assigned a different, non-equivalent code.
    Mismatch,
}

/// One availability slot audited against the roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotCheck {
    pub worker_id: String,
    pub date: NaiveDate,
    pub requested: String,
    pub assigned: Option<String>,
    pub status: SlotStatus,
}

/// Whether a station-day met its declared minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaffingStatus {
    Met,
    Understaffed,
}

/// One (store, date, station) staffing check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffingCheck {
    pub store: String,
    pub date: NaiveDate,
    pub station: Station,
    pub required: u32,
    pub staffed: u32,
    pub status: StaffingStatus,
}

/// The complete post-loop audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageReport {
    pub status: RosterStatus,
    pub coverage_percent: f64,
    pub total_slots: usize,
    pub filled: usize,
    pub unfilled: usize,
    pub mismatched: usize,
    pub understaffed: usize,
    pub slot_checks: Vec<SlotCheck>,
    pub staffing_checks: Vec<StaffingCheck>,
    pub recommendations: Vec<String>,
    pub summary: String,
}

impl CoverageReport {
    /// Audits the final roster against the request.
    pub fn build(roster: &Roster, req: &RosterRequest) -> Self {
        let mut slot_checks = Vec::new();
        for worker in &req.workers {
            for (day, requested) in worker.availability.iter() {
                let date = req.date_for(day);
                let assigned = roster
                    .assignment_for(&worker.id, date)
                    .map(|a| a.shift_code.clone());
                let status = match &assigned {
                    None => SlotStatus::Unfilled,
                    Some(code)
                        if code.eq_ignore_ascii_case(requested)
                            || is_flexible_code(code)
                            || is_flexible_code(requested) =>
                    {
                        SlotStatus::Filled
                    }
                    Some(_) => SlotStatus::Mismatch,
                };
                slot_checks.push(SlotCheck {
                    worker_id: worker.id.clone(),
                    date,
                    requested: requested.to_string(),
                    assigned,
                    status,
                });
            }
        }

        let mut staffing_checks = Vec::new();
        for store in &req.stores {
            for day in 1..=HORIZON_DAYS {
                let date = req.date_for(day);
                for (station, &required) in &store.station_minimums {
                    let staffed = roster
                        .assignments
                        .iter()
                        .filter(|a| {
                            a.date == date && a.store == store.name && a.station == *station
                        })
                        .count() as u32;
                    staffing_checks.push(StaffingCheck {
                        store: store.name.clone(),
                        date,
                        station: station.clone(),
                        required,
                        staffed,
                        status: if staffed >= required {
                            StaffingStatus::Met
                        } else {
                            StaffingStatus::Understaffed
                        },
                    });
                }
            }
        }

        let total_slots = slot_checks.len();
        let filled = slot_checks
            .iter()
            .filter(|c| c.status == SlotStatus::Filled)
            .count();
        let unfilled = slot_checks
            .iter()
            .filter(|c| c.status == SlotStatus::Unfilled)
            .count();
        let mismatched = total_slots - filled - unfilled;
        let understaffed = staffing_checks
            .iter()
            .filter(|c| c.status == StaffingStatus::Understaffed)
            .count();
        let coverage_percent = if total_slots == 0 {
            100.0
        } else {
            filled as f64 / total_slots as f64 * 100.0
        };

        let approved = unfilled == 0 && mismatched == 0 && understaffed == 0;
        let status = if approved {
            RosterStatus::Approved
        } else {
            RosterStatus::NeedsReview
        };

        let summary = if approved {
            format!(
                "Schedule approved: all {total_slots} availability slots served and every staffing minimum met."
            )
        } else if unfilled <= MINOR_UNFILLED && understaffed <= MINOR_UNDERSTAFFED {
            format!(
                "Schedule needs review: minor gaps remain ({unfilled} unfilled, {mismatched} mismatched, {understaffed} under-minimum station-days)."
            )
        } else {
            format!(
                "Schedule needs review: significant gaps ({unfilled} unfilled, {mismatched} mismatched, {understaffed} under-minimum station-days)."
            )
        };

        let mut recommendations = Vec::new();
        if unfilled > 0 {
            recommendations.push(format!("Fill {unfilled} open availability slots"));
        }
        if mismatched > 0 {
            recommendations.push(format!(
                "Align {mismatched} assignments with the requested shift codes"
            ));
        }
        if understaffed > 0 {
            recommendations.push(format!(
                "Add staff to {understaffed} under-minimum station-days"
            ));
        }

        Self {
            status,
            coverage_percent,
            total_slots,
            filled,
            unfilled,
            mismatched,
            understaffed,
            slot_checks,
            staffing_checks,
            recommendations,
            summary,
        }
    }

    /// Renders the report as plain text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "FINAL COVERAGE REPORT");
        let _ = writeln!(out, "=====================");
        let _ = writeln!(
            out,
            "Status: {}",
            match self.status {
                RosterStatus::Approved => "APPROVED",
                RosterStatus::NeedsReview => "NEEDS REVIEW",
            }
        );
        let _ = writeln!(out, "Coverage: {:.1}%", self.coverage_percent);
        let _ = writeln!(
            out,
            "Slots: {} total, {} filled, {} unfilled, {} mismatched",
            self.total_slots, self.filled, self.unfilled, self.mismatched
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.summary);

        let gaps: Vec<&StaffingCheck> = self
            .staffing_checks
            .iter()
            .filter(|c| c.status == StaffingStatus::Understaffed)
            .collect();
        if !gaps.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Under-minimum station-days:");
            for g in gaps {
                let _ = writeln!(
                    out,
                    "  {} / {} / {}: {} of {} required",
                    g.store, g.date, g.station, g.staffed, g.required
                );
            }
        }

        if !self.recommendations.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Recommendations:");
            for r in &self.recommendations {
                let _ = writeln!(out, "  - {r}");
            }
        }
        out
    }
}

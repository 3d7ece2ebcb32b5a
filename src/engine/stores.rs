//! Store selection.
//!
//! Each assignment is routed to a store by a weighted draw: base traffic
//! weight, a bonus when the shift overlaps a peak window, and a small
//! iteration-dependent jitter so consecutive iterations do not route every
//! repeated assignment identically. A station declared by exactly one store
//! always routes there.

use chrono::NaiveTime;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::models::{Station, StoreProfile};

/// Weight bonus when the shift overlaps a peak window.
const PEAK_BONUS: f64 = 0.3;

/// Floor so no store's weight collapses to zero.
const MIN_WEIGHT: f64 = 0.05;

/// Chooses the store for one assignment.
///
/// # Panics
///
/// Panics if `stores` is empty.
/// [`IterationController::run`](crate::IterationController::run) rejects
/// store-less requests before any selection happens.
pub fn select_store<'a>(
    stores: &'a [StoreProfile],
    station: &Station,
    shift_range: Option<(NaiveTime, NaiveTime)>,
    iteration: u32,
    rng: &mut SmallRng,
) -> &'a StoreProfile {
    // Hard affinity: a station only one store declares belongs to it.
    let declaring: Vec<&StoreProfile> =
        stores.iter().filter(|s| s.declares(station)).collect();
    if declaring.len() == 1 {
        return declaring[0];
    }

    let weights: Vec<f64> = stores
        .iter()
        .enumerate()
        .map(|(i, store)| {
            let mut w = store.traffic_weight;
            if let Some((start, end)) = shift_range {
                if store.peak_windows.iter().any(|p| p.overlaps(start, end)) {
                    w += PEAK_BONUS;
                }
            }
            w += (iteration as usize + i) as f64 % 3.0 * 0.05 - 0.05;
            w.max(MIN_WEIGHT)
        })
        .collect();

    let total: f64 = weights.iter().sum();
    let mut draw = rng.random_range(0.0..total);
    for (store, w) in stores.iter().zip(&weights) {
        if draw < *w {
            return store;
        }
        draw -= w;
    }
    // Floating point remainder lands on the last store.
    &stores[stores.len() - 1]
}

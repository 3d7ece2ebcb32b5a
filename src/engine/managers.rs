//! Manager pool.
//!
//! Assignments carry the name of the manager on duty. Real manager rosters
//! arrive out of band, so the engine draws names from a pool generated off
//! the run seed; the same seed always yields the same pool.

use rand::rngs::SmallRng;
use rand::Rng;

const FIRST_NAMES: [&str; 16] = [
    "Alex", "Jordan", "Morgan", "Casey", "Riley", "Quinn", "Avery", "Dana",
    "Jamie", "Taylor", "Reese", "Skyler", "Drew", "Blake", "Rowan", "Emerson",
];

const LAST_NAMES: [&str; 16] = [
    "Doyle", "Hayes", "Brennan", "Whitfield", "Okafor", "Lindqvist", "Marsh",
    "Calloway", "Nguyen", "Iverson", "Radford", "Santos", "Keller", "Osei",
    "Vance", "Thornton",
];

/// A deterministic pool of manager names.
#[derive(Debug, Clone)]
pub struct ManagerPool {
    names: Vec<String>,
}

impl ManagerPool {
    /// Generates `count` distinct names from the given RNG.
    pub fn generate(count: usize, rng: &mut SmallRng) -> Self {
        let mut names = Vec::with_capacity(count);
        while names.len() < count {
            let first = FIRST_NAMES[rng.random_range(0..FIRST_NAMES.len())];
            let last = LAST_NAMES[rng.random_range(0..LAST_NAMES.len())];
            let name = format!("{first} {last}");
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Self { names }
    }

    /// Picks any name from the pool.
    pub fn pick(&self, rng: &mut SmallRng) -> &str {
        &self.names[rng.random_range(0..self.names.len())]
    }

    /// Picks a name not already in `taken`, falling back to any name when
    /// the pool is exhausted.
    pub fn pick_new<'a>(&'a self, taken: &[String], rng: &mut SmallRng) -> &'a str {
        let available: Vec<&String> =
            self.names.iter().filter(|n| !taken.contains(n)).collect();
        if available.is_empty() {
            self.pick(rng)
        } else {
            available[rng.random_range(0..available.len())]
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

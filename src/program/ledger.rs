//! Achieved-reps ledger, one entry per (week, day, exercise) position

use std::collections::BTreeMap;

use super::Week;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LedgerKey {
    pub week: Week,
    pub day: usize,
    pub exercise: usize,
}

impl LedgerKey {
    pub fn new(week: Week, day: usize, exercise: usize) -> Self {
        Self { week, day, exercise }
    }
}

/// Reps achieved on the last working set, recorded while paging through weeks.
/// Client-side only; it is not part of the stored document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepLedger {
    entries: BTreeMap<LedgerKey, f64>,
}

impl RepLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the achieved reps for a position
    pub fn record(&mut self, week: Week, day: usize, exercise: usize, reps: f64) {
        self.entries.insert(LedgerKey::new(week, day, exercise), reps);
    }

    pub fn get(&self, week: Week, day: usize, exercise: usize) -> Option<f64> {
        self.entries.get(&LedgerKey::new(week, day, exercise)).copied()
    }
}

//! Program module - the 21-week intensity wave and weight progression
//!
//! Features:
//! - Fixed intensity table (8 lifts x 21 weeks)
//! - Rep-performance adjustment of the max weight
//! - Per-week achieved-reps ledger

pub mod ledger;
pub mod progression;

pub use ledger::RepLedger;
pub use progression::{adjust_max_weight, apply_week, progress, Progression};

use std::fmt;

use thiserror::Error;

use crate::exercises::Lift;

/// Program length in weeks
pub const PROGRAM_WEEKS: u32 = 21;

/// Percent of max weight per lift (row) and week (column)
pub const INTENSITIES: [[f64; PROGRAM_WEEKS as usize]; 8] = [
    [70.0, 75.0, 80.0, 72.5, 77.5, 82.5, 60.0, 75.0, 80.0, 85.0, 77.5, 82.5, 87.5, 60.0, 80.0, 85.0, 90.0, 85.0, 90.0, 95.0, 60.0],
    [70.0, 75.0, 80.0, 72.5, 77.5, 82.5, 60.0, 75.0, 80.0, 85.0, 77.5, 82.5, 87.5, 60.0, 80.0, 85.0, 90.0, 85.0, 90.0, 95.0, 60.0],
    [70.0, 75.0, 80.0, 72.5, 77.5, 82.5, 60.0, 75.0, 80.0, 85.0, 77.5, 82.5, 87.5, 60.0, 80.0, 85.0, 90.0, 85.0, 90.0, 95.0, 60.0],
    [70.0, 75.0, 80.0, 72.5, 77.5, 82.5, 60.0, 75.0, 80.0, 85.0, 77.5, 82.5, 87.5, 60.0, 80.0, 85.0, 90.0, 85.0, 90.0, 95.0, 60.0],
    [60.0, 65.0, 70.0, 62.5, 67.5, 72.5, 50.0, 65.0, 70.0, 75.0, 67.5, 72.5, 77.5, 50.0, 70.0, 75.0, 80.0, 75.0, 80.0, 85.0, 50.0],
    [60.0, 65.0, 70.0, 62.5, 67.5, 72.5, 50.0, 65.0, 70.0, 75.0, 67.5, 72.5, 77.5, 50.0, 70.0, 75.0, 80.0, 75.0, 80.0, 85.0, 50.0],
    [60.0, 65.0, 70.0, 62.5, 67.5, 72.5, 50.0, 65.0, 70.0, 75.0, 67.5, 72.5, 77.5, 50.0, 70.0, 75.0, 80.0, 75.0, 80.0, 85.0, 50.0],
    [60.0, 65.0, 70.0, 62.5, 67.5, 72.5, 50.0, 65.0, 70.0, 75.0, 67.5, 72.5, 77.5, 50.0, 70.0, 75.0, 80.0, 75.0, 80.0, 85.0, 50.0],
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProgressionError {
    #[error("unknown exercise: {0:?}")]
    UnknownExercise(String),

    #[error("week {0} is outside the program (1-21)")]
    WeekOutOfRange(u32),
}

/// Program week, always within 1..=21
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Week(u32);

impl Week {
    pub const FIRST: Week = Week(1);
    pub const LAST: Week = Week(PROGRAM_WEEKS);

    pub fn new(week: u32) -> Result<Self, ProgressionError> {
        if (1..=PROGRAM_WEEKS).contains(&week) {
            Ok(Week(week))
        } else {
            Err(ProgressionError::WeekOutOfRange(week))
        }
    }

    /// Saturate any value into the program range
    pub fn clamped(week: u32) -> Self {
        Week(week.clamp(1, PROGRAM_WEEKS))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Following week, stays at 21
    pub fn next(self) -> Self {
        Week::clamped(self.0 + 1)
    }

    /// Preceding week, stays at 1
    pub fn prev(self) -> Self {
        Week::clamped(self.0.saturating_sub(1))
    }

    /// Week before this one, if any
    pub fn previous(self) -> Option<Self> {
        (self.0 > 1).then(|| Week(self.0 - 1))
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Intensity of a lift in a given week, as a fraction (0.70 for 70%)
pub fn intensity(lift: Lift, week: Week) -> f64 {
    INTENSITIES[lift.row()][(week.get() - 1) as usize] / 100.0
}

/// Round to the nearest 0.5, halves going up
pub fn round_to_half(value: f64) -> f64 {
    (value * 2.0 + 0.5).floor() / 2.0
}

//! Exercise catalog - the eight programmed lifts and the accessory list

use std::fmt;
use std::str::FromStr;

use crate::program::ProgressionError;

/// Main and secondary lifts that have a row in the intensity table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lift {
    Squat,
    BenchPress,
    Deadlift,
    Ohp,
    FrontSquat,
    CloseGripBench,
    RomanianDeadlift,
    PushPress,
}

impl Lift {
    /// All lifts in intensity table order
    pub const ALL: [Lift; 8] = [
        Lift::Squat,
        Lift::BenchPress,
        Lift::Deadlift,
        Lift::Ohp,
        Lift::FrontSquat,
        Lift::CloseGripBench,
        Lift::RomanianDeadlift,
        Lift::PushPress,
    ];

    /// Display name, as stored in the workout document
    pub fn name(&self) -> &'static str {
        match self {
            Lift::Squat => "Squat",
            Lift::BenchPress => "Bench Press",
            Lift::Deadlift => "Deadlift",
            Lift::Ohp => "OHP",
            Lift::FrontSquat => "Front Squat",
            Lift::CloseGripBench => "Close Grip Bench",
            Lift::RomanianDeadlift => "Romanian deadlift",
            Lift::PushPress => "Push Press",
        }
    }

    /// Row of this lift in [`crate::program::INTENSITIES`]
    pub fn row(&self) -> usize {
        match self {
            Lift::Squat => 0,
            Lift::BenchPress => 1,
            Lift::Deadlift => 2,
            Lift::Ohp => 3,
            Lift::FrontSquat => 4,
            Lift::CloseGripBench => 5,
            Lift::RomanianDeadlift => 6,
            Lift::PushPress => 7,
        }
    }

    /// Exact, case-sensitive lookup by display name
    pub fn from_name(name: &str) -> Result<Lift, ProgressionError> {
        Lift::ALL
            .into_iter()
            .find(|lift| lift.name() == name)
            .ok_or_else(|| ProgressionError::UnknownExercise(name.to_string()))
    }
}

impl fmt::Display for Lift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Lift {
    type Err = ProgressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lift::from_name(s)
    }
}

/// Placeholder shown for an empty accessory slot
pub const NO_ACCESSORY: &str = "None";

/// Number of accessory slots per program
pub const ACCESSORY_SLOTS: usize = 3;

/// Accessory choices, "None" first
pub const ACCESSORY_EXERCISES: &[&str] = &[
    NO_ACCESSORY,
    "Barbell rows",
    "DB rows",
    "Chest supported rows",
    "T-bar rows",
    "Pull-ups",
    "Chin-ups",
    "Neutral grip pull-ups",
    "Pull-downs",
];

pub fn is_accessory(name: &str) -> bool {
    ACCESSORY_EXERCISES.contains(&name)
}

/// Next accessory in catalog order, wrapping back to "None"
pub fn next_accessory(current: &str) -> &'static str {
    let pos = ACCESSORY_EXERCISES
        .iter()
        .position(|a| *a == current)
        .map(|i| (i + 1) % ACCESSORY_EXERCISES.len())
        .unwrap_or(0);
    ACCESSORY_EXERCISES[pos]
}

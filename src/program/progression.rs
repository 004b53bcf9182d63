//! Percentage-based weight progression
//!
//! The working weight for a week is `max weight x intensity(week)`. Before
//! that, the max weight is nudged by how the last set went in the previous
//! week: beating the rep goal raises it by up to 3%, missing by two or more
//! lowers it by up to 3%.

use tracing::debug;

use super::{intensity, round_to_half, ProgressionError, RepLedger, Week};
use crate::exercises::Lift;
use crate::store::{Exercise, WorkoutDocument};

/// Result of one progression step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progression {
    /// Max weight after the rep-performance adjustment
    pub max_weight: f64,
    /// Working weight for the week
    pub current_weight: f64,
}

/// Apply the rep-difference table to a max weight.
/// Every change is rounded to the nearest 0.5. Fractional differences that
/// fall between the steps (1.5, -2.5) leave the max alone.
pub fn adjust_max_weight(max_weight: f64, rep_difference: f64) -> f64 {
    let factor = if rep_difference >= 3.0 {
        1.03
    } else if rep_difference == 2.0 {
        1.02
    } else if rep_difference == 1.0 {
        1.01
    } else if rep_difference == -2.0 {
        0.98
    } else if rep_difference <= -3.0 {
        0.97
    } else {
        return max_weight;
    };
    round_to_half(max_weight * factor)
}

/// Compute the adjusted max and the working weight of `exercise`
/// at position (`day`, `exercise_index`) for `week`.
pub fn progress(
    exercise: &Exercise,
    week: Week,
    day: usize,
    exercise_index: usize,
    ledger: &RepLedger,
) -> Result<Progression, ProgressionError> {
    let lift = Lift::from_name(&exercise.name)?;
    let intensity = intensity(lift, week);

    let mut max_weight = exercise.max_weight;
    if let Some(prev_week) = week.previous()
        && let Some(achieved) = ledger.get(prev_week, day, exercise_index)
    {
        let rep_difference = achieved - exercise.last_set_reps;
        max_weight = adjust_max_weight(max_weight, rep_difference);
        debug!(
            "{}: week {} rep difference {} -> max {}",
            lift, week, rep_difference, max_weight
        );
    }

    Ok(Progression {
        max_weight,
        current_weight: round_to_half(max_weight * intensity),
    })
}

/// Recompute `currentWeight` for every exercise of the document at `week`.
///
/// Exercises without a max weight are left as they are. The stored
/// `maxWeight` is never rewritten, so applying the same week twice gives the
/// same document.
pub fn apply_week(
    document: &mut WorkoutDocument,
    week: Week,
    ledger: &RepLedger,
) -> Result<(), ProgressionError> {
    for (day_index, day) in document.workout_days.iter_mut().enumerate() {
        for (exercise_index, exercise) in day.exercises.iter_mut().enumerate() {
            if exercise.max_weight == 0.0 {
                continue;
            }
            let step = progress(exercise, week, day_index, exercise_index, ledger)?;
            exercise.current_weight = step.current_weight;
        }
    }
    Ok(())
}

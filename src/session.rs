//! Client session - load, edit and push back the workout document
//!
//! Every edit is applied locally and the whole document is then written to
//! the store. A failed write never aborts the edit; it leaves an error notice
//! for the front end to show.

use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::{error, info, warn};

use crate::exercises::{is_accessory, ACCESSORY_SLOTS, NO_ACCESSORY};
use crate::program::{apply_week, RepLedger, Week};
use crate::store::{seed_document, DocumentStore, InitialField, WorkoutDocument};

const FETCH_FAILED: &str = "Failed to fetch workout data. Please try again.";
const UPDATE_FAILED: &str = "Failed to update workout data. Please try again.";
const REFRESHED: &str = "Workout program refreshed successfully.";
const SAVED: &str = "Workout program saved successfully.";
const COMPUTE_FAILED: &str = "Cannot compute workout program: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// One-shot message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, message: message.into() }
    }

    fn error(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, message: message.into() }
    }
}

pub struct WorkoutSession {
    store: Arc<dyn DocumentStore>,
    document: WorkoutDocument,
    ledger: RepLedger,
    notice: Option<Notice>,
}

impl WorkoutSession {
    /// Fetch the document from the store. If that fails the bundled program
    /// is shown instead, with an error notice. A document the progression
    /// cannot compute (unknown exercise) is shown as stored, also with a notice.
    pub fn open(store: Arc<dyn DocumentStore>) -> Result<Self> {
        let mut notice = None;
        let document = match store.load() {
            Ok(document) => document,
            Err(e) => {
                warn!("Error fetching data: {:#}", e);
                notice = Some(Notice::error(FETCH_FAILED));
                seed_document()?
            }
        };

        let mut session = Self {
            store,
            document: document.clone(),
            ledger: RepLedger::new(),
            notice,
        };
        if let Err(e) = session.adopt(document) {
            warn!("Stored program not computed: {}", e);
            session.notice = Some(Notice::error(format!("{}{}", COMPUTE_FAILED, e)));
        }
        Ok(session)
    }

    pub fn document(&self) -> &WorkoutDocument {
        &self.document
    }

    pub fn week(&self) -> Week {
        Week::clamped(self.document.current_week)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Replace the pending notice with an error
    pub fn report_error(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice::error(message));
    }

    /// Accessory in `slot`, "None" when the slot was never filled
    pub fn accessory(&self, slot: usize) -> &str {
        self.document
            .selected_accessories
            .get(slot)
            .map(String::as_str)
            .unwrap_or(NO_ACCESSORY)
    }

    /// Move one week forward or back (clamped to the program), recompute the
    /// working weights and show the achieved reps recorded for that week.
    pub fn change_week(&mut self, direction: Direction) -> Result<Week> {
        let week = match direction {
            Direction::Next => self.week().next(),
            Direction::Previous => self.week().prev(),
        };

        let mut next = self.document.clone();
        next.current_week = week.get();
        apply_week(&mut next, week, &self.ledger)?;
        for (day_index, day) in next.workout_days.iter_mut().enumerate() {
            for (exercise_index, exercise) in day.exercises.iter_mut().enumerate() {
                if exercise.max_weight != 0.0 {
                    exercise.achieved_reps =
                        self.ledger.get(week, day_index, exercise_index).unwrap_or(0.0);
                }
            }
        }

        self.document = next;
        self.push();
        Ok(week)
    }

    /// Record the reps achieved on the last set for the current week
    pub fn record_achieved_reps(&mut self, day: usize, exercise: usize, reps: f64) -> Result<()> {
        let week = self.week();
        let Some(target) = self
            .document
            .workout_days
            .get_mut(day)
            .and_then(|d| d.exercises.get_mut(exercise))
        else {
            bail!("No exercise {} on day {}", exercise, day);
        };

        target.achieved_reps = reps;
        self.ledger.record(week, day, exercise, reps);
        self.push();
        Ok(())
    }

    pub fn select_accessory(&mut self, slot: usize, name: &str) -> Result<()> {
        if slot >= ACCESSORY_SLOTS {
            bail!("Accessory slot {} out of range (0-{})", slot, ACCESSORY_SLOTS - 1);
        }
        if !is_accessory(name) {
            bail!("Unknown accessory exercise: {}", name);
        }

        let accessories = &mut self.document.selected_accessories;
        if accessories.len() <= slot {
            accessories.resize(slot + 1, NO_ACCESSORY.to_string());
        }
        accessories[slot] = name.to_string();
        self.push();
        Ok(())
    }

    pub fn set_initial_weight(&mut self, index: usize, field: InitialField, value: f64) -> Result<()> {
        let Some(initial) = self.document.initial_weights.get_mut(index) else {
            bail!("No initial value at row {}", index);
        };
        initial.set(field, value);
        self.push();
        Ok(())
    }

    /// Re-fetch the stored document, keeping the ledger.
    /// On any failure the current document stays and an error notice is set.
    pub fn refresh(&mut self) {
        match self.store.load() {
            Ok(document) => match self.adopt(document) {
                Ok(()) => self.notice = Some(Notice::success(REFRESHED)),
                Err(e) => {
                    warn!("Refreshed program not computed: {}", e);
                    self.notice = Some(Notice::error(format!("{}{}", COMPUTE_FAILED, e)));
                }
            },
            Err(e) => {
                warn!("Error fetching data: {:#}", e);
                self.notice = Some(Notice::error(FETCH_FAILED));
            }
        }
    }

    /// Explicitly push the document
    pub fn save(&mut self) {
        if self.push() {
            self.notice = Some(Notice::success(SAVED));
        }
    }

    /// Take a fetched document as the working copy; untouched on error. Weights are recomputed for
    /// its week; achieved reps outside week 1 come from the ledger.
    fn adopt(&mut self, mut document: WorkoutDocument) -> Result<()> {
        let week = Week::clamped(document.current_week);
        document.current_week = week.get();
        apply_week(&mut document, week, &self.ledger)?;
        if week != Week::FIRST {
            for (day_index, day) in document.workout_days.iter_mut().enumerate() {
                for (exercise_index, exercise) in day.exercises.iter_mut().enumerate() {
                    if exercise.max_weight != 0.0 {
                        exercise.achieved_reps =
                            self.ledger.get(week, day_index, exercise_index).unwrap_or(0.0);
                    }
                }
            }
        }
        self.document = document;
        Ok(())
    }

    fn push(&mut self) -> bool {
        match self.store.save(&self.document) {
            Ok(()) => {
                info!("Workout data pushed (week {})", self.document.current_week);
                true
            }
            Err(e) => {
                error!("Error updating data: {:#}", e);
                self.notice = Some(Notice::error(UPDATE_FAILED));
                false
            }
        }
    }
}

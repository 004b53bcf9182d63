//! Store module - the workout document and where it lives
//!
//! Stores keep the document as raw JSON: whatever was saved is what comes
//! back. The typed view is only taken by code that needs to compute on it.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default location of the file-backed document
pub const DATA_PATH: &str = "data/workout_data.json";

const SEED_JSON: &str = include_str!("../../data/initial_data.json");

/// The one document holding the whole program state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDocument {
    pub current_week: u32,
    pub workout_days: Vec<WorkoutDay>,
    pub selected_accessories: Vec<String>,
    pub initial_weights: Vec<InitialValue>,
    /// Keys this crate does not know, kept as they came
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Training day, exercises in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDay {
    pub name: String,
    pub exercises: Vec<Exercise>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Rep counts are plain numbers, fractions included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    pub max_weight: f64,
    /// Derived from max weight and week, never authoritative
    pub current_weight: f64,
    pub normal_set_reps: f64,
    /// Rep goal of the last working set
    pub last_set_reps: f64,
    pub achieved_reps: f64,
    pub set_goal: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Seed values shown on the Initial Values view.
/// Nothing derives exercise max weights from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialValue {
    pub name: String,
    pub max_weight: f64,
    pub single_at8_percentage: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Editable columns of an [`InitialValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialField {
    MaxWeight,
    SingleAt8Percentage,
}

impl InitialValue {
    pub fn set(&mut self, field: InitialField, value: f64) {
        match field {
            InitialField::MaxWeight => self.max_weight = value,
            InitialField::SingleAt8Percentage => self.single_at8_percentage = value,
        }
    }
}

/// The bundled program, as stored JSON
pub fn seed_value() -> Result<Value> {
    serde_json::from_str(SEED_JSON).context("Invalid seed document")
}

/// The program the application starts from
pub fn seed_document() -> Result<WorkoutDocument> {
    serde_json::from_str(SEED_JSON).context("Invalid seed document")
}

/// Single-document storage: read the whole thing, replace the whole thing.
/// Last writer wins. Nothing is validated on the way in.
pub trait DocumentStore: Send + Sync {
    fn load_value(&self) -> Result<Value>;

    fn save_value(&self, value: &Value) -> Result<()>;

    fn load(&self) -> Result<WorkoutDocument> {
        serde_json::from_value(self.load_value()?)
            .context("Stored workout data is not a workout document")
    }

    fn save(&self, document: &WorkoutDocument) -> Result<()> {
        self.save_value(&serde_json::to_value(document)?)
    }

    /// Overwrite only `currentWeek` of the stored document
    fn set_current_week(&self, week: u32) -> Result<()> {
        let mut value = self.load_value()?;
        set_week_field(&mut value, week)?;
        self.save_value(&value)
    }
}

fn set_week_field(value: &mut Value, week: u32) -> Result<()> {
    let object = value
        .as_object_mut()
        .context("Stored workout data is not a JSON object")?;
    object.insert("currentWeek".to_string(), Value::from(week));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::Lift;
    use serde_json::json;

    #[test]
    fn test_seed_document_parses() {
        let doc = seed_document().unwrap();
        assert_eq!(doc.current_week, 1);
        assert_eq!(doc.workout_days.len(), 4);
        assert_eq!(doc.selected_accessories.len(), 3);
        assert!(!doc.initial_weights.is_empty());
        assert!(doc.extra.is_empty());
    }

    #[test]
    fn test_seed_exercises_are_in_catalog() {
        let doc = seed_document().unwrap();
        for day in &doc.workout_days {
            for ex in &day.exercises {
                assert!(Lift::from_name(&ex.name).is_ok(), "{}", ex.name);
            }
        }
    }

    #[test]
    fn test_json_field_names() {
        let doc = seed_document().unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("currentWeek").is_some());
        assert!(value.get("workoutDays").is_some());
        assert!(value.get("selectedAccessories").is_some());

        let ex = &value["workoutDays"][0]["exercises"][0];
        for key in ["name", "maxWeight", "currentWeight", "normalSetReps", "lastSetReps", "achievedReps", "setGoal"] {
            assert!(ex.get(key).is_some(), "missing {}", key);
        }
        assert!(value["initialWeights"][0].get("singleAt8Percentage").is_some());
    }

    #[test]
    fn test_fractional_reps_and_unknown_keys_survive() {
        let mut value = seed_value().unwrap();
        value["notes"] = json!("deload after week 7");
        value["workoutDays"][0]["exercises"][0]["achievedReps"] = json!(8.5);
        value["workoutDays"][0]["exercises"][0]["tempo"] = json!("3-1-1");
        value["initialWeights"][0]["source"] = json!("gym test");

        let doc: WorkoutDocument = serde_json::from_value(value).unwrap();
        assert_eq!(doc.workout_days[0].exercises[0].achieved_reps, 8.5);
        assert_eq!(doc.extra["notes"], json!("deload after week 7"));

        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(back["notes"], json!("deload after week 7"));
        assert_eq!(back["workoutDays"][0]["exercises"][0]["tempo"], json!("3-1-1"));
        assert_eq!(back["initialWeights"][0]["source"], json!("gym test"));
    }

    #[test]
    fn test_set_week_field_needs_object() {
        let mut value = json!({ "currentWeek": 1, "other": true });
        set_week_field(&mut value, 4).unwrap();
        assert_eq!(value, json!({ "currentWeek": 4, "other": true }));

        let mut list = json!([1, 2]);
        assert!(set_week_field(&mut list, 4).is_err());
    }

    #[test]
    fn test_initial_value_set() {
        let mut value = InitialValue {
            name: "Squat".to_string(),
            max_weight: 150.0,
            single_at8_percentage: 92.5,
            extra: Map::new(),
        };
        value.set(InitialField::MaxWeight, 155.0);
        value.set(InitialField::SingleAt8Percentage, 90.0);
        assert_eq!(value.max_weight, 155.0);
        assert_eq!(value.single_at8_percentage, 90.0);
    }
}

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

use super::{seed_value, DocumentStore};

/// Workout document kept as a pretty-printed JSON file
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write the seed document if nothing is stored yet.
    /// Returns true when the file was created.
    pub fn ensure_seeded(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        self.save_value(&seed_value()?)?;
        info!("Seeded workout data at {}", self.path.display());
        Ok(true)
    }
}

impl DocumentStore for FileStore {
    fn load_value(&self) -> Result<Value> {
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let value = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        Ok(value)
    }

    fn save_value(&self, value: &Value) -> Result<()> {
        let data = serde_json::to_string_pretty(value)?;
        fs::write(&self.path, data)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

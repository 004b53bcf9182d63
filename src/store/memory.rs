use std::sync::Mutex;

use anyhow::{anyhow, Result};
use serde_json::Value;

use super::{seed_value, DocumentStore};

/// In-process document store.
///
/// Starts from a seed document and lives as long as the process. The server
/// builds exactly one and shares it through `Arc`; `reset` puts the seed back,
/// which is how tests get a clean store.
pub struct MemoryStore {
    seed: Value,
    document: Mutex<Value>,
}

impl MemoryStore {
    pub fn new(seed: Value) -> Self {
        Self {
            document: Mutex::new(seed.clone()),
            seed,
        }
    }

    /// Store initialised from the bundled program
    pub fn seeded() -> Result<Self> {
        Ok(Self::new(seed_value()?))
    }

    /// Discard every write since construction
    pub fn reset(&self) -> Result<()> {
        let mut document = self.lock()?;
        *document = self.seed.clone();
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Value>> {
        self.document
            .lock()
            .map_err(|_| anyhow!("Workout document lock poisoned"))
    }
}

impl DocumentStore for MemoryStore {
    fn load_value(&self) -> Result<Value> {
        Ok(self.lock()?.clone())
    }

    fn save_value(&self, value: &Value) -> Result<()> {
        *self.lock()? = value.clone();
        Ok(())
    }
}

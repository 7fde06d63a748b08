//! Fixture seeding through the application's persisted storage
//!
//! TodoMVC rehydrates its list from a single `localStorage` slot on startup.
//! Writing that slot and reloading gives every scenario a known starting state
//! without driving the UI. The payload is the one byte-exact contract with the
//! application:
//!
//! ```text
//! [{"completed":true,"title":"1"},{"completed":false,"title":"2"}]
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{E2eError, E2eResult};
use crate::task::{Task, TaskStatus};

/// Storage slot used by the troopjs TodoMVC build
pub const DEFAULT_STORAGE_KEY: &str = "todos-troopjs";

/// Shape of one persisted task. Field order is part of the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageRecord {
    pub completed: bool,
    pub title: String,
}

impl From<&Task> for StorageRecord {
    fn from(task: &Task) -> Self {
        Self {
            completed: task.status.is_completed(),
            title: task.text.clone(),
        }
    }
}

impl From<StorageRecord> for Task {
    fn from(record: StorageRecord) -> Self {
        let status = if record.completed {
            TaskStatus::Completed
        } else {
            TaskStatus::Active
        };
        Task::new(status, record.title)
    }
}

/// Serialize a seed list into the value stored under the storage key
pub fn payload(tasks: &[Task]) -> E2eResult<String> {
    let records: Vec<StorageRecord> = tasks.iter().map(StorageRecord::from).collect();
    Ok(serde_json::to_string(&records)?)
}

/// Parse a stored value back into tasks
pub fn parse_payload(raw: &str) -> E2eResult<Vec<Task>> {
    let records: Vec<StorageRecord> = serde_json::from_str(raw)
        .map_err(|e| E2eError::SeedingFailure(format!("unreadable storage payload: {}", e)))?;
    Ok(records.into_iter().map(Task::from).collect())
}

/// Encode any serializable value as a JavaScript literal
///
/// JSON is a subset of JavaScript expression syntax, so quoting and escaping
/// stay correct for arbitrary task text.
pub fn js_literal<T: Serialize + ?Sized>(value: &T) -> E2eResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Writes seed lists into a given storage slot
#[derive(Debug, Clone)]
pub struct FixtureSeeder {
    storage_key: String,
}

impl FixtureSeeder {
    pub fn new(storage_key: impl Into<String>) -> E2eResult<Self> {
        let storage_key = storage_key.into();
        if storage_key.trim().is_empty() {
            return Err(E2eError::SeedingFailure("storage key is empty".to_string()));
        }
        Ok(Self { storage_key })
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Script body that replaces persisted state and reloads the page
    ///
    /// The value is read back before the reload so a rejected write surfaces
    /// as a seeding failure instead of a later assertion mismatch.
    pub fn seed_script(&self, tasks: &[Task]) -> E2eResult<String> {
        let key = js_literal(&self.storage_key)?;
        let value = js_literal(&payload(tasks)?)?;

        Ok(format!(
            r#"    await ensureAppOpened(page);
    await page.evaluate(([key, value]) => window.localStorage.setItem(key, value), [{key}, {value}]);
    const stored = await page.evaluate((key) => window.localStorage.getItem(key), {key});
    if (stored !== {value}) {{
      throw new HarnessError('seeding', 'storage slot ' + {key} + ' did not accept the seed payload', stored);
    }}
    await page.reload();"#,
            key = key,
            value = value,
        ))
    }
}

impl Default for FixtureSeeder {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

//! Schedule persistence on top of a [`KeyValueStore`].
//!
//! The whole schedule lives under one key as a JSON array of full course
//! records. Every save overwrites it.

use thiserror::Error;

use crate::models::Course;
use crate::storage::{KeyValueStore, StorageError};

/// Key holding the serialized schedule.
pub const SCHEDULE_KEY: &str = "course-planner.schedule";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to encode schedule: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write schedule: {0}")]
    Storage(#[from] StorageError),
}

pub struct SchedulePersistence<S> {
    store: S,
}

impl<S: KeyValueStore> SchedulePersistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Reads the saved schedule.
    ///
    /// A missing key, an unreadable store and a value that does not decode as a
    /// course list all yield an empty schedule. Corrupt data is left in place;
    /// the next save overwrites it.
    pub fn load(&self) -> Vec<Course> {
        let raw = match self.store.get(SCHEDULE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::error!("Failed to read saved schedule: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Course>>(&raw) {
            Ok(courses) => {
                tracing::debug!("Loaded {} saved schedule entries", courses.len());
                courses
            }
            Err(e) => {
                tracing::warn!("Ignoring malformed saved schedule: {}", e);
                Vec::new()
            }
        }
    }

    pub fn save(&self, courses: &[Course]) -> Result<(), PersistError> {
        let encoded = serde_json::to_string(courses)?;
        self.store.set(SCHEDULE_KEY, &encoded)?;
        tracing::debug!("Persisted schedule with {} entries", courses.len());
        Ok(())
    }
}

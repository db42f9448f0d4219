//! The user's schedule.
//!
//! An insertion-ordered list of courses, unique by id. Every change is written
//! through to the [`SchedulePersistence`] before the call returns, and a failed
//! write leaves the in-memory list exactly as it was before the call.

use thiserror::Error;

use crate::models::{Course, ScheduleSummary};
use crate::persistence::{PersistError, SchedulePersistence};
use crate::storage::KeyValueStore;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// What a [`ScheduleStore::toggle`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
    /// The id was absent and not in the catalog; nothing changed.
    Unresolved,
}

pub struct ScheduleStore<S> {
    courses: Vec<Course>,
    persistence: SchedulePersistence<S>,
}

impl<S: KeyValueStore> ScheduleStore<S> {
    /// Loads the saved schedule, or starts empty if there is none.
    pub fn open(persistence: SchedulePersistence<S>) -> Self {
        let courses = dedup_by_id(persistence.load());
        Self {
            courses,
            persistence,
        }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn contains(&self, id: &str) -> bool {
        self.courses.iter().any(|c| c.id == id)
    }

    pub fn count(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Widened to `u64` so any number of `u32` credit values sums without overflow.
    pub fn total_credits(&self) -> u64 {
        self.courses.iter().map(|c| u64::from(c.credits)).sum()
    }

    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            courses: self.courses.clone(),
            count: self.count(),
            total_credits: self.total_credits(),
        }
    }

    /// Appends `course` unless a course with the same id is already present.
    /// Returns whether anything changed.
    pub fn add(&mut self, course: &Course) -> Result<bool, ScheduleError> {
        if self.contains(&course.id) {
            return Ok(false);
        }
        self.courses.push(course.clone());
        if let Err(e) = self.persistence.save(&self.courses) {
            self.courses.pop();
            return Err(e.into());
        }
        tracing::debug!("Added {} to schedule", course.id);
        Ok(true)
    }

    /// Removes the course with `id`. Returns whether anything changed.
    pub fn remove(&mut self, id: &str) -> Result<bool, ScheduleError> {
        let Some(pos) = self.courses.iter().position(|c| c.id == id) else {
            return Ok(false);
        };
        let removed = self.courses.remove(pos);
        if let Err(e) = self.persistence.save(&self.courses) {
            self.courses.insert(pos, removed);
            return Err(e.into());
        }
        tracing::debug!("Removed {} from schedule", id);
        Ok(true)
    }

    /// Removes `id` if present, otherwise adds the course `lookup` resolves it to.
    pub fn toggle<'a, F>(&mut self, id: &str, lookup: F) -> Result<Toggled, ScheduleError>
    where
        F: FnOnce(&str) -> Option<&'a Course>,
    {
        if self.contains(id) {
            self.remove(id)?;
            return Ok(Toggled::Removed);
        }
        match lookup(id) {
            Some(course) => {
                self.add(course)?;
                Ok(Toggled::Added)
            }
            None => {
                tracing::debug!("Toggle ignored: {} is not in the catalog", id);
                Ok(Toggled::Unresolved)
            }
        }
    }

    /// Empties the schedule. Asking the user first is up to the caller.
    pub fn clear(&mut self) -> Result<(), ScheduleError> {
        let previous = std::mem::take(&mut self.courses);
        if let Err(e) = self.persistence.save(&self.courses) {
            self.courses = previous;
            return Err(e.into());
        }
        tracing::debug!("Cleared schedule ({} entries)", previous.len());
        Ok(())
    }
}

fn dedup_by_id(courses: Vec<Course>) -> Vec<Course> {
    let mut seen = std::collections::HashSet::new();
    courses
        .into_iter()
        .filter(|c| seen.insert(c.id.clone()))
        .collect()
}

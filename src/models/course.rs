use serde::{Deserialize, Serialize};

/// A single catalog entry.
///
/// Courses come from the catalog file and are never mutated after load. The
/// schedule keeps full copies of them, so a saved schedule still renders after
/// a course disappears from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub department: String,
    /// Display code, e.g. `CS 101`.
    pub course_code: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub credits: u32,
    #[serde(default)]
    pub level: String,
    /// Terms the course is offered in, in catalog order.
    #[serde(default)]
    pub terms: Vec<String>,
    /// Prerequisite ids or free-form labels.
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

/// Top-level shape of a catalog file: `{ "courses": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPayload {
    pub courses: Vec<Course>,
}

/// Schedule contents plus the derived aggregates, as returned by the JSON API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub courses: Vec<Course>,
    pub count: usize,
    pub total_credits: u64,
}

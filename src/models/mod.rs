//! Domain models for the course planner.
//!
//! - [`Course`]: an immutable catalog record, also stored verbatim in the schedule.
//! - [`CatalogPayload`]: the on-disk / over-the-wire catalog container.
//! - [`ScheduleSummary`]: schedule contents with count and credit totals.

mod course;

pub use course::*;

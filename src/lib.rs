//! Course catalog browser with a persistent personal schedule.
//!
//! The catalog is loaded once and filtered by department; the schedule is an
//! ordered, de-duplicated selection of courses written through to a key-value
//! store on every change. [`app::App`] ties the pieces together and the
//! [`render`] functions project its state into HTML or plain text.

pub mod api;
pub mod app;
pub mod catalog;
pub mod config;
pub mod filter;
pub mod models;
pub mod persistence;
pub mod render;
pub mod schedule;
pub mod storage;

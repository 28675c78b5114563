//! Parkwise domain core.
//!
//! Pure domain logic shared by the database, API, and notification crates.
//! This crate has zero internal dependencies and performs no I/O.

pub mod activity_report;
pub mod billing;
pub mod booking;
pub mod error;
pub mod lot;
pub mod occupancy;
pub mod roles;
pub mod types;
pub mod vehicle;

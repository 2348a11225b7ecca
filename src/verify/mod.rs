//! Checks run before a migration mutates the project.

pub mod preflight;

pub use preflight::{preflight_checks, uncommitted_changes};

//! Command implementations.
//!
//! - **`migrate`**: the migration run behind the default command and `check`
//! - **`analyze`**: single-package report
//! - **`backup`**: snapshot, rollback and listing

pub mod analyze;
pub mod backup;
pub mod migrate;

pub use analyze::{PackageAnalysis, analyze_package};
pub use migrate::{MigrationRequest, compile_file_filter, migrate};

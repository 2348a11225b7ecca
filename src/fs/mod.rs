//! File system plumbing: staged writes, source discovery and project snapshots.

pub mod backup;
pub mod transaction;
pub mod walk;

pub use backup::{BackupRecord, create_backup, list_backups, restore_backup};
pub use transaction::{Operation, Transaction};
pub use walk::{SOURCE_DIR, find_source_files, relative_slash_path};

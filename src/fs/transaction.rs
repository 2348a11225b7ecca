//! Staged file writes, restored when a commit fails part way.
//!
//! Every file the migration touches (`package.json`, rewritten sources,
//! `tsconfig.json`) is staged here first and written in one pass at the end.
//!
//! A failed write restores every file the commit already wrote. Files whose
//! new content equals the old are never staged. In dry-run mode commit is a
//! no-op, so callers run the same code path either way.
//!
//! ## Example
//!
//! ```no_run
//! # use react_migrate::fs::Transaction;
//! # use std::path::PathBuf;
//! # fn example() -> react_migrate::error::Result<()> {
//! let mut txn = Transaction::new(false);
//!
//! txn.update_file(PathBuf::from("package.json"), "{}\n".into())?;
//! txn.commit()?;
//! # Ok(())
//! # }
//! ```

use crate::error::{MigrateError, Result};

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

/// A staged file write.
#[derive(Debug, Clone)]
pub struct Operation {
    pub path: PathBuf,
    /// Content read at staging time, restored on rollback.
    pub original: String,
    pub new: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransactionState {
    Building,
    Committed,
    /// Validation or a write failed; written files were restored.
    Failed,
}

/// Transaction coordinating file writes.
///
/// Must be explicitly committed. Dropping a non-empty, uncommitted
/// transaction logs a warning; nothing was written, so nothing is undone.
#[must_use = "Transaction must be committed"]
pub struct Transaction {
    operations: Vec<Operation>,
    dry_run: bool,
    state: TransactionState,
    executed: usize,
}

impl Transaction {
    pub fn new(dry_run: bool) -> Self {
        Self {
            operations: Vec::new(),
            dry_run,
            state: TransactionState::Building,
            executed: 0,
        }
    }

    fn ensure_building(&self) -> Result<()> {
        if self.state != TransactionState::Building {
            return Err(MigrateError::Other(anyhow::anyhow!(
                "Cannot stage into a closed transaction"
            )));
        }
        Ok(())
    }

    /// Every staged path must be unique, still present and writable.
    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for op in &self.operations {
            if !seen.insert(&op.path) {
                return Err(MigrateError::Other(anyhow::anyhow!(
                    "{} staged twice",
                    op.path.display()
                )));
            }

            let metadata = fs::metadata(&op.path).map_err(|e| {
                std::io::Error::new(
                    e.kind(),
                    format!("File no longer exists: {}", op.path.display()),
                )
            })?;
            if metadata.permissions().readonly() {
                return Err(MigrateError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("File is read-only: {}", op.path.display()),
                )));
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Reads `path` and stages `new_content` for it.
    ///
    /// Returns `false` (and stages nothing) when the content would not change.
    pub fn update_file(&mut self, path: PathBuf, new_content: String) -> Result<bool> {
        self.ensure_building()?;

        log::debug!("Staging {}", path.display());

        let original = fs::read_to_string(&path).map_err(|e| {
            log::error!("Failed to read {}: {}", path.display(), e);
            MigrateError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read {}: {}", path.display(), e),
            ))
        })?;

        self.stage(path, original, new_content)
    }

    /// Stages a file update when the caller already holds the original text.
    pub fn stage(&mut self, path: PathBuf, original: String, new_content: String) -> Result<bool> {
        self.ensure_building()?;

        if original == new_content {
            log::debug!("{} unchanged", path.display());
            return Ok(false);
        }

        if self.dry_run {
            log::info!("Would write {}", path.display());
        }

        self.operations.push(Operation {
            path,
            original,
            new: new_content,
        });
        Ok(true)
    }

    /// Writes all staged files.
    ///
    /// On a failed write, every file already written is restored before the
    /// error is returned.
    pub fn commit(&mut self) -> Result<()> {
        if self.state != TransactionState::Building {
            return Err(MigrateError::Other(anyhow::anyhow!(
                "Transaction is no longer open"
            )));
        }

        if self.dry_run {
            self.state = TransactionState::Committed;
            return Ok(());
        }

        if let Err(e) = self.validate() {
            self.state = TransactionState::Failed;
            return Err(e);
        }

        for idx in 0..self.operations.len() {
            let op = &self.operations[idx];
            if let Err(e) = fs::write(&op.path, &op.new) {
                let err = MigrateError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to write {}: {}", op.path.display(), e),
                ));
                self.state = TransactionState::Failed;
                if let Err(restore) = self.restore_executed() {
                    log::error!("{}", restore);
                }
                return Err(err);
            }
            log::debug!("Updated: {}", op.path.display());
            self.executed += 1;
        }

        self.state = TransactionState::Committed;
        Ok(())
    }

    /// Restores executed writes in reverse order.
    fn restore_executed(&mut self) -> Result<()> {
        let mut errors = Vec::new();

        for op in self.operations[..self.executed].iter().rev() {
            if let Err(e) = fs::write(&op.path, &op.original) {
                errors.push(format!("Failed to restore {}: {}", op.path.display(), e));
            }
        }
        self.executed = 0;

        if errors.is_empty() {
            Ok(())
        } else {
            Err(MigrateError::RollbackFailed(errors.join("; ")))
        }
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.state == TransactionState::Building && !self.operations.is_empty() && !self.dry_run
        {
            log::warn!("{} staged writes dropped without commit", self.operations.len());
        }
    }
}

//! Pre-flight checks performed before a migration touches anything.
//!
//! Everything here only reads: the project directory, its `package.json`
//! and, when available, `git status`.

use crate::error::{MigrateError, Result};
use crate::npm::Manifest;
use crate::steps::migrate::MigrationRequest;
use std::path::Path;
use std::process::Command;

/// Lists tracked files with uncommitted changes.
///
/// Untracked files are ignored. Returns an empty list when git is not
/// installed or the project is not inside a repository.
pub fn uncommitted_changes(project_root: &Path) -> Vec<String> {
    let is_git_repo = Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .current_dir(project_root)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);

    if !is_git_repo {
        log::debug!("Not a git repository (or git missing), skipping status check");
        return Vec::new();
    }

    // -uno = ignore untracked files
    match Command::new("git")
        .args(["status", "--porcelain", "-uno"])
        .current_dir(project_root)
        .output()
    {
        Ok(output) if output.status.success() => String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect(),
        Ok(output) => {
            log::warn!(
                "Git status command failed: {}",
                String::from_utf8_lossy(&output.stderr)
            );
            Vec::new()
        }
        Err(e) => {
            log::warn!("Failed to execute git status: {}", e);
            Vec::new()
        }
    }
}

/// Validates the request and loads the manifest it will migrate.
///
/// # Checks Performed
///
/// 1. Project path is an existing directory
/// 2. `package.json` exists and is a JSON object
/// 3. React is declared in `dependencies` or `devDependencies`
/// 4. Uncommitted tracked changes are warned about (not an error)
///
/// # Errors
///
/// Returns the first failed check. Nothing is written.
pub fn preflight_checks(request: &MigrationRequest) -> Result<Manifest> {
    let root = &request.project_root;
    if !root.is_dir() {
        return Err(MigrateError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Project directory does not exist: {}", root.display()),
        )));
    }

    let manifest = Manifest::load(root)?;
    if !manifest.has_framework() {
        return Err(MigrateError::FrameworkMissing);
    }

    if !request.dry_run {
        let dirty = uncommitted_changes(root);
        if !dirty.is_empty() {
            log::warn!("Uncommitted changes detected:");
            for file in dirty.iter().take(5) {
                log::warn!("  {}", file);
            }
            if dirty.len() > 5 {
                log::warn!("  ... and {} more files", dirty.len() - 5);
            }
            if !request.create_backup {
                log::warn!("Hint: use --backup to snapshot the project first");
            }
        }
    }

    Ok(manifest)
}

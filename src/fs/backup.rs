//! Project snapshots stored next to the project directory.
//!
//! A snapshot of `/work/shop` taken at 2026-10-18 14:03:07 lives in
//! `/work/shop.backup-20261018-140307/` and holds a copy of the project tree
//! (without `node_modules`) plus a `backup.json` describing it.

use crate::error::{MigrateError, Result};
use crate::npm::DEPENDENCY_CACHE;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Metadata file written at the root of every snapshot.
pub const RECORD_FILE: &str = "backup.json";

const BACKUP_INFIX: &str = ".backup-";
const ID_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Description of one snapshot, persisted as `backup.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    pub id: String,
    pub created_at: DateTime<Local>,
    pub path: PathBuf,
    #[serde(default)]
    pub description: Option<String>,
}

/// Canonical project directory and its final path component.
fn project_identity(project_root: &Path) -> Result<(PathBuf, String)> {
    let root = project_root.canonicalize().map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Cannot resolve project path {}: {}", project_root.display(), e),
        )
    })?;
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow::anyhow!("Project path {} has no directory name", root.display()))?;
    Ok((root, name))
}

/// Directory holding the snapshot `id` of the project at `root`.
fn snapshot_dir(root: &Path, name: &str, id: &str) -> PathBuf {
    let parent = root.parent().unwrap_or(root);
    parent.join(format!("{name}{BACKUP_INFIX}{id}"))
}

/// Copies the project tree into a new sibling snapshot directory.
///
/// Ids are second-resolution timestamps; a second snapshot within the same
/// second gets a `-2`, `-3`, ... suffix.
pub fn create_backup(project_root: &Path, description: Option<&str>) -> Result<BackupRecord> {
    let (root, name) = project_identity(project_root)?;
    let created_at = Local::now();
    let stamp = created_at.format(ID_FORMAT).to_string();

    let mut id = stamp.clone();
    let mut dir = snapshot_dir(&root, &name, &id);
    let mut n = 2;
    while dir.exists() {
        id = format!("{stamp}-{n}");
        dir = snapshot_dir(&root, &name, &id);
        n += 1;
    }

    log::debug!("Creating backup {} at {}", id, dir.display());
    copy_dir_recursive(&root, &dir, &is_excluded_from_snapshot)?;

    let record = BackupRecord {
        id,
        created_at,
        path: dir,
        description: description.map(str::to_string),
    };
    let json = serde_json::to_string_pretty(&record)?;
    fs::write(record.path.join(RECORD_FILE), format!("{json}\n"))?;

    log::info!("Backup {} created", record.id);
    Ok(record)
}

/// Snapshots of the project, newest first.
///
/// Sibling directories without a readable `backup.json` are skipped.
pub fn list_backups(project_root: &Path) -> Result<Vec<BackupRecord>> {
    let (root, name) = project_identity(project_root)?;
    let Some(parent) = root.parent() else {
        return Ok(Vec::new());
    };
    let prefix = format!("{name}{BACKUP_INFIX}");

    let mut records = Vec::new();
    for entry in fs::read_dir(parent)? {
        let entry = entry?;
        if !entry.file_name().to_string_lossy().starts_with(&prefix) {
            continue;
        }
        let record_path = entry.path().join(RECORD_FILE);
        let Ok(content) = fs::read_to_string(&record_path) else {
            continue;
        };
        match serde_json::from_str::<BackupRecord>(&content) {
            Ok(record) => records.push(record),
            Err(e) => log::debug!("Skipping {}: {}", record_path.display(), e),
        }
    }

    records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
    Ok(records)
}

/// Copies the files of snapshot `id` back over the project.
///
/// Files created after the snapshot are left in place.
pub fn restore_backup(project_root: &Path, id: &str) -> Result<BackupRecord> {
    let (root, name) = project_identity(project_root)?;
    let dir = snapshot_dir(&root, &name, id);
    let record_path = dir.join(RECORD_FILE);

    let content = fs::read_to_string(&record_path)
        .map_err(|_| MigrateError::BackupNotFound(id.to_string()))?;
    let record: BackupRecord = serde_json::from_str(&content)
        .map_err(|e| MigrateError::RollbackFailed(format!("{}: {}", record_path.display(), e)))?;

    log::debug!("Restoring {} into {}", dir.display(), root.display());
    copy_dir_recursive(&dir, &root, &|path| path == record_path.as_path())
        .map_err(|e| MigrateError::RollbackFailed(e.to_string()))?;

    log::info!("Backup {} restored", record.id);
    Ok(record)
}

/// `node_modules` and any directory that is itself a snapshot.
fn is_excluded_from_snapshot(path: &Path) -> bool {
    let name = path.file_name().map(|n| n.to_string_lossy());
    match name {
        Some(n) if n == DEPENDENCY_CACHE || n.contains(BACKUP_INFIX) => true,
        _ => path.is_dir() && path.join(RECORD_FILE).is_file(),
    }
}

/// Recursively copies `from` into `to`, skipping paths for which `skip` holds.
fn copy_dir_recursive(from: &Path, to: &Path, skip: &dyn Fn(&Path) -> bool) -> Result<()> {
    fs::create_dir_all(to)?;

    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let from_path = entry.path();
        if skip(&from_path) {
            log::debug!("Skipping {}", from_path.display());
            continue;
        }
        let to_path = to.join(entry.file_name());

        if file_type.is_dir() {
            copy_dir_recursive(&from_path, &to_path, skip)?;
        } else if file_type.is_file() {
            fs::copy(&from_path, &to_path).map_err(|e| {
                std::io::Error::new(
                    e.kind(),
                    format!("Failed to copy {}: {}", from_path.display(), e),
                )
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(temp: &TempDir) -> PathBuf {
        let root = temp.path().join("shop");
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("node_modules/react")).unwrap();
        fs::write(root.join("package.json"), "{}\n").unwrap();
        fs::write(root.join("src/index.js"), "original\n").unwrap();
        fs::write(root.join("node_modules/react/index.js"), "lib\n").unwrap();
        root
    }

    #[test]
    fn test_create_backup_copies_tree_without_dependency_cache() {
        let temp = TempDir::new().unwrap();
        let root = project(&temp);

        let record = create_backup(&root, Some("before upgrade")).unwrap();

        let name = record.path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("shop.backup-"));
        assert_eq!(record.path.parent(), root.canonicalize().unwrap().parent());
        assert!(record.path.join("src/index.js").is_file());
        assert!(record.path.join("package.json").is_file());
        assert!(!record.path.join("node_modules").exists());

        let saved: BackupRecord =
            serde_json::from_str(&fs::read_to_string(record.path.join(RECORD_FILE)).unwrap())
                .unwrap();
        assert_eq!(saved, record);
        assert_eq!(saved.description.as_deref(), Some("before upgrade"));
    }

    #[test]
    fn test_same_second_backups_get_distinct_ids() {
        let temp = TempDir::new().unwrap();
        let root = project(&temp);

        let a = create_backup(&root, None).unwrap();
        let b = create_backup(&root, None).unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.path, b.path);
    }

    #[test]
    fn test_list_backups_newest_first() {
        let temp = TempDir::new().unwrap();
        let root = project(&temp);
        assert!(list_backups(&root).unwrap().is_empty());

        let first = create_backup(&root, None).unwrap();
        let second = create_backup(&root, None).unwrap();
        fs::create_dir(temp.path().join("shop.backup-garbage")).unwrap();

        let listed = list_backups(&root).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[test]
    fn test_restore_backup_overwrites_changed_files() {
        let temp = TempDir::new().unwrap();
        let root = project(&temp);
        let record = create_backup(&root, None).unwrap();

        fs::write(root.join("src/index.js"), "migrated\n").unwrap();
        fs::write(root.join("src/new.js"), "new\n").unwrap();

        restore_backup(&root, &record.id).unwrap();

        assert_eq!(fs::read_to_string(root.join("src/index.js")).unwrap(), "original\n");
        assert!(root.join("src/new.js").exists());
        assert!(!root.join(RECORD_FILE).exists());
    }

    #[test]
    fn test_restore_unknown_backup() {
        let temp = TempDir::new().unwrap();
        let root = project(&temp);

        let err = restore_backup(&root, "19990101-000000").unwrap_err();
        assert!(matches!(err, MigrateError::BackupNotFound(id) if id == "19990101-000000"));
    }
}

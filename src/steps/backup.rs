//! `backup`, `rollback` and `list-backups` commands.

use crate::error::Result;
use crate::fs::{BackupRecord, create_backup, list_backups, restore_backup};

use colored::Colorize;
use std::path::Path;

/// Snapshots the project and prints where it went.
pub fn backup(project_root: &Path, description: Option<&str>) -> Result<BackupRecord> {
    let record = create_backup(project_root, description)?;
    println!(
        "{} Created backup {} at {}",
        "✓".green().bold(),
        record.id.cyan().bold(),
        record.path.display()
    );
    Ok(record)
}

/// Restores snapshot `id` over the project.
pub fn rollback(project_root: &Path, id: &str) -> Result<BackupRecord> {
    let record = restore_backup(project_root, id)?;
    println!(
        "{} Restored backup {} ({})",
        "✓".green().bold(),
        record.id.cyan().bold(),
        record.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    Ok(record)
}

/// Prints the project's snapshots, newest first.
pub fn list(project_root: &Path) -> Result<Vec<BackupRecord>> {
    let records = list_backups(project_root)?;

    if records.is_empty() {
        println!("{}", "No backups found".yellow());
        return Ok(records);
    }

    println!(
        "\n{} ({})",
        "Backups".bold(),
        records.len().to_string().cyan()
    );
    for record in &records {
        let description = record.description.as_deref().unwrap_or("");
        println!(
            "   {}  {}  {}",
            record.id.cyan(),
            record.created_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
            description
        );
    }
    println!();
    Ok(records)
}

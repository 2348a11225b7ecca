//! Fix/issue accumulation and the terminal report.
//!
//! A [`MigrationResult`] is created fresh for every migration and returned to
//! the caller; nothing is carried over between invocations.

use crate::fs::relative_slash_path;
use crate::version::TargetVersion;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// One human-readable report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    /// An automatically applied (or, on dry run, pending) change.
    Fix(String),
    /// Something that needs manual review.
    Issue(String),
}

impl LogEntry {
    pub fn fix(msg: impl Into<String>) -> Self {
        LogEntry::Fix(msg.into())
    }

    pub fn issue(msg: impl Into<String>) -> Self {
        LogEntry::Issue(msg.into())
    }

    pub fn is_fix(&self) -> bool {
        matches!(self, LogEntry::Fix(_))
    }

    pub fn message(&self) -> &str {
        match self {
            LogEntry::Fix(m) | LogEntry::Issue(m) => m,
        }
    }
}

/// Report section a fix is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Backup,
    Dependencies,
    Sources,
    Configuration,
}

impl Group {
    const ALL: [Group; 4] = [
        Group::Backup,
        Group::Dependencies,
        Group::Sources,
        Group::Configuration,
    ];

    fn heading(self) -> &'static str {
        match self {
            Group::Backup => "💾 Backup",
            Group::Dependencies => "📦 Dependencies",
            Group::Sources => "📝 Source files",
            Group::Configuration => "⚙  Configuration",
        }
    }
}

/// Outcome of a single migration invocation.
#[derive(Debug, Clone)]
pub struct MigrationResult {
    pub target: TargetVersion,
    pub dry_run: bool,
    pub fixes: Vec<String>,
    pub issues: Vec<String>,
    /// Source and config files that were (or would be) rewritten.
    pub changed_files: Vec<PathBuf>,
    pub manifest_changed: bool,
    group: Group,
    fix_groups: Vec<Group>,
}

impl MigrationResult {
    pub fn new(target: TargetVersion, dry_run: bool) -> Self {
        Self {
            target,
            dry_run,
            fixes: Vec::new(),
            issues: Vec::new(),
            changed_files: Vec::new(),
            manifest_changed: false,
            group: Group::Dependencies,
            fix_groups: Vec::new(),
        }
    }

    /// Files subsequent fixes under `group` in the report.
    pub fn begin(&mut self, group: Group) {
        self.group = group;
    }

    pub fn fix(&mut self, msg: impl Into<String>) {
        self.fixes.push(msg.into());
        self.fix_groups.push(self.group);
    }

    pub fn issue(&mut self, msg: impl Into<String>) {
        self.issues.push(msg.into());
    }

    pub fn record(&mut self, entry: LogEntry) {
        match entry {
            LogEntry::Fix(m) => self.fix(m),
            LogEntry::Issue(m) => self.issue(m),
        }
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = LogEntry>) {
        for entry in entries {
            self.record(entry);
        }
    }

    /// Fixes filed under `group`, in order.
    pub fn fixes_in(&self, group: Group) -> impl Iterator<Item = &str> {
        self.fixes
            .iter()
            .zip(&self.fix_groups)
            .filter(move |(_, g)| **g == group)
            .map(|(f, _)| f.as_str())
    }

    pub fn is_clean(&self) -> bool {
        self.fixes.is_empty() && self.issues.is_empty()
    }

    /// Prints the grouped report to stdout.
    ///
    /// Paths are shown relative to `project_root` with forward slashes.
    pub fn print_report(&self, project_root: &Path) {
        if self.dry_run {
            println!("\n{}", "DRY RUN - No changes will be made".yellow().bold());
        }

        println!(
            "\n{} {}",
            "Migrating to React".bold(),
            self.target.to_string().cyan().bold()
        );

        if self.is_clean() {
            println!("\n{}", "No changes needed".yellow());
            return;
        }

        for group in Group::ALL {
            let fixes: Vec<&str> = self.fixes_in(group).collect();
            if fixes.is_empty() {
                continue;
            }
            println!("\n{} ({})", group.heading().bold(), fixes.len());
            for fix in fixes {
                if self.dry_run {
                    println!("   • {}", fix);
                } else {
                    println!("   {} {}", "✓".green(), fix);
                }
            }
        }

        if !self.issues.is_empty() {
            println!(
                "\n{} {} ({})",
                "⚠".yellow().bold(),
                "Manual review needed".bold(),
                self.issues.len()
            );
            for issue in &self.issues {
                println!("   {} {}", "!".yellow(), issue);
            }
        }

        let mut files: Vec<String> = self
            .changed_files
            .iter()
            .map(|p| relative_slash_path(p, project_root))
            .collect();
        files.sort();
        files.dedup();
        let file_count = files.len() + usize::from(self.manifest_changed);

        println!();
        if self.dry_run {
            println!(
                "{} file{} would be modified. Run without {} to apply.",
                file_count.to_string().cyan().bold(),
                if file_count == 1 { "" } else { "s" },
                "--dry-run".cyan()
            );
        } else {
            println!(
                "{} Migration complete: {} file{} modified",
                "✓".green().bold(),
                file_count,
                if file_count == 1 { "" } else { "s" }
            );
        }
    }
}

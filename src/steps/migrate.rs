//! Orchestration of one migration run.
//!
//! Phases run in a fixed order, each writing its own files before the next
//! starts:
//!
//! 1. Pre-flight checks (nothing is touched if they fail)
//! 2. Analyze: current React range, candidate sources
//! 3. Backup (`--backup`)
//! 4. Dependencies: `package.json` written once, then the installer
//! 5. Sources: the rewrite pipeline over every discovered file
//! 6. Configuration: `tsconfig.json` and advisory checks
//!
//! A failing phase aborts the run. Files written by earlier phases stay
//! written; `--backup` plus `rollback` is the way back.

use crate::config::check_configuration;
use crate::error::{MigrateError, Result};
use crate::fs::{Transaction, create_backup, find_source_files, relative_slash_path};
use crate::npm::{Manifest, NodeModules, resolve_dependency_updates, run_install};
use crate::report::{Group, MigrationResult};
use crate::rewrite::{Pipeline, PipelineOptions};
use crate::verify::preflight_checks;
use crate::version::{TargetVersion, major_of};

use regex::Regex;
use std::fs;
use std::path::PathBuf;

/// Everything a migration needs to know, fixed for the whole run.
#[derive(Debug, Clone)]
pub struct MigrationRequest {
    pub project_root: PathBuf,
    pub target: TargetVersion,
    pub dry_run: bool,
    pub skip_dependencies: bool,
    pub dependencies_only: bool,
    pub create_backup: bool,
    /// Only sources whose root-relative path matches are rewritten.
    pub file_filter: Option<Regex>,
    /// Only this class is converted to a function component.
    pub component_filter: Option<String>,
    pub convert_classes: bool,
    pub skip_install: bool,
}

impl MigrationRequest {
    pub fn new(project_root: PathBuf, target: TargetVersion) -> Self {
        Self {
            project_root,
            target,
            dry_run: false,
            skip_dependencies: false,
            dependencies_only: false,
            create_backup: false,
            file_filter: None,
            component_filter: None,
            convert_classes: false,
            skip_install: false,
        }
    }

    fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            convert_classes: self.convert_classes,
            component_filter: self.component_filter.clone(),
        }
    }
}

/// Compiles a `--files` pattern.
pub fn compile_file_filter(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| MigrateError::InvalidFilter(pattern.to_string(), e.to_string()))
}

/// Runs a full migration and returns its fixes and issues.
///
/// Every call starts from an empty result.
pub fn migrate(request: &MigrationRequest) -> Result<MigrationResult> {
    let mut manifest = preflight_checks(request)?;
    let mut result = MigrationResult::new(request.target, request.dry_run);

    let sources = phase("analyze", || analyze(request, &manifest, &mut result))?;

    if request.create_backup {
        result.begin(Group::Backup);
        backup(request, &mut result);
    }

    if !request.skip_dependencies {
        result.begin(Group::Dependencies);
        phase("dependencies", || {
            update_dependencies(request, &mut manifest, &mut result)
        })?;
    }

    if request.dependencies_only {
        log::debug!("--deps-only: skipping source and configuration phases");
        return Ok(result);
    }

    result.begin(Group::Sources);
    phase("transform", || transform_sources(request, &sources, &mut result))?;

    result.begin(Group::Configuration);
    phase("configuration", || update_configuration(request, &mut result))?;

    Ok(result)
}

fn phase<T>(name: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    log::debug!("Phase: {}", name);
    f().inspect_err(|e| log::error!("{} phase failed: {}", name, e))
}

/// Records the starting point and lists the files the pipeline will see.
fn analyze(
    request: &MigrationRequest,
    manifest: &Manifest,
    result: &mut MigrationResult,
) -> Result<Vec<PathBuf>> {
    if let Some(current) = manifest.framework_range() {
        log::info!("Current React range: {}", current);
        if major_of(current) >= request.target.major() {
            result.issue(format!(
                "package.json already declares react@{current}; nothing to upgrade to React {}",
                request.target
            ));
        }
    }

    let sources = find_source_files(&request.project_root)?;
    log::info!(
        "Found {} source file{} under {}",
        sources.len(),
        if sources.len() == 1 { "" } else { "s" },
        request.project_root.display()
    );
    Ok(sources)
}

/// A failed snapshot is reported and the migration continues.
fn backup(request: &MigrationRequest, result: &mut MigrationResult) {
    if request.dry_run {
        result.fix("Would create a backup of the project");
        return;
    }

    let description = format!("Before migrating to React {}", request.target);
    match create_backup(&request.project_root, Some(&description)) {
        Ok(record) => result.fix(format!(
            "Created backup {} at {}",
            record.id,
            record.path.display()
        )),
        Err(e) => result.issue(format!("Backup failed: {e}")),
    }
}

fn update_dependencies(
    request: &MigrationRequest,
    manifest: &mut Manifest,
    result: &mut MigrationResult,
) -> Result<()> {
    let installed = NodeModules::new(&request.project_root);
    let resolution = resolve_dependency_updates(manifest, request.target, &installed)?;
    result.extend(resolution.entries(request.dry_run));

    if resolution.changes.is_empty() {
        log::debug!("package.json already up to date");
        return Ok(());
    }

    let mut txn = Transaction::new(request.dry_run);
    let staged = txn.update_file(manifest.path().to_path_buf(), manifest.to_pretty_string()?)?;
    txn.commit()?;
    result.manifest_changed = staged;

    if request.dry_run || request.skip_install {
        return Ok(());
    }
    match run_install(&request.project_root) {
        Ok(manager) => result.fix(format!("Installed dependencies with {manager}")),
        Err(message) => result.issue(message),
    }
    Ok(())
}

fn transform_sources(
    request: &MigrationRequest,
    sources: &[PathBuf],
    result: &mut MigrationResult,
) -> Result<()> {
    let pipeline = Pipeline::new(request.target, &request.pipeline_options())?;
    log::debug!("Rewrite rules: {}", pipeline.rule_names().join(", "));

    let mut txn = Transaction::new(request.dry_run);

    for path in sources {
        let rel = relative_slash_path(path, &request.project_root);
        if let Some(filter) = &request.file_filter {
            if !filter.is_match(&rel) {
                log::debug!("Skipping {} (does not match --files)", rel);
                continue;
            }
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Failed to read {}: {}", path.display(), e);
                result.issue(format!("{rel}: could not be read ({e}); skipped"));
                continue;
            }
        };
        let rewrite = pipeline.transform(&content, &rel);
        result.extend(rewrite.entries);

        if txn.stage(path.clone(), content, rewrite.content)? {
            if request.dry_run {
                result.fix(format!("Would transform {rel}"));
            }
            result.changed_files.push(path.clone());
        }
    }

    log::debug!("Staged {} source rewrites", txn.len());
    txn.commit()
}

fn update_configuration(request: &MigrationRequest, result: &mut MigrationResult) -> Result<()> {
    let mut txn = Transaction::new(request.dry_run);
    let report = check_configuration(&request.project_root, request.target, &mut txn)?;
    result.extend(report.entries);
    result.changed_files.extend(report.changed);
    txn.commit()
}

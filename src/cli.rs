use crate::error::Result;
use crate::steps::{MigrationRequest, compile_file_filter};
use crate::version::TargetVersion;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "react-migrate",
    version,
    about = "Upgrade a React project: dependency ranges, source rewrites and config review",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub migrate: MigrateArgs,

    /// Show debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show what a migration would change without writing anything
    Check(CheckArgs),

    /// Show the declared, recommended and peer ranges of one package
    Analyze(AnalyzeArgs),

    /// Snapshot the project into a sibling directory
    Backup(BackupArgs),

    /// Restore a snapshot over the project
    Rollback(RollbackArgs),

    /// List snapshots of the project, newest first
    #[command(name = "list-backups")]
    ListBackups(ProjectArgs),
}

/// Arguments of the default (migrate) command.
#[derive(Args, Debug, Clone)]
pub struct MigrateArgs {
    /// React version to migrate to: 17, 18 or 19
    #[arg(default_value = "18")]
    pub target: String,

    /// Project directory containing package.json
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Preview changes without applying them
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Leave package.json untouched
    #[arg(long = "skip-deps")]
    pub skip_deps: bool,

    /// Only update package.json (no source or config changes)
    #[arg(long = "deps-only", conflicts_with = "skip_deps")]
    pub deps_only: bool,

    /// Do not run the package manager after updating package.json
    #[arg(long)]
    pub skip_install: bool,

    /// Snapshot the project before changing it
    #[arg(long)]
    pub backup: bool,

    /// Only rewrite source files whose project-relative path matches REGEX
    #[arg(long = "files", value_name = "REGEX")]
    pub files: Option<String>,

    /// Only convert the class component with this name (implies --convert-classes)
    #[arg(long = "component", value_name = "NAME")]
    pub component: Option<String>,

    /// Convert simple class components to function components
    #[arg(long)]
    pub convert_classes: bool,
}

impl MigrateArgs {
    /// Validates the arguments and builds the request.
    ///
    /// The target version and `--files` pattern are checked here, before
    /// anything on disk is read.
    pub fn into_request(self) -> Result<MigrationRequest> {
        let target: TargetVersion = self.target.parse()?;
        let file_filter = self.files.as_deref().map(compile_file_filter).transpose()?;

        Ok(MigrationRequest {
            project_root: self.path,
            target,
            dry_run: self.dry_run,
            skip_dependencies: self.skip_deps,
            dependencies_only: self.deps_only,
            create_backup: self.backup,
            file_filter,
            component_filter: self.component,
            convert_classes: self.convert_classes,
            skip_install: self.skip_install,
        })
    }
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// React version to check against: 17, 18 or 19
    #[arg(default_value = "18")]
    pub target: String,

    /// Project directory containing package.json
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

impl CheckArgs {
    pub fn into_request(self) -> Result<MigrationRequest> {
        let target: TargetVersion = self.target.parse()?;
        Ok(MigrationRequest {
            dry_run: true,
            skip_install: true,
            ..MigrationRequest::new(self.path, target)
        })
    }
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// npm package name
    pub package: String,

    /// React version to analyze against: 17, 18 or 19
    #[arg(default_value = "18")]
    pub target: String,

    /// Project directory containing package.json
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct BackupArgs {
    /// Project directory
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Note stored with the snapshot
    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RollbackArgs {
    /// Snapshot id as shown by list-backups
    pub id: String,

    /// Project directory
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project directory
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

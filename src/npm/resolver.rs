//! Dependency range updates and peer-dependency conflict detection.
//!
//! The resolver works purely on an in-memory [`Manifest`]; installed package
//! metadata is read through the [`InstalledPackages`] seam so tests can supply
//! fixtures without a `node_modules` tree.

use crate::error::{MigrateError, Result};
use crate::npm::manifest::{DEPENDENCY_CACHE, DependencySection, FRAMEWORK, Manifest, RENDERER};
use crate::npm::versions;
use crate::report::LogEntry;
use crate::version::{TargetVersion, major_of};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Read access to packages installed in the project.
pub trait InstalledPackages {
    /// The range `package` declares for `peer` in its `peerDependencies`.
    ///
    /// `None` when the package is not installed or declares no such peer.
    fn peer_requirement(&self, package: &str, peer: &str) -> Option<String>;
}

/// Installed packages under `<project>/node_modules`.
#[derive(Debug, Clone)]
pub struct NodeModules {
    root: PathBuf,
}

#[derive(Debug, Deserialize)]
struct InstalledManifest {
    #[serde(rename = "peerDependencies", default)]
    peer_dependencies: BTreeMap<String, String>,
}

impl NodeModules {
    pub fn new(project_root: &Path) -> Self {
        Self {
            root: project_root.join(DEPENDENCY_CACHE),
        }
    }
}

impl InstalledPackages for NodeModules {
    fn peer_requirement(&self, package: &str, peer: &str) -> Option<String> {
        let path = self.root.join(package).join("package.json");
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str::<InstalledManifest>(&content) {
            Ok(manifest) => manifest.peer_dependencies.get(peer).cloned(),
            Err(e) => {
                log::debug!("Ignoring unreadable {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// One range replacement applied to the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyChange {
    pub name: String,
    pub section: DependencySection,
    pub from: String,
    pub to: String,
}

impl DependencyChange {
    /// Report line; `dry_run` switches to the "Would update" phrasing.
    pub fn describe(&self, dry_run: bool) -> String {
        let verb = if dry_run { "Would update" } else { "Updated" };
        let section = match self.section {
            DependencySection::Dependencies => "",
            DependencySection::DevDependencies => " (devDependencies)",
        };
        format!(
            "{verb} {}{section} from {} to {}",
            self.name, self.from, self.to
        )
    }
}

/// Outcome of [`resolve_dependency_updates`].
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub changes: Vec<DependencyChange>,
    /// Peer-dependency mismatch descriptions.
    pub conflicts: Vec<String>,
}

impl Resolution {
    pub fn entries(&self, dry_run: bool) -> Vec<LogEntry> {
        self.changes
            .iter()
            .map(|c| LogEntry::fix(c.describe(dry_run)))
            .chain(self.conflicts.iter().cloned().map(LogEntry::issue))
            .collect()
    }
}

/// Rewrites dependency ranges in `manifest` for `target`.
///
/// - `react` and `react-dom` in `dependencies` become `^<target>`.
/// - Known ecosystem packages get their mapped range in every section they
///   already appear in.
/// - Nothing is ever added or removed; only existing values change.
pub fn resolve_dependency_updates(
    manifest: &mut Manifest,
    target: TargetVersion,
    installed: &dyn InstalledPackages,
) -> Result<Resolution> {
    if !manifest.has_framework() {
        return Err(MigrateError::FrameworkMissing);
    }

    let mut resolution = Resolution::default();

    let core_range = target.caret_range();
    for name in [FRAMEWORK, RENDERER] {
        apply(
            manifest,
            DependencySection::Dependencies,
            name,
            &core_range,
            &mut resolution,
        );
    }

    for name in versions::known_packages() {
        let Some(range) = versions::lookup(name, target) else {
            continue;
        };
        for section in manifest.sections_of(name) {
            apply(manifest, section, name, range, &mut resolution);
        }
    }

    resolution.conflicts = peer_conflicts(manifest, target, installed);

    log::debug!(
        "Resolved {} dependency change(s), {} peer conflict(s)",
        resolution.changes.len(),
        resolution.conflicts.len()
    );
    Ok(resolution)
}

fn apply(
    manifest: &mut Manifest,
    section: DependencySection,
    name: &str,
    range: &str,
    resolution: &mut Resolution,
) {
    let Some(from) = manifest.get(section, name).map(str::to_string) else {
        return;
    };
    if manifest.set(section, name, range) {
        resolution.changes.push(DependencyChange {
            name: name.to_string(),
            section,
            from,
            to: range.to_string(),
        });
    }
}

/// Compares installed React-related packages' declared React peer range
/// against the target, by major version only.
pub fn peer_conflicts(
    manifest: &Manifest,
    target: TargetVersion,
    installed: &dyn InstalledPackages,
) -> Vec<String> {
    manifest
        .all_names()
        .into_iter()
        .filter(|name| name.contains(FRAMEWORK) && name != FRAMEWORK && name != RENDERER)
        .filter_map(|name| {
            let required = installed.peer_requirement(&name, FRAMEWORK)?;
            if major_of(&required) == target.major() {
                return None;
            }
            Some(format!(
                "{name} requires react@{required} as a peer, which may not support React {target}"
            ))
        })
        .collect()
}

//! `analyze <PACKAGE>`: what a migration would do to one dependency.

use crate::error::Result;
use crate::npm::{
    DependencySection, FRAMEWORK, InstalledPackages, Manifest, NodeModules, RENDERER, versions,
};
use crate::version::{TargetVersion, major_of};

use colored::Colorize;
use std::path::Path;

/// Facts about one package relative to a target React version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageAnalysis {
    pub package: String,
    pub target: TargetVersion,
    /// Declared ranges, one per manifest section the package appears in.
    pub declared: Vec<(DependencySection, String)>,
    /// Range a migration would write, if the package is known.
    pub recommended: Option<String>,
    /// React peer range declared by the installed copy.
    pub peer_requirement: Option<String>,
}

impl PackageAnalysis {
    /// `true` when the installed copy's React peer major differs from the target.
    pub fn has_peer_conflict(&self) -> bool {
        self.peer_requirement
            .as_deref()
            .is_some_and(|req| major_of(req) != self.target.major())
    }

    /// `true` when a migration would change at least one declared range.
    pub fn would_change(&self) -> bool {
        match &self.recommended {
            Some(rec) => self.declared.iter().any(|(section, range)| {
                let is_core = self.package == FRAMEWORK || self.package == RENDERER;
                range != rec && (!is_core || *section == DependencySection::Dependencies)
            }),
            None => false,
        }
    }

    pub fn print(&self) {
        println!(
            "\n{} {} {} React {}",
            "Analysis of".bold(),
            self.package.cyan().bold(),
            "for".bold(),
            self.target.to_string().cyan().bold()
        );

        if self.declared.is_empty() {
            println!("   Declared:    {}", "not in package.json".dimmed());
        }
        for (section, range) in &self.declared {
            println!("   Declared:    {} ({})", range, section.key().dimmed());
        }

        match &self.recommended {
            Some(rec) => println!("   Recommended: {}", rec.green()),
            None => println!("   Recommended: {}", "no known mapping".dimmed()),
        }

        match &self.peer_requirement {
            Some(req) if self.has_peer_conflict() => println!(
                "   Peer:        react@{} {}",
                req,
                "(may not support this React version)".yellow()
            ),
            Some(req) => println!("   Peer:        react@{}", req),
            None => println!("   Peer:        {}", "not installed or no react peer".dimmed()),
        }

        println!();
        if self.would_change() {
            println!("{} a migration would update this package", "→".cyan().bold());
        } else {
            println!("{} no change needed", "✓".green().bold());
        }
    }
}

/// Analyzes `package` in the project at `project_root`.
pub fn analyze_package(
    project_root: &Path,
    package: &str,
    target: TargetVersion,
) -> Result<PackageAnalysis> {
    let manifest = Manifest::load(project_root)?;
    Ok(analyze_with(&manifest, package, target, &NodeModules::new(project_root)))
}

fn analyze_with(
    manifest: &Manifest,
    package: &str,
    target: TargetVersion,
    installed: &dyn InstalledPackages,
) -> PackageAnalysis {
    let declared = manifest
        .sections_of(package)
        .into_iter()
        .filter_map(|section| {
            manifest
                .get(section, package)
                .map(|range| (section, range.to_string()))
        })
        .collect();

    let recommended = if package == FRAMEWORK || package == RENDERER {
        Some(target.caret_range())
    } else {
        versions::lookup(package, target).map(str::to_string)
    };

    let peer_requirement = if package == FRAMEWORK {
        None
    } else {
        installed.peer_requirement(package, FRAMEWORK)
    };

    log::debug!(
        "Analyzed {}: declared {:?}, recommended {:?}",
        package,
        declared,
        recommended
    );

    PackageAnalysis {
        package: package.to_string(),
        target,
        declared,
        recommended,
        peer_requirement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct Peers(&'static str);

    impl InstalledPackages for Peers {
        fn peer_requirement(&self, _package: &str, _peer: &str) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    fn manifest(json: &str) -> Manifest {
        Manifest::parse(PathBuf::from("package.json"), json).unwrap()
    }

    #[test]
    fn test_known_package_with_conflicting_peer() {
        let m = manifest(r#"{"dependencies": {"react": "^16.14.0", "react-redux": "^7.2.0"}}"#);
        let analysis =
            analyze_with(&m, "react-redux", TargetVersion::V18, &Peers("^16.8.3 || ^17"));

        assert_eq!(
            analysis.declared,
            vec![(DependencySection::Dependencies, "^7.2.0".to_string())]
        );
        assert_eq!(analysis.recommended.as_deref(), Some("^8.1.3"));
        assert!(analysis.has_peer_conflict());
        assert!(analysis.would_change());
    }

    #[test]
    fn test_framework_itself() {
        let m = manifest(r#"{"dependencies": {"react": "^19"}}"#);
        let analysis = analyze_with(&m, "react", TargetVersion::V19, &Peers("^1"));

        assert_eq!(analysis.recommended.as_deref(), Some("^19"));
        assert_eq!(analysis.peer_requirement, None);
        assert!(!analysis.would_change());
    }

    #[test]
    fn test_framework_in_dev_dependencies_is_left_alone() {
        let m = manifest(r#"{"devDependencies": {"react": "^16.0.0"}}"#);
        let analysis = analyze_with(&m, "react", TargetVersion::V18, &Peers("^1"));
        assert!(!analysis.would_change());
    }

    #[test]
    fn test_unknown_undeclared_package() {
        let m = manifest(r#"{"dependencies": {"react": "^16.0.0"}}"#);
        let analysis = analyze_with(&m, "left-pad", TargetVersion::V17, &Peers("^16.0.0"));

        assert!(analysis.declared.is_empty());
        assert_eq!(analysis.recommended, None);
        assert!(!analysis.would_change());
        analysis.print();
    }

    #[test]
    fn test_analyze_package_reads_project() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("package.json"),
            r#"{"devDependencies": {"@testing-library/react": "^12.1.5"}}"#,
        )
        .unwrap();

        let analysis =
            analyze_package(temp.path(), "@testing-library/react", TargetVersion::V19).unwrap();
        assert_eq!(analysis.recommended.as_deref(), Some("^16.0.0"));
        assert_eq!(analysis.peer_requirement, None);
        assert!(analysis.would_change());
    }
}

//! `package.json` access.
//!
//! The whole document is kept as an order-preserving JSON object so that
//! fields this tool never touches (scripts, browserslist, ...) are written back
//! unchanged. Only values inside the two dependency maps are ever replaced.

use crate::error::{MigrateError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "package.json";
pub const FRAMEWORK: &str = "react";
pub const RENDERER: &str = "react-dom";
/// Directory holding installed packages.
pub const DEPENDENCY_CACHE: &str = "node_modules";

/// Dependency map inside the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencySection {
    Dependencies,
    DevDependencies,
}

impl DependencySection {
    pub const ALL: [DependencySection; 2] = [
        DependencySection::Dependencies,
        DependencySection::DevDependencies,
    ];

    pub fn key(self) -> &'static str {
        match self {
            DependencySection::Dependencies => "dependencies",
            DependencySection::DevDependencies => "devDependencies",
        }
    }
}

/// In-memory `package.json`.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    doc: Map<String, Value>,
}

impl Manifest {
    /// Reads `package.json` from the project root.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(MANIFEST_FILE);
        if !path.is_file() {
            return Err(MigrateError::ManifestNotFound(path));
        }
        let content = fs::read_to_string(&path)?;
        Self::parse(path, &content)
    }

    pub fn parse(path: PathBuf, content: &str) -> Result<Self> {
        let value = serde_json::from_str::<Value>(content)
            .map_err(|e| MigrateError::InvalidManifest(format!("{}: {}", path.display(), e)))?;
        match value {
            Value::Object(doc) => Ok(Self { path, doc }),
            _ => Err(MigrateError::InvalidManifest(
                "top-level value must be an object".to_string(),
            )),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn section(&self, section: DependencySection) -> Option<&Map<String, Value>> {
        self.doc.get(section.key()).and_then(Value::as_object)
    }

    /// Version range recorded for `name`, if it is a string.
    pub fn get(&self, section: DependencySection, name: &str) -> Option<&str> {
        self.section(section)
            .and_then(|deps| deps.get(name))
            .and_then(Value::as_str)
    }

    /// Replaces the range of an existing entry. Never adds keys.
    ///
    /// Returns `true` if the stored value changed.
    pub fn set(&mut self, section: DependencySection, name: &str, range: &str) -> bool {
        let Some(slot) = self
            .doc
            .get_mut(section.key())
            .and_then(Value::as_object_mut)
            .and_then(|deps| deps.get_mut(name))
        else {
            return false;
        };

        if slot.as_str() == Some(range) {
            return false;
        }
        *slot = Value::String(range.to_string());
        true
    }

    /// Package names of one section, in manifest order.
    pub fn names(&self, section: DependencySection) -> Vec<String> {
        self.section(section)
            .map(|deps| deps.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Sections in which `name` is declared.
    pub fn sections_of(&self, name: &str) -> Vec<DependencySection> {
        DependencySection::ALL
            .into_iter()
            .filter(|s| self.section(*s).is_some_and(|deps| deps.contains_key(name)))
            .collect()
    }

    /// All declared package names, dependencies first, deduplicated.
    pub fn all_names(&self) -> Vec<String> {
        let mut names = self.names(DependencySection::Dependencies);
        for name in self.names(DependencySection::DevDependencies) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// The declared React range, direct dependencies taking precedence.
    pub fn framework_range(&self) -> Option<&str> {
        self.get(DependencySection::Dependencies, FRAMEWORK)
            .or_else(|| self.get(DependencySection::DevDependencies, FRAMEWORK))
    }

    pub fn has_framework(&self) -> bool {
        !self.sections_of(FRAMEWORK).is_empty()
    }

    /// Pretty-printed JSON with two-space indent and a trailing newline.
    pub fn to_pretty_string(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(&self.doc)?;
        out.push('\n');
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manifest(content: &str) -> Manifest {
        Manifest::parse(PathBuf::from("package.json"), content).unwrap()
    }

    #[test]
    fn test_load_missing_manifest() {
        let temp = TempDir::new().unwrap();
        let err = Manifest::load(temp.path()).unwrap_err();
        assert!(matches!(err, MigrateError::ManifestNotFound(_)));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        let err = Manifest::parse(PathBuf::from("package.json"), "[]").unwrap_err();
        assert!(matches!(err, MigrateError::InvalidManifest(_)));
    }

    #[test]
    fn test_set_never_adds_keys() {
        let mut m = manifest(r#"{"dependencies": {"react": "^16.0.0"}}"#);

        assert!(m.set(DependencySection::Dependencies, "react", "^18"));
        assert!(!m.set(DependencySection::Dependencies, "react-dom", "^18"));
        assert!(!m.set(DependencySection::DevDependencies, "react", "^18"));

        assert_eq!(m.names(DependencySection::Dependencies), vec!["react"]);
        assert!(m.names(DependencySection::DevDependencies).is_empty());
        assert_eq!(m.get(DependencySection::Dependencies, "react"), Some("^18"));
    }

    #[test]
    fn test_set_same_value_reports_unchanged() {
        let mut m = manifest(r#"{"dependencies": {"react": "^18"}}"#);
        assert!(!m.set(DependencySection::Dependencies, "react", "^18"));
    }

    #[test]
    fn test_framework_detection() {
        let dev_only = manifest(r#"{"devDependencies": {"react": "^17.0.2"}}"#);
        assert!(dev_only.has_framework());
        assert_eq!(dev_only.framework_range(), Some("^17.0.2"));

        let none = manifest(r#"{"dependencies": {"vue": "^3.0.0"}}"#);
        assert!(!none.has_framework());
    }

    #[test]
    fn test_pretty_string_preserves_field_order() {
        let m = manifest(
            r#"{"name":"app","version":"1.0.0","scripts":{"start":"x"},"dependencies":{"react":"^16.0.0"}}"#,
        );
        let out = m.to_pretty_string().unwrap();

        let name = out.find("\"name\"").unwrap();
        let scripts = out.find("\"scripts\"").unwrap();
        let deps = out.find("\"dependencies\"").unwrap();
        assert!(name < scripts && scripts < deps);
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn test_all_names_deduplicates() {
        let m = manifest(
            r#"{"dependencies":{"react":"^16.0.0","redux":"^4.0.0"},"devDependencies":{"redux":"^4.0.0","jest":"^27.0.0"}}"#,
        );
        assert_eq!(m.all_names(), vec!["react", "redux", "jest"]);
        assert_eq!(
            m.sections_of("redux"),
            vec![
                DependencySection::Dependencies,
                DependencySection::DevDependencies
            ]
        );
    }
}

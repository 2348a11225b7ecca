//! Package manager invocation after the manifest is rewritten.

use std::fmt;
use std::path::Path;
use std::process::Command;

/// Package manager owning the project's lockfile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    /// Picks the manager from the lockfile present at the project root.
    pub fn detect(project_root: &Path) -> Self {
        if project_root.join("pnpm-lock.yaml").exists() {
            PackageManager::Pnpm
        } else if project_root.join("yarn.lock").exists() {
            PackageManager::Yarn
        } else {
            PackageManager::Npm
        }
    }

    pub fn program(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// Runs `<manager> install` in the project root and waits for it.
///
/// Failures are returned as a message for the issue log rather than an error:
/// a broken install must not abort the remaining migration phases.
pub fn run_install(project_root: &Path) -> std::result::Result<PackageManager, String> {
    let manager = PackageManager::detect(project_root);
    log::info!("Running {} install in {}", manager, project_root.display());

    let output = Command::new(manager.program())
        .arg("install")
        .current_dir(project_root)
        .output();

    match output {
        Ok(output) if output.status.success() => Ok(manager),
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let first_line = stderr.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
            Err(format!(
                "{manager} install failed ({}): {}",
                output.status,
                first_line.trim()
            ))
        }
        Err(e) => Err(format!("Could not run {manager} install: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_detect_defaults_to_npm() {
        let temp = TempDir::new().unwrap();
        assert_eq!(PackageManager::detect(temp.path()), PackageManager::Npm);
    }

    #[test]
    fn test_detect_from_lockfile() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("yarn.lock"), "").unwrap();
        assert_eq!(PackageManager::detect(temp.path()), PackageManager::Yarn);

        fs::write(temp.path().join("pnpm-lock.yaml"), "").unwrap();
        assert_eq!(PackageManager::detect(temp.path()), PackageManager::Pnpm);
    }
}

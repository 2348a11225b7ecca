//! npm manifest handling.
//!
//! - **`manifest`**: reading and writing `package.json`
//! - **`versions`**: replacement ranges per React major
//! - **`resolver`**: applying those ranges and checking peer requirements
//! - **`installer`**: running the project's package manager

pub mod installer;
pub mod manifest;
pub mod resolver;
pub mod versions;

pub use installer::{PackageManager, run_install};
pub use manifest::{
    DEPENDENCY_CACHE, DependencySection, FRAMEWORK, MANIFEST_FILE, Manifest, RENDERER,
};
pub use resolver::{
    DependencyChange, InstalledPackages, NodeModules, Resolution, peer_conflicts,
    resolve_dependency_updates,
};

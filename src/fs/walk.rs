//! Source file discovery.

use crate::error::Result;
use crate::npm::DEPENDENCY_CACHE;

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Directory under the project root that holds source files.
pub const SOURCE_DIR: &str = "src";

const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx"];

/// Lists candidate source files under `<project_root>/src`.
///
/// Directories starting with `.` and `node_modules` are not entered. Ignore
/// files are not consulted, so generated code checked into `src/` is still
/// migrated. Entries are sorted by file name within each directory, giving a
/// stable order for a given tree. A missing `src/` yields an empty list.
pub fn find_source_files(project_root: &Path) -> Result<Vec<PathBuf>> {
    let root = project_root.join(SOURCE_DIR);
    if !root.is_dir() {
        log::debug!("No {} directory under {}", SOURCE_DIR, project_root.display());
        return Ok(Vec::new());
    }

    let walker = WalkBuilder::new(&root)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_some_and(|ft| ft.is_dir()) {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !(name.starts_with('.') || name == DEPENDENCY_CACHE)
        })
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let is_source = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));
        if is_source {
            files.push(path.to_path_buf());
        }
    }

    log::debug!("Discovered {} source files", files.len());
    Ok(files)
}

/// Root-relative path with forward slashes, as matched by `--files`.
pub fn relative_slash_path(path: &Path, root: &Path) -> String {
    let relative = pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf());
    relative.to_string_lossy().replace('\\', "/")
}

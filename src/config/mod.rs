//! Project configuration checks.
//!
//! Only `tsconfig.json` is ever rewritten (classic → automatic JSX runtime).
//! Test runner, linter, transpiler and bundler configs are inspected as text
//! and produce review notes. Every check is gated on the file existing and on
//! the target version; a file that cannot be read or parsed becomes an issue
//! and is left alone.

pub mod json;

use crate::error::Result;
use crate::fs::Transaction;
use crate::report::LogEntry;
use crate::version::TargetVersion;

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

pub const TSCONFIG_FILE: &str = "tsconfig.json";

const JEST_FILES: &[&str] = &[
    "jest.config.js",
    "jest.config.ts",
    "jest.config.mjs",
    "jest.config.cjs",
    "jest.config.json",
];

const ESLINT_FILES: &[&str] = &[
    ".eslintrc",
    ".eslintrc.js",
    ".eslintrc.cjs",
    ".eslintrc.json",
    ".eslintrc.yml",
    ".eslintrc.yaml",
    "eslint.config.js",
    "eslint.config.mjs",
];

const BABEL_FILES: &[&str] = &[
    ".babelrc",
    ".babelrc.json",
    "babel.config.js",
    "babel.config.json",
    "babel.config.cjs",
];

const WEBPACK_FILES: &[&str] = &["webpack.config.js", "webpack.config.ts"];

const VITE_FILES: &[&str] = &["vite.config.js", "vite.config.ts", "vite.config.mjs"];

/// Entries produced by the configuration pass.
#[derive(Debug, Default)]
pub struct ConfigReport {
    pub entries: Vec<LogEntry>,
    /// Config files staged for rewrite.
    pub changed: Vec<PathBuf>,
}

impl ConfigReport {
    fn issue(&mut self, msg: String) {
        self.entries.push(LogEntry::issue(msg));
    }
}

/// Runs every configuration check for `target` under `project_root`.
///
/// The `tsconfig.json` rewrite is staged in `txn`; nothing is written here.
pub fn check_configuration(
    project_root: &Path,
    target: TargetVersion,
    txn: &mut Transaction,
) -> Result<ConfigReport> {
    let mut report = ConfigReport::default();

    update_tsconfig(project_root, target, txn, &mut report)?;
    check_jest(project_root, target, &mut report)?;
    check_eslint(project_root, target, &mut report);
    check_babel(project_root, target, &mut report);
    check_bundlers(project_root, target, &mut report)?;

    log::debug!("Configuration pass produced {} entries", report.entries.len());
    Ok(report)
}

/// Existing config files from `candidates`, with their contents.
///
/// Unreadable files are reported and skipped.
fn read_existing(
    project_root: &Path,
    candidates: &[&str],
    report: &mut ConfigReport,
) -> Vec<(String, String)> {
    candidates
        .iter()
        .filter_map(|name| {
            let path = project_root.join(name);
            if !path.is_file() {
                return None;
            }
            match fs::read_to_string(&path) {
                Ok(content) => Some((name.to_string(), content)),
                Err(e) => {
                    report.issue(format!("{name}: could not be read ({e})"));
                    None
                }
            }
        })
        .collect()
}

/// `compilerOptions.jsx: "react"` → `"react-jsx"` for React 17+.
///
/// The value is replaced in the original text, so comments and formatting
/// are kept even when the file needed the lenient parser.
fn update_tsconfig(
    project_root: &Path,
    target: TargetVersion,
    txn: &mut Transaction,
    report: &mut ConfigReport,
) -> Result<()> {
    let Some((name, content)) = read_existing(project_root, &[TSCONFIG_FILE], report).pop() else {
        return Ok(());
    };

    let value = match json::parse_lenient(&content) {
        Ok((value, mode)) => {
            log::debug!("{} parsed ({:?})", name, mode);
            value
        }
        Err(e) => {
            report.issue(format!("{name}: could not be parsed ({e}); left unchanged"));
            return Ok(());
        }
    };

    if target < TargetVersion::V17 || jsx_setting(&value) != Some("react") {
        return Ok(());
    }

    // The first textual match may sit in a comment or another object; only a
    // replacement that changes the parsed setting is accepted.
    let setting = Regex::new(r#"("jsx"\s*:\s*)"react""#)?;
    let updated = setting
        .captures_iter(&content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let candidate = format!(
                "{}{}\"react-jsx\"{}",
                &content[..whole.start()],
                &caps[1],
                &content[whole.end()..]
            );
            let (parsed, _) = json::parse_lenient(&candidate).ok()?;
            (jsx_setting(&parsed) == Some("react-jsx")).then_some(candidate)
        })
        .next();
    let Some(updated) = updated else {
        report.issue(format!(
            "{name}: set compilerOptions.jsx to \"react-jsx\" for the automatic JSX runtime"
        ));
        return Ok(());
    };

    let path = project_root.join(&name);
    if txn.stage(path.clone(), content, updated)? {
        let verb = if txn.is_dry_run() { "Would update" } else { "Updated" };
        report.entries.push(LogEntry::fix(format!(
            "{verb} {name}: compilerOptions.jsx \"react\" → \"react-jsx\""
        )));
        report.changed.push(path);
    }
    Ok(())
}

fn jsx_setting(value: &serde_json::Value) -> Option<&str> {
    value
        .get("compilerOptions")
        .and_then(|opts| opts.get("jsx"))
        .and_then(|v| v.as_str())
}

fn check_jest(project_root: &Path, target: TargetVersion, report: &mut ConfigReport) -> Result<()> {
    let enzyme = Regex::new(r"\benzyme\b")?;

    for (name, content) in read_existing(project_root, JEST_FILES, report) {
        if target >= TargetVersion::V18 {
            report.issue(format!(
                "{name}: React {target} tests need jest-environment-jsdom and IS_REACT_ACT_ENVIRONMENT; review the test environment"
            ));
        }
        if enzyme.is_match(&content) {
            report.issue(format!(
                "{name}: enzyme has no official adapter for React {target}; consider @testing-library/react"
            ));
        }
    }
    Ok(())
}

fn check_eslint(project_root: &Path, target: TargetVersion, report: &mut ConfigReport) {
    if target < TargetVersion::V17 {
        return;
    }
    for (name, content) in read_existing(project_root, ESLINT_FILES, report) {
        if content.contains("react/react-in-jsx-scope") || content.contains("jsx-runtime") {
            continue;
        }
        report.issue(format!(
            "{name}: turn off react/react-in-jsx-scope (or extend plugin:react/jsx-runtime) for the automatic JSX runtime"
        ));
    }
}

fn check_babel(project_root: &Path, target: TargetVersion, report: &mut ConfigReport) {
    if target < TargetVersion::V17 {
        return;
    }
    for (name, content) in read_existing(project_root, BABEL_FILES, report) {
        if content.contains("@babel/preset-react") && !content.contains("automatic") {
            report.issue(format!(
                "{name}: configure @babel/preset-react with runtime: 'automatic'"
            ));
        }
    }
}

fn check_bundlers(
    project_root: &Path,
    target: TargetVersion,
    report: &mut ConfigReport,
) -> Result<()> {
    let provide_react = Regex::new(r"ProvidePlugin\s*\(\s*\{[^}]*\bReact\b")?;

    if target >= TargetVersion::V17 {
        for (name, content) in read_existing(project_root, WEBPACK_FILES, report) {
            if provide_react.is_match(&content) {
                report.issue(format!(
                    "{name}: ProvidePlugin injects React globally; the automatic JSX runtime no longer needs it"
                ));
            }
        }
    }

    if target >= TargetVersion::V19 {
        for (name, _) in read_existing(project_root, VITE_FILES, report) {
            report.issue(format!(
                "{name}: confirm @vitejs/plugin-react is at least 4.3 for React {target}"
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run(root: &Path, target: TargetVersion, dry_run: bool) -> (ConfigReport, Transaction) {
        let mut txn = Transaction::new(dry_run);
        let report = check_configuration(root, target, &mut txn).unwrap();
        (report, txn)
    }

    fn issues(report: &ConfigReport) -> Vec<&str> {
        report
            .entries
            .iter()
            .filter(|e| !e.is_fix())
            .map(LogEntry::message)
            .collect()
    }

    #[test]
    fn test_empty_project_has_no_entries() {
        let temp = TempDir::new().unwrap();
        let (report, txn) = run(temp.path(), TargetVersion::V19, false);
        assert!(report.entries.is_empty());
        assert!(txn.is_empty());
    }

    #[test]
    fn test_tsconfig_jsx_is_updated_keeping_comments() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(TSCONFIG_FILE);
        fs::write(
            &path,
            "{\n  // app\n  \"compilerOptions\": {\n    \"jsx\": \"react\",\n    \"strict\": true,\n  },\n}\n",
        )
        .unwrap();

        let (report, mut txn) = run(temp.path(), TargetVersion::V18, false);
        assert_eq!(report.changed, vec![path.clone()]);
        assert_eq!(
            report.entries,
            vec![LogEntry::fix(
                "Updated tsconfig.json: compilerOptions.jsx \"react\" → \"react-jsx\""
            )]
        );

        txn.commit().unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\n  // app\n  \"compilerOptions\": {\n    \"jsx\": \"react-jsx\",\n    \"strict\": true,\n  },\n}\n"
        );
    }

    #[test]
    fn test_tsconfig_commented_setting_is_not_the_one_rewritten() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(TSCONFIG_FILE);
        fs::write(
            &path,
            "{\"compilerOptions\": { // \"jsx\": \"react\",\n \"jsx\": \"react\" }}",
        )
        .unwrap();

        let (report, mut txn) = run(temp.path(), TargetVersion::V18, false);
        assert_eq!(report.changed, vec![path.clone()]);
        txn.commit().unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\"compilerOptions\": { // \"jsx\": \"react\",\n \"jsx\": \"react-jsx\" }}"
        );
    }

    #[test]
    fn test_tsconfig_setting_in_other_object_is_skipped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(TSCONFIG_FILE);
        let content = "{\n  \"ts-node\": { \"jsx\": \"react\" },\n  \"compilerOptions\": { \"jsx\" : \"react\" /* classic */ }\n}\n";
        fs::write(&path, content).unwrap();

        let (report, mut txn) = run(temp.path(), TargetVersion::V18, false);
        assert_eq!(report.entries.len(), 1);
        assert!(report.entries[0].is_fix());
        txn.commit().unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"ts-node\": { \"jsx\": \"react\" }"));
        assert!(written.contains("\"jsx\" : \"react-jsx\" /* classic */"));
    }

    #[test]
    fn test_tsconfig_dry_run_says_would() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(TSCONFIG_FILE);
        let original = r#"{"compilerOptions": {"jsx": "react"}}"#;
        fs::write(&path, original).unwrap();

        let (report, mut txn) = run(temp.path(), TargetVersion::V17, true);
        assert!(report.entries[0].message().starts_with("Would update tsconfig.json"));
        txn.commit().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_tsconfig_already_automatic_is_untouched() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(TSCONFIG_FILE),
            r#"{"compilerOptions": {"jsx": "react-jsx"}}"#,
        )
        .unwrap();

        let (report, txn) = run(temp.path(), TargetVersion::V19, false);
        assert!(report.entries.is_empty());
        assert!(txn.is_empty());
    }

    #[test]
    fn test_unparseable_tsconfig_becomes_issue() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(TSCONFIG_FILE);
        fs::write(&path, "{ compilerOptions: { jsx: react").unwrap();

        let (report, txn) = run(temp.path(), TargetVersion::V18, false);
        let issues = issues(&report);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].starts_with("tsconfig.json: could not be parsed"));
        assert!(txn.is_empty());
    }

    #[test]
    fn test_jest_checks() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("jest.config.js"),
            "module.exports = { setupFiles: ['./enzyme-setup.js'], testEnvironment: 'jsdom' };\n",
        )
        .unwrap();

        let (report17, _) = run(temp.path(), TargetVersion::V17, false);
        assert_eq!(issues(&report17).len(), 1);
        assert!(issues(&report17)[0].contains("enzyme"));

        let (report18, _) = run(temp.path(), TargetVersion::V18, false);
        let found = issues(&report18);
        assert_eq!(found.len(), 2);
        assert!(found[0].contains("IS_REACT_ACT_ENVIRONMENT"));
    }

    #[test]
    fn test_eslint_override_suppresses_issue() {
        let temp = TempDir::new().unwrap();
        let rc = temp.path().join(".eslintrc.json");

        fs::write(&rc, r#"{"extends": ["plugin:react/recommended"]}"#).unwrap();
        let (report, _) = run(temp.path(), TargetVersion::V17, false);
        assert_eq!(issues(&report).len(), 1);

        fs::write(
            &rc,
            r#"{"rules": {"react/react-in-jsx-scope": "off"}}"#,
        )
        .unwrap();
        let (report, _) = run(temp.path(), TargetVersion::V17, false);
        assert!(issues(&report).is_empty());
    }

    #[test]
    fn test_babel_classic_runtime() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".babelrc"),
            r#"{"presets": ["@babel/preset-env", "@babel/preset-react"]}"#,
        )
        .unwrap();
        fs::write(
            temp.path().join("babel.config.json"),
            r#"{"presets": [["@babel/preset-react", {"runtime": "automatic"}]]}"#,
        )
        .unwrap();

        let (report, _) = run(temp.path(), TargetVersion::V18, false);
        let found = issues(&report);
        assert_eq!(found.len(), 1);
        assert!(found[0].starts_with(".babelrc:"));
    }

    #[test]
    fn test_bundler_checks() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("webpack.config.js"),
            "new webpack.ProvidePlugin({\n  React: 'react',\n});\n",
        )
        .unwrap();
        fs::write(
            temp.path().join("vite.config.ts"),
            "export default defineConfig({ plugins: [react()] });\n",
        )
        .unwrap();

        let (report18, _) = run(temp.path(), TargetVersion::V18, false);
        let found = issues(&report18);
        assert_eq!(found.len(), 1);
        assert!(found[0].starts_with("webpack.config.js:"));

        let (report19, _) = run(temp.path(), TargetVersion::V19, false);
        assert_eq!(issues(&report19).len(), 2);
    }
}

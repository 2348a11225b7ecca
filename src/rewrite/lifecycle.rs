//! Renames deprecated `componentWill*` lifecycle methods.

use crate::error::Result;
use crate::report::LogEntry;
use crate::rewrite::{Rewrite, RewriteRule};
use regex::Regex;

/// One deprecated method and the text it is replaced with.
struct Replacement {
    pattern: Regex,
    from: &'static str,
    to: &'static str,
    replacement: &'static str,
}

pub struct LifecycleRule {
    replacements: Vec<Replacement>,
}

impl LifecycleRule {
    pub fn new() -> Result<Self> {
        let replacements = vec![
            Replacement {
                pattern: Regex::new(r"\bcomponentWillMount\b")?,
                from: "componentWillMount",
                to: "componentDidMount",
                replacement: "componentDidMount",
            },
            // Whatever the parameter list was, the new method receives the
            // previous props.
            Replacement {
                pattern: Regex::new(r"\bcomponentWillReceiveProps\s*\([^)]*\)")?,
                from: "componentWillReceiveProps",
                to: "componentDidUpdate",
                replacement: "componentDidUpdate(prevProps)",
            },
            Replacement {
                pattern: Regex::new(r"\bcomponentWillUpdate\b")?,
                from: "componentWillUpdate",
                to: "componentDidUpdate",
                replacement: "componentDidUpdate",
            },
        ];
        Ok(Self { replacements })
    }
}

impl RewriteRule for LifecycleRule {
    fn name(&self) -> &'static str {
        "lifecycle"
    }

    fn detect(&self, content: &str) -> bool {
        self.replacements.iter().any(|r| r.pattern.is_match(content))
    }

    fn apply(&self, content: &str, file: &str) -> Rewrite {
        let mut result = content.to_string();
        let mut entries = Vec::new();

        for r in &self.replacements {
            if r.pattern.is_match(&result) {
                result = r.pattern.replace_all(&result, r.replacement).into_owned();
                entries.push(LogEntry::fix(format!(
                    "Replaced {} with {} in {}",
                    r.from, r.to, file
                )));
            }
        }

        Rewrite {
            content: result,
            entries,
        }
    }
}

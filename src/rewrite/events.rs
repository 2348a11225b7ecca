//! Advisory for code typed against `SyntheticEvent`.
//!
//! React 17 removed event pooling and moved listeners to the root container;
//! handlers that relied on either need a human look. Content is never changed.

use crate::error::Result;
use crate::report::LogEntry;
use crate::rewrite::{Rewrite, RewriteRule};
use regex::Regex;

pub struct SyntheticEventRule {
    pattern: Regex,
}

impl SyntheticEventRule {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(r"\bSyntheticEvent\b")?,
        })
    }
}

impl RewriteRule for SyntheticEventRule {
    fn name(&self) -> &'static str {
        "synthetic-event"
    }

    fn detect(&self, content: &str) -> bool {
        self.pattern.is_match(content)
    }

    fn apply(&self, content: &str, file: &str) -> Rewrite {
        Rewrite {
            content: content.to_string(),
            entries: vec![LogEntry::issue(format!(
                "{file}: uses SyntheticEvent; review handlers for event pooling (removed) and root-level delegation"
            ))],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_without_content_change() {
        let rule = SyntheticEventRule::new().unwrap();
        let src = "function onClick(e: React.SyntheticEvent) { e.persist(); }";

        assert!(rule.detect(src));
        let out = rule.apply(src, "src/Button.tsx");
        assert_eq!(out.content, src);
        assert_eq!(out.issues().count(), 1);
        assert!(out.issues().all(|i| i.starts_with("src/Button.tsx")));
    }

    #[test]
    fn test_no_match_on_other_event_types() {
        let rule = SyntheticEventRule::new().unwrap();
        assert!(!rule.detect("function f(e: React.MouseEvent) {}"));
    }
}

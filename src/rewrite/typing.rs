//! Advisory for `React.FC` / `FunctionComponent` typed components.
//!
//! Since `@types/react` 18 these no longer include an implicit `children`
//! prop, so components relying on it need explicit prop types.

use crate::error::Result;
use crate::report::LogEntry;
use crate::rewrite::{Rewrite, RewriteRule};
use regex::Regex;

pub struct FunctionComponentTypeRule {
    pattern: Regex,
}

impl FunctionComponentTypeRule {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(
                r"\bReact\.(?:FC|FunctionComponent)\b|\b(?:FC|FunctionComponent)\s*<",
            )?,
        })
    }
}

impl RewriteRule for FunctionComponentTypeRule {
    fn name(&self) -> &'static str {
        "function-component-type"
    }

    fn detect(&self, content: &str) -> bool {
        self.pattern.is_match(content)
    }

    fn apply(&self, content: &str, file: &str) -> Rewrite {
        Rewrite {
            content: content.to_string(),
            entries: vec![LogEntry::issue(format!(
                "{file}: React.FC / FunctionComponent no longer adds `children`; declare prop types explicitly"
            ))],
        }
    }
}

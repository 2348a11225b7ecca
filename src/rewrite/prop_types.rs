//! `React.PropTypes` → the standalone `prop-types` package.

use crate::error::Result;
use crate::report::LogEntry;
use crate::rewrite::{Rewrite, RewriteRule, framework_import_pattern, insert_after_framework_import};
use regex::Regex;

const PROP_TYPES_IMPORT: &str = "import PropTypes from 'prop-types';";

pub struct PropTypesRule {
    usage: Regex,
    existing_import: Regex,
    framework_import: Regex,
}

impl PropTypesRule {
    pub fn new() -> Result<Self> {
        Ok(Self {
            usage: Regex::new(r"\bReact\.PropTypes\b")?,
            existing_import: Regex::new(
                r#"import\s+PropTypes\b[^;\n]*\bfrom\s+['"]prop-types['"]"#,
            )?,
            framework_import: framework_import_pattern()?,
        })
    }
}

impl RewriteRule for PropTypesRule {
    fn name(&self) -> &'static str {
        "prop-types"
    }

    fn detect(&self, content: &str) -> bool {
        self.usage.is_match(content)
    }

    fn apply(&self, content: &str, file: &str) -> Rewrite {
        let mut result = content.to_string();
        if !self.existing_import.is_match(&result) {
            result =
                insert_after_framework_import(&self.framework_import, &result, PROP_TYPES_IMPORT);
        }
        result = self.usage.replace_all(&result, "PropTypes").into_owned();

        Rewrite {
            content: result,
            entries: vec![LogEntry::fix(format!(
                "Migrated React.PropTypes to the prop-types package in {file}"
            ))],
        }
    }
}

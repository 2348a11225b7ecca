//! Source rewriting for React upgrades.
//!
//! Each [`RewriteRule`] is an independent textual transformation over one
//! file's content. A [`Pipeline`] runs its rules in a fixed order, each on the
//! output of the previous one.
//!
//! ## Approach
//!
//! Uses regex and a small delimiter scanner instead of a JavaScript parser to:
//! - Preserve formatting, comments, and whitespace exactly
//! - Leave code alone when a pattern is ambiguous (a missed match is logged at
//!   debug level; a broken rewrite would not be)
//!
//! ## Rule order
//!
//! 1. [`render_root`]: `ReactDOM.render` → `createRoot` (React 18+)
//! 2. [`lifecycle`]: deprecated `componentWill*` methods
//! 3. [`events`]: `SyntheticEvent` advisory
//! 4. [`prop_types`]: `React.PropTypes` → `prop-types`
//! 5. [`typing`]: `React.FC` advisory
//! 6. [`class_component`]: class → function component (opt-in)

pub mod class_component;
pub mod events;
pub mod lifecycle;
pub mod markup;
pub mod prop_types;
pub mod render_root;
pub mod typing;

use crate::error::Result;
use crate::report::LogEntry;
use crate::version::TargetVersion;
use regex::Regex;

/// Result of running one rule (or the whole pipeline) over a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub content: String,
    pub entries: Vec<LogEntry>,
}

impl Rewrite {
    pub fn unchanged(content: &str) -> Self {
        Self {
            content: content.to_string(),
            entries: Vec::new(),
        }
    }

    pub fn fixes(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.is_fix())
            .map(LogEntry::message)
    }

    pub fn issues(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| !e.is_fix())
            .map(LogEntry::message)
    }
}

/// A single textual migration step.
pub trait RewriteRule {
    /// Short identifier used in debug logs.
    fn name(&self) -> &'static str;

    /// Returns `true` if the rule has anything to do for `content`.
    fn detect(&self, content: &str) -> bool;

    /// Transforms `content`; `file` names the source in log entries.
    fn apply(&self, content: &str, file: &str) -> Rewrite;
}

/// Options that change which rules run.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Enables class → function component conversion.
    pub convert_classes: bool,
    /// Restricts class conversion to one component name.
    pub component_filter: Option<String>,
}

/// Ordered rule list for one target version.
pub struct Pipeline {
    rules: Vec<Box<dyn RewriteRule>>,
}

impl Pipeline {
    pub fn new(target: TargetVersion, options: &PipelineOptions) -> Result<Self> {
        let mut rules: Vec<Box<dyn RewriteRule>> = Vec::new();

        if target >= TargetVersion::V18 {
            rules.push(Box::new(render_root::RenderRootRule::new()?));
        }
        rules.push(Box::new(lifecycle::LifecycleRule::new()?));
        rules.push(Box::new(events::SyntheticEventRule::new()?));
        rules.push(Box::new(prop_types::PropTypesRule::new()?));
        rules.push(Box::new(typing::FunctionComponentTypeRule::new()?));

        if options.convert_classes || options.component_filter.is_some() {
            rules.push(Box::new(class_component::ClassComponentRule::new(
                options.component_filter.clone(),
            )?));
        }

        Ok(Self { rules })
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Runs every rule in order over `content`.
    pub fn transform(&self, content: &str, file: &str) -> Rewrite {
        let mut current = Rewrite::unchanged(content);

        for rule in &self.rules {
            if !rule.detect(&current.content) {
                continue;
            }
            let step = rule.apply(&current.content, file);
            log::debug!(
                "{}: rule '{}' produced {} entr{}",
                file,
                rule.name(),
                step.entries.len(),
                if step.entries.len() == 1 { "y" } else { "ies" }
            );
            current.content = step.content;
            current.entries.extend(step.entries);
        }

        current
    }
}

/// Runs the default pipeline (no class conversion) for `target`.
pub fn transform_file(content: &str, target: TargetVersion, file: &str) -> Result<Rewrite> {
    Ok(Pipeline::new(target, &PipelineOptions::default())?.transform(content, file))
}

/// Matches a whole `import ... from 'react'` statement, through end of line.
pub(crate) fn framework_import_pattern() -> Result<Regex> {
    Ok(Regex::new(
        r#"(?m)^import\s[^;]*?\bfrom\s+['"]react['"];?[^\n]*\n?"#,
    )?)
}

/// Inserts `statement` on the line after the first `import ... from 'react'`.
///
/// Falls back to the top of the file when there is no such import.
pub(crate) fn insert_after_framework_import(
    import: &Regex,
    content: &str,
    statement: &str,
) -> String {
    match import.find(content) {
        Some(m) => {
            let (head, tail) = content.split_at(m.end());
            if head.ends_with('\n') {
                format!("{head}{statement}\n{tail}")
            } else {
                format!("{head}\n{statement}{tail}")
            }
        }
        None => format!("{statement}\n{content}"),
    }
}

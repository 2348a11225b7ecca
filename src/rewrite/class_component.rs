//! Class component → function component conversion.
//!
//! A syntactic, best-effort rewrite for simple classes:
//!
//! ```jsx
//! class Counter extends React.Component {
//!   state = { count: 0 };
//!   increment = () => {
//!     this.setState({ count: this.state.count + 1 });
//!   };
//!   render() {
//!     return <button onClick={this.increment}>{this.props.label}</button>;
//!   }
//! }
//! ```
//! becomes
//! ```jsx
//! const Counter = (props) => {
//!   const [state, setState] = useState({ count: 0 });
//!
//!   const increment = () => {
//!     setState({ count: state.count + 1 });
//!   };
//!
//!   return <button onClick={increment}>{props.label}</button>;
//! };
//! ```
//!
//! Classes with lifecycle methods, getters, instance fields or anything else
//! that has no mechanical hook equivalent are left alone and reported.

use crate::error::Result;
use crate::report::LogEntry;
use crate::rewrite::markup::{line_start, matching_close, reindent, skip_trivia, statement_end};
use crate::rewrite::{Rewrite, RewriteRule, framework_import_pattern, insert_after_framework_import};
use regex::{Captures, Regex};
use std::collections::HashSet;
use thiserror::Error;

const HOOK_IMPORT: &str = "import { useState } from 'react';";

/// Methods with no direct function-component equivalent.
const LIFECYCLE_METHODS: &[&str] = &[
    "componentDidMount",
    "componentDidUpdate",
    "componentWillUnmount",
    "componentDidCatch",
    "shouldComponentUpdate",
    "getSnapshotBeforeUpdate",
    "componentWillMount",
    "componentWillReceiveProps",
    "componentWillUpdate",
    "UNSAFE_componentWillMount",
    "UNSAFE_componentWillReceiveProps",
    "UNSAFE_componentWillUpdate",
];

pub struct ClassComponentRule {
    filter: Option<String>,
    class_decl: Regex,
    method_head: Regex,
    field_head: Regex,
    arrow_value: Regex,
    state_assign: Regex,
    super_call: Regex,
    bind_stmt: Regex,
    this_set_state: Regex,
    this_state: Regex,
    this_props: Regex,
    this_member: Regex,
    bind_this: Regex,
    any_this: Regex,
    use_state: Regex,
    framework_import: Regex,
}

/// Pieces of a class body, in source order.
#[derive(Debug)]
enum Member {
    /// `state = {...}` field or `this.state = {...}` in the constructor,
    /// already prefixed with its original indentation.
    State(String),
    /// A method or arrow field, re-emitted as a `const` arrow function.
    Function { name: String, text: String },
    /// `static name = value`.
    Static { name: String, value: String },
    /// Inner text of `render() { ... }`.
    Render(String),
}

/// Why a class was left as a class.
#[derive(Debug, Error)]
enum NotConverted {
    #[error("instance field `{0}`")]
    InstanceField(String),

    #[error("unrecognized member `{0}`")]
    UnrecognizedMember(String),

    #[error("`{name}` {part}")]
    Malformed { name: String, part: &'static str },

    #[error("uses lifecycle method `{0}`")]
    Lifecycle(String),

    #[error("unbalanced state initializer")]
    StateInitializer,

    #[error("constructor does more than initialize state")]
    Constructor,

    #[error("no render method")]
    NoRender,

    #[error("still references `this` after conversion")]
    ThisRemains,
}

impl NotConverted {
    fn malformed(name: &str, part: &'static str) -> Self {
        Self::Malformed {
            name: name.to_string(),
            part,
        }
    }
}

/// A class that was recognized and converted.
struct Conversion {
    name: String,
    text: String,
    uses_state: bool,
    uses_set_state: bool,
}

impl ClassComponentRule {
    pub fn new(filter: Option<String>) -> Result<Self> {
        Ok(Self {
            filter,
            class_decl: Regex::new(
                r"(?m)^([ \t]*)(export\s+default\s+|export\s+)?class\s+([A-Za-z_$][\w$]*)\s+extends\s+(?:React\.)?(?:Pure)?Component\b(?:\s*<([^>{]*)>)?\s*\{",
            )?,
            method_head: Regex::new(r"^(async\s+)?([A-Za-z_$][\w$]*)\s*\(")?,
            field_head: Regex::new(r"^(static\s+)?([A-Za-z_$][\w$]*)\s*=\s*")?,
            arrow_value: Regex::new(r"^(?:async\s+)?(?:\([^)]*\)|[A-Za-z_$][\w$]*)\s*=>")?,
            state_assign: Regex::new(r"\bthis\.state\s*=\s*")?,
            super_call: Regex::new(r"\bsuper\s*\([^)]*\)\s*;?")?,
            bind_stmt: Regex::new(
                r"\bthis\.[A-Za-z_$][\w$]*\s*=\s*this\.[A-Za-z_$][\w$]*\.bind\(\s*this\s*\)\s*;?",
            )?,
            this_set_state: Regex::new(r"\bthis\.setState\b")?,
            this_state: Regex::new(r"\bthis\.state\b")?,
            this_props: Regex::new(r"\bthis\.props\b")?,
            this_member: Regex::new(r"\bthis\.([A-Za-z_$][\w$]*)")?,
            bind_this: Regex::new(r"\.bind\(\s*this\s*\)")?,
            any_this: Regex::new(r"\bthis\b")?,
            use_state: Regex::new(r"\buseState\b")?,
            framework_import: framework_import_pattern()?,
        })
    }

    /// Splits the class body between `open` and `close` into members.
    fn parse_members(
        &self,
        content: &str,
        open: usize,
        close: usize,
    ) -> std::result::Result<Vec<Member>, NotConverted> {
        let mut members = Vec::new();
        let mut i = open + 1;

        loop {
            i = skip_trivia(content, i);
            if i >= close {
                break;
            }
            if content.as_bytes()[i] == b';' {
                i += 1;
                continue;
            }

            let indent = indent_at(content, i);
            let rest = &content[i..close];

            if let Some(caps) = self.field_head.captures(rest) {
                let is_static = caps.get(1).is_some();
                let name = caps[2].to_string();
                let value_start = i + caps[0].len();
                let end = statement_end(content, value_start, close);
                let value = content[value_start..end].trim().to_string();
                i = end;

                if is_static {
                    members.push(Member::Static { name, value });
                } else if name == "state" {
                    members.push(Member::State(format!(
                        "{indent}const [state, setState] = useState({value});"
                    )));
                } else if self.arrow_value.is_match(&value) {
                    members.push(Member::Function {
                        text: format!("{indent}const {name} = {value};"),
                        name,
                    });
                } else {
                    return Err(NotConverted::InstanceField(name));
                }
                continue;
            }

            let Some(caps) = self.method_head.captures(rest) else {
                let snippet: String = rest.chars().take(24).collect();
                return Err(NotConverted::UnrecognizedMember(snippet.trim().to_string()));
            };
            let is_async = caps.get(1).is_some();
            let name = caps[2].to_string();
            let params_open = i + caps[0].len() - 1;
            let params_close = matching_close(content, params_open)
                .ok_or_else(|| NotConverted::malformed(&name, "parameters"))?;
            let body_open = params_close
                + 1
                + content[params_close + 1..close]
                    .find('{')
                    .ok_or_else(|| NotConverted::malformed(&name, "body"))?;
            let between = content[params_close + 1..body_open].trim();
            if !(between.is_empty() || between.starts_with(':')) {
                return Err(NotConverted::malformed(&name, "signature"));
            }
            let body_close = matching_close(content, body_open)
                .ok_or_else(|| NotConverted::malformed(&name, "body"))?;
            i = body_close + 1;

            if LIFECYCLE_METHODS.contains(&name.as_str()) {
                return Err(NotConverted::Lifecycle(name));
            }

            match name.as_str() {
                "constructor" => {
                    if let Some(state) = self.constructor_state(content, body_open, body_close)? {
                        members.push(Member::State(state));
                    }
                }
                "render" => members.push(Member::Render(
                    content[body_open + 1..body_close].to_string(),
                )),
                _ => {
                    let params = &content[params_open + 1..params_close];
                    let body = &content[body_open..=body_close];
                    let prefix = if is_async { "async " } else { "" };
                    members.push(Member::Function {
                        text: format!("{indent}const {name} = {prefix}({params}) => {body};"),
                        name,
                    });
                }
            }
        }

        Ok(members)
    }

    /// Extracts `this.state = {...}` from a constructor.
    ///
    /// Only `super(...)`, `this.x = this.x.bind(this)` and the state
    /// initializer are allowed; anything else rejects the class.
    fn constructor_state(
        &self,
        content: &str,
        open: usize,
        close: usize,
    ) -> std::result::Result<Option<String>, NotConverted> {
        let body = &content[open + 1..close];
        let mut remainder = body.to_string();
        let mut state = None;

        if let Some(m) = self.state_assign.find(body) {
            let value_start = open + 1 + m.end();
            let value_end = if content.as_bytes().get(value_start) == Some(&b'{') {
                matching_close(content, value_start).ok_or(NotConverted::StateInitializer)? + 1
            } else {
                statement_end(content, value_start, close)
            };
            let value = &content[value_start..value_end];
            let indent = indent_at(content, open + 1 + m.start());
            state = Some(format!("{indent}const [state, setState] = useState({value});"));

            let stmt_end = if content.as_bytes().get(value_end) == Some(&b';') {
                value_end + 1
            } else {
                value_end
            };
            remainder = format!(
                "{}{}",
                &content[open + 1..open + 1 + m.start()],
                &content[stmt_end..close]
            );
        }

        let remainder = self.super_call.replace_all(&remainder, "");
        let remainder = self.bind_stmt.replace_all(&remainder, "");
        let leftover = remainder.trim();
        if !leftover.is_empty() && skip_trivia(leftover, 0) < leftover.len() {
            return Err(NotConverted::Constructor);
        }
        Ok(state)
    }

    /// Converts one class; `caps` is the declaration match.
    fn convert(
        &self,
        content: &str,
        caps: &Captures<'_>,
        body_open: usize,
        body_close: usize,
    ) -> std::result::Result<Conversion, NotConverted> {
        let indent = caps.get(1).map_or("", |m| m.as_str());
        let export = caps.get(2).map_or("", |m| m.as_str());
        let name = caps[3].to_string();
        let props_type = caps
            .get(4)
            .and_then(|m| m.as_str().split(',').next())
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let members = self.parse_members(content, body_open, body_close)?;

        let inner = format!("{indent}  ");
        let mut sections = Vec::new();
        let mut statics = Vec::new();
        let mut functions = HashSet::new();
        let mut render = None;
        let mut has_state = false;

        for member in members {
            match member {
                Member::State(text) => {
                    has_state = true;
                    sections.push(reindent(&text, &inner));
                }
                Member::Function { name, text } => {
                    functions.insert(name);
                    sections.push(reindent(&text, &inner));
                }
                Member::Static { name: key, value } => {
                    statics.push(format!("{indent}{name}.{key} = {value};"));
                }
                Member::Render(body) => render = Some(reindent(&body, &inner)),
            }
        }
        let render = render.ok_or(NotConverted::NoRender)?;
        sections.push(render);

        let body = sections.join("\n\n");
        let body = self.this_set_state.replace_all(&body, "setState");
        let body = self.this_state.replace_all(&body, "state");
        let body = self.this_props.replace_all(&body, "props");
        let body = self.bind_this.replace_all(&body, "");
        let body = self
            .this_member
            .replace_all(&body, |c: &Captures<'_>| {
                if functions.contains(&c[1]) {
                    c[1].to_string()
                } else {
                    c[0].to_string()
                }
            })
            .into_owned();
        if self.any_this.is_match(&body) {
            return Err(NotConverted::ThisRemains);
        }

        let uses_set_state = body.contains("setState(");
        let mut body = body;
        if uses_set_state && !has_state {
            body = format!("{inner}const [state, setState] = useState({{}});\n\n{body}");
        }
        let uses_state = has_state || uses_set_state;

        let param = match props_type {
            Some(t) => format!("props: {t}"),
            None => "props".to_string(),
        };
        let keyword = if export.trim() == "export" { "export " } else { "" };

        let mut text =
            format!("{indent}{keyword}const {name} = ({param}) => {{\n{body}\n{indent}}};");
        for stmt in statics {
            text.push('\n');
            text.push_str(&stmt);
        }
        if export.contains("default") {
            text.push_str(&format!("\n\n{indent}export default {name};"));
        }

        Ok(Conversion {
            name,
            text,
            uses_state,
            uses_set_state,
        })
    }
}

/// Leading whitespace of the line containing `at`, if only whitespace precedes it.
fn indent_at(content: &str, at: usize) -> &str {
    let pre = &content[line_start(content, at)..at];
    if pre.trim().is_empty() { pre } else { "" }
}

impl RewriteRule for ClassComponentRule {
    fn name(&self) -> &'static str {
        "class-component"
    }

    fn detect(&self, content: &str) -> bool {
        self.class_decl.is_match(content)
    }

    fn apply(&self, content: &str, file: &str) -> Rewrite {
        let mut out = String::with_capacity(content.len());
        let mut entries = Vec::new();
        let mut converted = Vec::new();
        let mut needs_hook = false;
        let mut cursor = 0;

        for caps in self.class_decl.captures_iter(content) {
            let Some(whole) = caps.get(0) else { continue };
            if whole.start() < cursor {
                continue;
            }
            let name = &caps[3];
            if self.filter.as_deref().is_some_and(|f| f != name) {
                continue;
            }

            let body_open = whole.end() - 1;
            let Some(body_close) = matching_close(content, body_open) else {
                log::debug!("{}: unbalanced body for class {}", file, name);
                continue;
            };

            match self.convert(content, &caps, body_open, body_close) {
                Ok(conversion) => {
                    out.push_str(&content[cursor..whole.start()]);
                    out.push_str(&conversion.text);
                    cursor = body_close + 1;
                    if content[cursor..].starts_with(';') {
                        cursor += 1;
                    }

                    needs_hook |= conversion.uses_state;
                    if conversion.uses_set_state {
                        entries.push(LogEntry::issue(format!(
                            "{file}: review setState calls in {}; the useState setter replaces state instead of merging it",
                            conversion.name
                        )));
                    }
                    converted.push(conversion.name);
                }
                Err(reason) => {
                    entries.push(LogEntry::issue(format!(
                        "{file}: class {name} not converted to a function component ({reason})"
                    )));
                }
            }
        }

        if converted.is_empty() {
            return Rewrite {
                content: content.to_string(),
                entries,
            };
        }
        out.push_str(&content[cursor..]);

        if needs_hook && !self.use_state.is_match(content) {
            out = insert_after_framework_import(&self.framework_import, &out, HOOK_IMPORT);
        }

        entries.insert(
            0,
            LogEntry::fix(format!(
                "Converted class component{} {} to function component{} in {file}",
                if converted.len() == 1 { "" } else { "s" },
                converted.join(", "),
                if converted.len() == 1 { "" } else { "s" },
            )),
        );

        Rewrite {
            content: out,
            entries,
        }
    }
}

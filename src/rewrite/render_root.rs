//! `ReactDOM.render(<App />, container)` → `createRoot(container).render(...)`.
//!
//! ```js
//! import ReactDOM from 'react-dom';
//! ReactDOM.render(<App />, document.getElementById('root'));
//! ```
//! becomes
//! ```js
//! import { createRoot } from 'react-dom/client';
//! const root = createRoot(document.getElementById('root'));
//! root.render(<App />);
//! ```
//!
//! Calls whose first argument is not a complete JSX element, that pass a
//! callback, or whose return value is used are left untouched (logged at
//! debug level only).

use crate::error::Result;
use crate::report::LogEntry;
use crate::rewrite::markup::{close_from, element_end, has_top_level, line_start};
use crate::rewrite::{Rewrite, RewriteRule};
use regex::{Match, Regex};

pub struct RenderRootRule {
    call: Regex,
    import: Regex,
    usage: Regex,
}

/// A recognized render call.
struct RenderCall<'a> {
    indent: &'a str,
    element: &'a str,
    container: &'a str,
    /// End of the statement, past any `;`.
    end: usize,
}

impl RenderRootRule {
    pub fn new() -> Result<Self> {
        Ok(Self {
            call: Regex::new(r"\bReactDOM\.render\s*\(\s*<")?,
            import: Regex::new(
                r#"import\s+(?:\*\s+as\s+)?ReactDOM\s+from\s+(['"])react-dom['"](;?)"#,
            )?,
            usage: Regex::new(r"\bReactDOM\b")?,
        })
    }

    fn parse_call<'a>(&self, content: &'a str, m: Match<'_>) -> Option<RenderCall<'a>> {
        let start = line_start(content, m.start());
        let indent = &content[start..m.start()];
        if !indent.trim().is_empty() {
            return None;
        }

        let element_start = m.end() - 1;
        let element_stop = element_end(content, element_start)?;

        let after = &content[element_stop..];
        let comma = element_stop + (after.len() - after.trim_start().len());
        if content.as_bytes().get(comma) != Some(&b',') {
            return None;
        }

        let close = close_from(content, comma + 1, b'(', b')')?;
        let container = content[comma + 1..close].trim();
        if container.is_empty() || has_top_level(container, b',') {
            return None;
        }

        let mut end = close + 1;
        if content[end..].starts_with(';') {
            end += 1;
        }

        Some(RenderCall {
            indent,
            element: &content[element_start..element_stop],
            container,
            end,
        })
    }

    /// Swaps the renderer import for the `react-dom/client` one.
    ///
    /// When `ReactDOM` is still referenced elsewhere the old import is kept
    /// and the new one added below it.
    fn rewrite_import(&self, content: &str) -> Option<String> {
        let caps = self.import.captures(content)?;
        let whole = caps.get(0)?;
        let quote = &caps[1];
        let semi = &caps[2];
        let replacement =
            format!("import {{ createRoot }} from {quote}react-dom/client{quote}{semi}");

        let rest = format!("{}{}", &content[..whole.start()], &content[whole.end()..]);
        if self.usage.is_match(&rest) {
            Some(format!(
                "{}\n{}{}",
                &content[..whole.end()],
                replacement,
                &content[whole.end()..]
            ))
        } else {
            Some(format!(
                "{}{}{}",
                &content[..whole.start()],
                replacement,
                &content[whole.end()..]
            ))
        }
    }
}

impl RewriteRule for RenderRootRule {
    fn name(&self) -> &'static str {
        "render-root"
    }

    fn detect(&self, content: &str) -> bool {
        self.call.is_match(content)
    }

    fn apply(&self, content: &str, file: &str) -> Rewrite {
        let mut out = String::with_capacity(content.len() + 64);
        let mut cursor = 0;
        let mut roots = 0;

        for m in self.call.find_iter(content) {
            if m.start() < cursor {
                continue;
            }
            let Some(call) = self.parse_call(content, m) else {
                log::debug!("{}: skipping unrecognized render call at byte {}", file, m.start());
                continue;
            };

            roots += 1;
            let root = if roots == 1 {
                "root".to_string()
            } else {
                format!("root{roots}")
            };

            out.push_str(&content[cursor..m.start()]);
            out.push_str(&format!(
                "const {root} = createRoot({});\n{}{root}.render({});",
                call.container, call.indent, call.element
            ));
            cursor = call.end;
        }

        if roots == 0 {
            return Rewrite::unchanged(content);
        }
        out.push_str(&content[cursor..]);

        let mut entries = Vec::new();
        let content = match self.rewrite_import(&out) {
            Some(updated) => updated,
            None => {
                if !out.contains("react-dom/client") {
                    entries.push(LogEntry::issue(format!(
                        "{file}: add `import {{ createRoot }} from 'react-dom/client'` (renderer import not recognized)"
                    )));
                }
                out
            }
        };

        entries.insert(
            0,
            LogEntry::fix(format!("Migrated ReactDOM.render to createRoot in {file}")),
        );
        Rewrite { content, entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &str) -> Rewrite {
        RenderRootRule::new().unwrap().apply(src, "src/index.js")
    }

    #[test]
    fn test_default_import_and_single_call() {
        let src = "import React from 'react';\nimport ReactDOM from 'react-dom';\nimport App from './App';\n\nReactDOM.render(<App/>, document.getElementById('root'));\n";
        let out = run(src);

        assert_eq!(
            out.content,
            "import React from 'react';\nimport { createRoot } from 'react-dom/client';\nimport App from './App';\n\nconst root = createRoot(document.getElementById('root'));\nroot.render(<App/>);\n"
        );
        assert_eq!(
            out.entries,
            vec![LogEntry::fix("Migrated ReactDOM.render to createRoot in src/index.js")]
        );
    }

    #[test]
    fn test_namespace_import_with_double_quotes() {
        let src = "import * as ReactDOM from \"react-dom\"\nReactDOM.render(<App />, el)\n";
        let out = run(src);

        assert!(out.content.starts_with("import { createRoot } from \"react-dom/client\"\n"));
        assert!(out.content.contains("const root = createRoot(el);\nroot.render(<App />);"));
    }

    #[test]
    fn test_multiline_element_keeps_indentation() {
        let src = "import ReactDOM from 'react-dom';\nif (el) {\n  ReactDOM.render(\n    <Provider store={store}>\n      <App />\n    </Provider>,\n    el\n  );\n}\n";
        let out = run(src);

        assert!(out.content.contains(
            "  const root = createRoot(el);\n  root.render(<Provider store={store}>\n      <App />\n    </Provider>);\n}"
        ));
    }

    #[test]
    fn test_multiple_calls_get_distinct_roots() {
        let src = "import ReactDOM from 'react-dom';\nReactDOM.render(<A />, a);\nReactDOM.render(<B />, b);\n";
        let out = run(src);

        assert!(out.content.contains("const root = createRoot(a);\nroot.render(<A />);"));
        assert!(out.content.contains("const root2 = createRoot(b);\nroot2.render(<B />);"));
        assert_eq!(out.entries.len(), 1);
    }

    #[test]
    fn test_keeps_renderer_import_when_still_used() {
        let src = "import ReactDOM from 'react-dom';\nReactDOM.render(<A />, a);\nReactDOM.createPortal(x, y);\n";
        let out = run(src);

        assert!(out.content.starts_with(
            "import ReactDOM from 'react-dom';\nimport { createRoot } from 'react-dom/client';\n"
        ));
    }

    #[test]
    fn test_callback_argument_is_not_rewritten() {
        let src = "import ReactDOM from 'react-dom';\nReactDOM.render(<A />, el, () => done());\n";
        let out = run(src);

        assert_eq!(out.content, src);
        assert!(out.entries.is_empty());
    }

    #[test]
    fn test_malformed_markup_is_not_rewritten() {
        let src = "ReactDOM.render(<A>, el);\n";
        let out = run(src);
        assert_eq!(out.content, src);
        assert!(out.entries.is_empty());
    }

    #[test]
    fn test_used_return_value_is_not_rewritten() {
        let src = "const inst = ReactDOM.render(<A />, el);\n";
        assert_eq!(run(src).content, src);
    }

    #[test]
    fn test_require_import_reports_issue() {
        let src = "const ReactDOM = require('react-dom');\nReactDOM.render(<A />, el);\n";
        let out = run(src);

        assert!(out.content.contains("root.render(<A />);"));
        assert_eq!(out.fixes().count(), 1);
        assert_eq!(out.issues().count(), 1);
    }
}

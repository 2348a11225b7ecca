//! Delimiter scanning for JavaScript/JSX text.
//!
//! Not a parser: it only knows enough about strings, comments, braces and JSX
//! tags to find where a balanced construct ends. Every function returns `None`
//! when the input does not look the way it expects, and callers treat that as
//! "leave this code alone".
//!
//! All delimiters are ASCII, so byte offsets returned here are always valid
//! `str` slice boundaries.

/// Index just past a string literal opening at `start`.
///
/// Single- and double-quoted strings may not cross a newline; when they do,
/// the quote was most likely an apostrophe in JSX text and `None` is returned.
fn skip_string(b: &[u8], start: usize) -> Option<usize> {
    let quote = b[start];
    let mut i = start + 1;
    while i < b.len() {
        match b[i] {
            b'\\' => i += 2,
            b'\n' if quote != b'`' => return None,
            c if c == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

/// Index just past a `//` or `/* */` comment at `start`, if there is one.
fn skip_comment(b: &[u8], start: usize) -> Option<usize> {
    match (b.get(start), b.get(start + 1)) {
        (Some(b'/'), Some(b'/')) => Some(
            b[start..]
                .iter()
                .position(|&c| c == b'\n')
                .map_or(b.len(), |p| start + p),
        ),
        (Some(b'/'), Some(b'*')) => b[start + 2..]
            .windows(2)
            .position(|w| w == b"*/")
            .map(|p| start + 2 + p + 2),
        _ => None,
    }
}

/// Finds the close delimiter balancing one already-open `open` before `from`.
///
/// Strings and comments are skipped; only the given delimiter pair is counted.
pub fn close_from(s: &str, from: usize, open: u8, close: u8) -> Option<usize> {
    let b = s.as_bytes();
    let mut depth = 1usize;
    let mut i = from;

    while i < b.len() {
        let c = b[i];
        if matches!(c, b'\'' | b'"' | b'`') {
            i = skip_string(b, i).unwrap_or(i + 1);
            continue;
        }
        if c == b'/' {
            if let Some(end) = skip_comment(b, i) {
                i = end;
                continue;
            }
        }
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

/// Index of the delimiter matching the one at `open_idx` (`(`, `{` or `[`).
pub fn matching_close(s: &str, open_idx: usize) -> Option<usize> {
    let open = *s.as_bytes().get(open_idx)?;
    let close = match open {
        b'(' => b')',
        b'{' => b'}',
        b'[' => b']',
        _ => return None,
    };
    close_from(s, open_idx + 1, open, close)
}

/// Index of the `>` ending the opening tag that starts at `start`.
fn tag_end(s: &str, start: usize) -> Option<usize> {
    let b = s.as_bytes();
    let mut i = start + 1;
    while i < b.len() {
        match b[i] {
            b'"' | b'\'' => i = skip_string(b, i)?,
            b'{' => i = matching_close(s, i)? + 1,
            b'>' => return Some(i),
            b'<' => return None,
            _ => i += 1,
        }
    }
    None
}

/// End (exclusive) of the JSX element starting at `start`.
///
/// Handles self-closing elements, nested open/close pairs, fragments and
/// `{...}` expression children. Closing tag names are not checked against
/// their opening tags.
pub fn element_end(s: &str, start: usize) -> Option<usize> {
    let b = s.as_bytes();
    if b.get(start) != Some(&b'<') {
        return None;
    }

    let mut depth = 0usize;
    let mut i = start;
    while i < b.len() {
        match b[i] {
            b'<' => match b.get(i + 1) {
                Some(b'/') => {
                    let gt = i + b[i..].iter().position(|&c| c == b'>')?;
                    depth = depth.checked_sub(1)?;
                    i = gt + 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                Some(b'>') => {
                    depth += 1;
                    i += 2;
                }
                Some(c) if c.is_ascii_alphabetic() => {
                    let gt = tag_end(s, i)?;
                    i = gt + 1;
                    if b[gt - 1] == b'/' {
                        if depth == 0 {
                            return Some(i);
                        }
                    } else {
                        depth += 1;
                    }
                }
                _ if depth == 0 => return None,
                _ => i += 1,
            },
            _ if depth == 0 => return None,
            b'{' => i = matching_close(s, i)? + 1,
            _ => i += 1,
        }
    }
    None
}

/// Returns `true` if `needle` occurs outside any nested delimiters or strings.
pub fn has_top_level(s: &str, needle: u8) -> bool {
    let b = s.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < b.len() {
        match b[i] {
            b'\'' | b'"' | b'`' => {
                i = skip_string(b, i).unwrap_or(i + 1);
                continue;
            }
            b'(' | b'{' | b'[' => depth += 1,
            b')' | b'}' | b']' => depth = depth.saturating_sub(1),
            c if c == needle && depth == 0 => return true,
            _ => {}
        }
        i += 1;
    }
    false
}

/// Skips whitespace and comments starting at `from`.
pub fn skip_trivia(s: &str, from: usize) -> usize {
    let b = s.as_bytes();
    let mut i = from;
    loop {
        while i < b.len() && b[i].is_ascii_whitespace() {
            i += 1;
        }
        match skip_comment(b, i) {
            Some(end) => i = end,
            None => return i,
        }
    }
}

/// End of the expression or statement starting at `from`, before `limit`.
///
/// Stops at a top-level `;`, or at a top-level newline when the line so far
/// ends in something that can close an expression. The returned offset points
/// at the terminator (or equals `limit`).
pub fn statement_end(s: &str, from: usize, limit: usize) -> usize {
    let b = s.as_bytes();
    let mut depth = 0usize;
    let mut i = from;
    while i < limit {
        match b[i] {
            b'\'' | b'"' | b'`' => {
                i = skip_string(b, i).unwrap_or(i + 1);
                continue;
            }
            b'(' | b'{' | b'[' => depth += 1,
            b')' | b'}' | b']' => depth = depth.saturating_sub(1),
            b';' if depth == 0 => return i,
            b'\n' if depth == 0 => {
                let so_far = s[from..i].trim_end();
                let closes = so_far.ends_with(|c: char| {
                    c.is_alphanumeric()
                        || matches!(c, '}' | ')' | ']' | '"' | '\'' | '`' | '_' | '$')
                });
                if closes {
                    return i;
                }
            }
            _ => {}
        }
        i += 1;
    }
    limit
}

/// Start of the line containing byte offset `at`.
pub fn line_start(s: &str, at: usize) -> usize {
    s[..at].rfind('\n').map_or(0, |p| p + 1)
}

/// Strips the common indentation of `text` and prefixes every non-empty line
/// with `indent`. Leading and trailing blank lines are dropped.
///
/// Only spaces and tabs count as indentation.
pub fn reindent(text: &str, indent: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    let (Some(first), Some(last)) = (first, last) else {
        return String::new();
    };
    let lines = &lines[first..=last];

    let common = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.bytes().take_while(|b| *b == b' ' || *b == b'\t').count())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                String::new()
            } else {
                format!("{indent}{}", l[common..].trim_end())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(s: &str) -> Option<&str> {
        element_end(s, 0).map(|end| &s[..end])
    }

    #[test]
    fn test_self_closing_element() {
        assert_eq!(element("<App/>, root)"), Some("<App/>"));
        assert_eq!(element("<App prop={1} />, root)"), Some("<App prop={1} />"));
    }

    #[test]
    fn test_nested_element_across_lines() {
        let src = "<Provider store={store}>\n  <App title=\"a > b\" />\n</Provider>, el)";
        assert_eq!(
            element(src),
            Some("<Provider store={store}>\n  <App title=\"a > b\" />\n</Provider>")
        );
    }

    #[test]
    fn test_fragment_and_expression_children() {
        let src = "<><Router>{routes.map(r => <Route key={r} />)}</Router></>;";
        assert_eq!(
            element(src),
            Some("<><Router>{routes.map(r => <Route key={r} />)}</Router></>")
        );
    }

    #[test]
    fn test_unbalanced_markup_is_rejected() {
        assert_eq!(element("<App>"), None);
        assert_eq!(element("<App attr=\"x />"), None);
        assert_eq!(element("App />"), None);
    }

    #[test]
    fn test_matching_close_skips_strings_and_comments() {
        let src = "{ a: ')', /* } */ b: \"}\" }";
        assert_eq!(matching_close(src, 0), Some(src.len() - 1));

        let call = "(document.getElementById('root'))";
        assert_eq!(matching_close(call, 0), Some(call.len() - 1));
    }

    #[test]
    fn test_apostrophe_in_jsx_text_does_not_swallow_braces() {
        let src = "{\n  return <p>Don't stop</p>;\n}";
        assert_eq!(matching_close(src, 0), Some(src.len() - 1));
    }

    #[test]
    fn test_has_top_level() {
        assert!(has_top_level("el, () => done()", b','));
        assert!(!has_top_level("document.querySelector('a, b')", b','));
        assert!(!has_top_level("f(a, b)", b','));
    }

    #[test]
    fn test_reindent() {
        let text = "\n        return (\n          <div />\n        );\n    ";
        assert_eq!(reindent(text, "  "), "  return (\n    <div />\n  );");
    }

    #[test]
    fn test_reindent_keeps_non_ascii_whitespace() {
        let text = "   return (\n  \u{a0}hi\n   );";
        assert_eq!(reindent(text, ""), " return (\n\u{a0}hi\n );");
    }

    #[test]
    fn test_skip_trivia() {
        let s = "  // note\n  /* block */ next";
        assert_eq!(&s[skip_trivia(s, 0)..], "next");
    }

    #[test]
    fn test_statement_end() {
        let s = "a = { x: 1 };\nb = 2";
        assert_eq!(statement_end(s, 0, s.len()), 12);

        let s = "h = () => {\n  go();\n}\nrender() {}";
        assert_eq!(&s[..statement_end(s, 0, s.len())], "h = () => {\n  go();\n}");

        let s = "x = a +\n  b\n";
        assert_eq!(&s[..statement_end(s, 0, s.len())], "x = a +\n  b");
    }

    #[test]
    fn test_line_start() {
        let s = "a\n  b";
        assert_eq!(line_start(s, 4), 2);
        assert_eq!(line_start(s, 0), 0);
    }
}

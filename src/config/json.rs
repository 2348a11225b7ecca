//! Lenient JSON for `tsconfig.json`-style files.
//!
//! TypeScript accepts comments and trailing commas in its config; serde_json
//! does not. [`parse_lenient`] tries a strict parse first and only strips those
//! extensions when it fails.

use serde_json::Value;

/// How a document was finally parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Strict,
    Lenient,
}

/// Parses `content` strictly, falling back to the comment-tolerant form.
///
/// On failure the error of the lenient attempt is returned.
pub fn parse_lenient(content: &str) -> Result<(Value, ParseMode), serde_json::Error> {
    match serde_json::from_str(content) {
        Ok(value) => Ok((value, ParseMode::Strict)),
        Err(e) => {
            log::debug!("Strict JSON parse failed ({}), retrying leniently", e);
            let cleaned = strip_trailing_commas(&strip_comments(content));
            serde_json::from_str(&cleaned).map(|value| (value, ParseMode::Lenient))
        }
    }
}

/// Removes `//` and `/* */` comments outside string literals.
///
/// Newlines inside removed comments are kept so line numbers in later parse
/// errors still match the file.
pub fn strip_comments(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Removes commas directly followed (ignoring whitespace) by `}` or `]`.
pub fn strip_trailing_commas(content: &str) -> String {
    let chars: Vec<char> = content.chars().collect();
    let mut out = String::with_capacity(content.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(&escaped) = chars.get(i + 1) {
                    out.push(escaped);
                    i += 1;
                }
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                i += 1;
                continue;
            }
        }
        out.push(c);
        i += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_json_parses_strictly() {
        let (value, mode) = parse_lenient(r#"{"compilerOptions": {"jsx": "react"}}"#).unwrap();
        assert_eq!(mode, ParseMode::Strict);
        assert_eq!(value["compilerOptions"]["jsx"], "react");
    }

    #[test]
    fn test_comments_and_trailing_commas() {
        let src = r#"{
  // Base options
  "compilerOptions": {
    "jsx": "react", /* classic runtime */
    "paths": { "@/*": ["src/*",], },
  },
}
"#;
        let (value, mode) = parse_lenient(src).unwrap();
        assert_eq!(mode, ParseMode::Lenient);
        assert_eq!(value["compilerOptions"]["jsx"], "react");
        assert_eq!(value["compilerOptions"]["paths"]["@/*"][0], "src/*");
    }

    #[test]
    fn test_comment_markers_inside_strings_survive() {
        let src = r#"{"url": "http://example.com/*x*/", "a": "b,}",}"#;
        let (value, _) = parse_lenient(src).unwrap();
        assert_eq!(value["url"], "http://example.com/*x*/");
        assert_eq!(value["a"], "b,}");
    }

    #[test]
    fn test_garbage_still_fails() {
        assert!(parse_lenient("{ compilerOptions: ").is_err());
    }

    #[test]
    fn test_strip_comments_keeps_line_count() {
        let src = "{\n/* a\nb */\n\"x\": 1 // c\n}";
        assert_eq!(strip_comments(src).lines().count(), src.lines().count());
    }
}

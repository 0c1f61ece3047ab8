//! Turns a parser position inside a heredoc body into a concrete suggestion.

use crate::substitute::PLACEHOLDER;

/// The block text around one parser error.
pub(crate) struct BlockContext<'a> {
    src: &'a str,
    lines: Vec<&'a str>,
    /// 1-based, as reported by serde_json.
    line: usize,
    /// 1-based; 0 means "before the first character".
    column: usize,
}

impl<'a> BlockContext<'a> {
    pub(crate) fn new(src: &'a str, line: usize, column: usize) -> Self {
        Self {
            src,
            lines: src.lines().collect(),
            line,
            column,
        }
    }

    fn current_line(&self) -> &'a str {
        self.lines
            .get(self.line.saturating_sub(1))
            .copied()
            .unwrap_or("")
    }

    /// Text of the error line up to (not including) the error column.
    fn before_error(&self) -> &'a str {
        let line = self.current_line();
        &line[..char_to_byte(line, self.column.saturating_sub(1))]
    }

    /// Nearest non-blank line above the error line.
    fn previous_content_line(&self) -> Option<&'a str> {
        self.lines[..self.line.saturating_sub(1).min(self.lines.len())]
            .iter()
            .rev()
            .copied()
            .find(|l| !l.trim().is_empty())
    }

    /// Word starting at the error column: letters, digits and `_-.+`.
    fn token_at_error(&self) -> &'a str {
        let line = self.current_line();
        let rest = &line[char_to_byte(line, self.column.saturating_sub(1))..];
        let end = rest
            .find(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')))
            .unwrap_or(rest.len());
        &rest[..end]
    }

    pub(crate) fn is_trailing_comma(&self) -> bool {
        let before = self.before_error().trim_end();
        if before.is_empty() {
            self.previous_content_line()
                .is_some_and(|l| l.trim_end().ends_with(','))
        } else {
            before.ends_with(',')
        }
    }

    pub(crate) fn trailing_comma(&self) -> String {
        let before = self.before_error().trim_end();
        let offender = if before.is_empty() {
            self.previous_content_line().map(str::trim).unwrap_or("")
        } else {
            before.trim_start()
        };
        match offender.strip_suffix(',') {
            Some(kept) if !kept.trim().is_empty() => {
                format!("remove the comma after `{}`", kept.trim_end())
            }
            _ => "remove the trailing comma".to_string(),
        }
    }

    pub(crate) fn missing_comma(&self) -> String {
        let previous = if self.before_error().trim().is_empty() {
            self.previous_content_line()
        } else {
            Some(self.before_error())
        };
        match previous.map(str::trim) {
            Some(prev) if !prev.ends_with([',', '[', '{']) && !prev.is_empty() => {
                let skip = prev.chars().count().saturating_sub(32);
                let shown: String = prev.chars().skip(skip).collect();
                format!("add `,` after `{shown}`")
            }
            _ => "add `,` between the items".to_string(),
        }
    }

    pub(crate) fn missing_colon(&self) -> String {
        let before = self.before_error();
        last_quoted(before)
            .map(|key| format!("write `\"{key}\": ` before the value"))
            .unwrap_or_else(|| "add `:` after the key".to_string())
    }

    pub(crate) fn unquoted_key(&self) -> String {
        let token = self.token_at_error();
        if token.is_empty() {
            "object keys must be double-quoted strings".to_string()
        } else {
            format!("change `{token}` to `\"{token}\"`")
        }
    }

    pub(crate) fn unexpected_end(&self) -> String {
        if self.src.trim().is_empty() {
            return "the heredoc body is empty".to_string();
        }
        let mut open = Vec::new();
        let mut in_string = false;
        let mut escaped = false;
        for c in self.src.chars() {
            if in_string {
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '{' => open.push('}'),
                '[' => open.push(']'),
                '}' | ']' => {
                    open.pop();
                }
                _ => {}
            }
        }
        if in_string {
            return "close the string with `\"`".to_string();
        }
        if open.is_empty() {
            return "the block ends before the value is complete".to_string();
        }
        let closers: String = open.iter().rev().collect();
        format!("the block ends with unclosed brackets, add `{closers}`")
    }

    pub(crate) fn bad_escape(&self) -> String {
        if self.before_error().ends_with('\\') || self.token_at_error().is_empty() {
            "escape a literal backslash as `\\\\`".to_string()
        } else {
            "valid escapes are \\\" \\\\ \\/ \\b \\f \\n \\r \\t \\uXXXX".to_string()
        }
    }

    pub(crate) fn bad_number(&self) -> String {
        let token = self.number_token();
        if token.is_empty() {
            return "fix the number format".to_string();
        }
        let digits = token.strip_prefix('-').unwrap_or(token);
        if digits.len() > 1 && digits.starts_with('0') && digits.as_bytes()[1].is_ascii_digit() {
            let sign = if token.starts_with('-') { "-" } else { "" };
            let trimmed = digits.trim_start_matches('0');
            let trimmed = if trimmed.is_empty() || trimmed.starts_with('.') {
                format!("0{trimmed}")
            } else {
                trimmed.to_string()
            };
            return format!("change `{token}` to `{sign}{trimmed}`");
        }
        if let Some(unsigned) = token.strip_prefix('+') {
            return format!("change `{token}` to `{unsigned}`");
        }
        if token.ends_with('.') {
            return format!("change `{token}` to `{token}0`");
        }
        "fix the number format".to_string()
    }

    /// An interpolation outside quotes becomes a bare placeholder word.
    pub(crate) fn unquoted_interpolation(&self) -> Option<String> {
        self.current_line().contains(PLACEHOLDER).then(|| {
            "an unquoted `${...}` can't be checked as JSON, quote it or build the value with jsonencode()"
                .to_string()
        })
    }

    /// The run of number characters containing the error column.
    fn number_token(&self) -> &'a str {
        let line = self.current_line();
        let at = char_to_byte(line, self.column.saturating_sub(1));
        let is_num = |c: char| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E');
        let start = line[..at]
            .char_indices()
            .rev()
            .take_while(|&(_, c)| is_num(c))
            .last()
            .map_or(at, |(i, _)| i);
        let end = line[at..].find(|c: char| !is_num(c)).map_or(line.len(), |i| at + i);
        &line[start..end]
    }
}

fn last_quoted(text: &str) -> Option<&str> {
    let end = text.rfind('"')?;
    let start = text[..end].rfind('"')?;
    Some(&text[start + 1..end])
}

/// Byte offset of the `chars`-th character, clamped to the end of `text`.
fn char_to_byte(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_comma_on_same_line() {
        let ctx = BlockContext::new(r#"{"a": 1,}"#, 1, 9);
        assert!(ctx.is_trailing_comma());
        assert_eq!(ctx.trailing_comma(), r#"remove the comma after `{"a": 1`"#);
    }

    #[test]
    fn trailing_comma_on_line_above() {
        let src = "{\n  \"a\": 1,\n}\n";
        let ctx = BlockContext::new(src, 3, 1);
        assert!(ctx.is_trailing_comma());
        assert_eq!(ctx.trailing_comma(), "remove the comma after `\"a\": 1`");
    }

    #[test]
    fn missing_comma_names_previous_item() {
        let src = "{\n  \"a\": 1\n  \"b\": 2\n}";
        let ctx = BlockContext::new(src, 3, 3);
        assert_eq!(ctx.missing_comma(), "add `,` after `\"a\": 1`");
    }

    #[test]
    fn unquoted_key_is_quoted() {
        let ctx = BlockContext::new("{name: 1}", 1, 2);
        assert_eq!(ctx.unquoted_key(), "change `name` to `\"name\"`");
    }

    #[test]
    fn missing_colon_names_key() {
        let ctx = BlockContext::new(r#"{"name" 1}"#, 1, 9);
        assert_eq!(ctx.missing_colon(), r#"write `"name": ` before the value"#);
    }

    #[test]
    fn unexpected_end_lists_closers() {
        let ctx = BlockContext::new("[\n  {\"a\": \"}\"\n", 3, 0);
        assert_eq!(
            ctx.unexpected_end(),
            "the block ends with unclosed brackets, add `}]`"
        );
        let empty = BlockContext::new("\n", 2, 0);
        assert_eq!(empty.unexpected_end(), "the heredoc body is empty");
    }

    #[test]
    fn leading_zero_number() {
        let ctx = BlockContext::new(r#"{"port": 080}"#, 1, 11);
        assert_eq!(ctx.bad_number(), "change `080` to `80`");
    }

    #[test]
    fn unquoted_placeholder_is_recognised() {
        let ctx = BlockContext::new(r#"{"cpu": some-var-here}"#, 1, 9);
        assert!(ctx.unquoted_interpolation().is_some());
        let plain = BlockContext::new(r#"{"cpu": nope}"#, 1, 9);
        assert!(plain.unquoted_interpolation().is_none());
    }
}

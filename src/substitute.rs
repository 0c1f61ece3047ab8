//! Replaces terraform `${...}` interpolations with a placeholder so the
//! surrounding text has a chance of parsing as JSON.

/// Text every interpolation is replaced with.
pub const PLACEHOLDER: &str = "some-var-here";

/// Substitutes every top-level `${...}` expression in `line`.
///
/// Each expression found is replaced everywhere it occurs in the line, then any
/// `""` left behind is collapsed to `"` (an interpolation that was already
/// quoted inside a JSON string). Nested braces are tracked by depth and a
/// backslash makes the next character non-structural. An expression whose
/// braces never balance is left alone.
///
/// ```
/// use ferrite_tf::substitute::substitute_vars;
///
/// let line = r#"  "image": "${var.repo}:${var.tag}","#;
/// assert_eq!(substitute_vars(line), r#"  "image": "some-var-here:some-var-here","#);
/// ```
pub fn substitute_vars(line: &str) -> String {
    let mut line = line.to_string();
    while let Some(expr) = first_expression(&line) {
        let expr = expr.to_owned();
        line = line.replace(&expr, PLACEHOLDER).replace("\"\"", "\"");
    }
    line
}

/// Finds the leftmost balanced `${...}` in `line`.
///
/// Every structural character is ASCII, so byte offsets are always char
/// boundaries and slicing is safe on any UTF-8 input.
fn first_expression(line: &str) -> Option<&str> {
    let bytes = line.as_bytes();
    let escaped = |i: usize| i > 0 && bytes[i - 1] == b'\\';
    let mut depth = 0usize;
    let mut start = 0usize;

    for (i, &byte) in bytes.iter().enumerate() {
        if escaped(i) {
            continue;
        }
        match byte {
            b'{' if depth == 0 => {
                if i > 0 && bytes[i - 1] == b'$' && !escaped(i - 1) {
                    start = i - 1;
                    depth = 1;
                }
            }
            b'{' => depth += 1,
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return Some(&line[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

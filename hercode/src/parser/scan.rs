//! Character-level scanning shared by the expression and statement parsers
//!
//! All scanners understand double-quoted strings: a quote toggles string
//! mode unless an odd number of backslashes precedes it. Only ASCII bytes
//! are ever matched, so every returned index is a char boundary.

/// Whether the byte at `index` is preceded by an odd run of backslashes
fn is_escaped(bytes: &[u8], index: usize) -> bool {
    let run = bytes[..index]
        .iter()
        .rev()
        .take_while(|&&b| b == b'\\')
        .count();
    run % 2 == 1
}

/// Drop everything from the first `#` that is not inside a string
pub fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut in_quotes = false;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'"' if !is_escaped(bytes, i) => in_quotes = !in_quotes,
            b'#' if !in_quotes => return &line[..i],
            _ => {}
        }
    }
    line
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split off the longest identifier prefix, if any
pub fn identifier_prefix(text: &str) -> Option<(&str, &str)> {
    let end = text
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_alphanumeric() || c == '_') || (i == 0 && c.is_ascii_digit()))
        .map_or(text.len(), |(i, _)| i);
    (end > 0).then(|| text.split_at(end))
}

/// Interior of a string literal that spans all of `text`.
///
/// The opening quote must be closed by the final character; `"a" + "b"` is
/// therefore not a single literal.
pub fn string_literal(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'"' {
        return None;
    }
    let close = (1..bytes.len()).find(|&i| bytes[i] == b'"' && !is_escaped(bytes, i))?;
    (close == bytes.len() - 1).then(|| &text[1..close])
}

/// Index of the `)` matching the `(` at `open`
pub fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_quotes = false;
    for i in open..bytes.len() {
        match bytes[i] {
            b'"' if !is_escaped(bytes, i) => in_quotes = !in_quotes,
            _ if in_quotes => {}
            b'(' => depth += 1,
            b')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// First occurrence of `pattern` outside parentheses and strings
pub fn find_top_level(text: &str, pattern: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let needle = pattern.as_bytes();
    let mut depth = 0i32;
    let mut in_quotes = false;
    for i in 0..bytes.len() {
        match bytes[i] {
            b'"' if !is_escaped(bytes, i) => in_quotes = !in_quotes,
            _ if in_quotes => {}
            b'(' => depth += 1,
            b')' => depth -= 1,
            _ if depth == 0 && bytes[i..].starts_with(needle) => return Some(i),
            _ => {}
        }
    }
    None
}

/// Split call arguments at commas outside nested parentheses and strings
pub fn split_arguments(text: &str) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_quotes = false;
    let mut start = 0;
    for i in 0..bytes.len() {
        match bytes[i] {
            b'"' if !is_escaped(bytes, i) => in_quotes = !in_quotes,
            _ if in_quotes => {}
            b'(' => depth += 1,
            b')' => depth -= 1,
            b',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

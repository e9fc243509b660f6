//! Error types and reporting
//!
//! Parsing aborts on the first structural error, so each error points at a
//! single 1-based source line.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ParseError>;

/// Structural parse error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A line or expression that no grammar rule accepts
    #[error("line {line}: {message}")]
    Syntax { message: String, line: usize },

    /// Malformed `function` or `start` header
    #[error("line {line}: invalid function header: {message}")]
    Header { message: String, line: usize },

    /// A closing marker with nothing to close
    #[error("line {line}: `{marker}` without a matching `{opener}`")]
    Unmatched {
        marker: &'static str,
        opener: &'static str,
        line: usize,
    },

    /// A block still open where it must already be closed
    #[error("line {line}: `{opener}` opened here is never closed with `{closer}`")]
    Unclosed {
        opener: &'static str,
        closer: &'static str,
        line: usize,
    },

    /// A function still open at end of input
    #[error("line {line}: function `{name}` is missing its `end`")]
    UnterminatedFunction { name: String, line: usize },
}

impl ParseError {
    pub fn syntax(message: impl Into<String>, line: usize) -> Self {
        Self::Syntax {
            message: message.into(),
            line,
        }
    }

    pub fn header(message: impl Into<String>, line: usize) -> Self {
        Self::Header {
            message: message.into(),
            line,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Self::Syntax { line, .. }
            | Self::Header { line, .. }
            | Self::Unmatched { line, .. }
            | Self::Unclosed { line, .. }
            | Self::UnterminatedFunction { line, .. } => *line,
        }
    }

    /// The message without its line prefix
    pub fn message(&self) -> String {
        let full = self.to_string();
        let prefix = format!("line {}: ", self.line());
        full.strip_prefix(&prefix).map(str::to_string).unwrap_or(full)
    }
}

/// Byte range of the 1-based `line` in `source`, without its line terminator
fn line_range(source: &str, line: usize) -> std::ops::Range<usize> {
    let mut start = 0;
    for (index, text) in source.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let trimmed = text.trim_end_matches(['\n', '\r']);
            return start..start + trimmed.len();
        }
        start += text.len();
    }
    source.len()..source.len()
}

/// Report error with ariadne
pub fn report_error(filename: &str, source: &str, error: &ParseError) {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let range = line_range(source, error.line());
    let kind = match error {
        ParseError::Syntax { .. } => "Syntax",
        ParseError::Header { .. } => "Header",
        ParseError::Unmatched { .. } => "Block",
        ParseError::Unclosed { .. } => "Block",
        ParseError::UnterminatedFunction { .. } => "Function",
    };

    let printed = Report::build(ReportKind::Error, (filename, range.clone()))
        .with_message(format!("{kind} error"))
        .with_label(
            Label::new((filename, range))
                .with_message(error.message())
                .with_color(Color::Red),
        )
        .finish()
        .eprint((filename, Source::from(source)));

    // The report is best effort; fall back to the plain message
    if printed.is_err() {
        eprintln!("{filename}: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_line() {
        let err = ParseError::syntax("cannot parse expression `1 +`", 4);
        assert_eq!(err.to_string(), "line 4: cannot parse expression `1 +`");
        assert_eq!(err.line(), 4);
        assert_eq!(err.message(), "cannot parse expression `1 +`");
    }

    #[test]
    fn test_unmatched_message() {
        let err = ParseError::Unmatched {
            marker: "endif",
            opener: "if",
            line: 9,
        };
        assert_eq!(err.message(), "`endif` without a matching `if`");
    }

    #[test]
    fn test_unterminated_function() {
        let err = ParseError::UnterminatedFunction {
            name: "start".to_string(),
            line: 1,
        };
        assert!(err.to_string().contains("`start`"));
        assert!(err.to_string().contains("`end`"));
    }

    #[test]
    fn test_line_range() {
        let source = "start:\r\n  say 1\nend";
        assert_eq!(&source[line_range(source, 1)], "start:");
        assert_eq!(&source[line_range(source, 2)], "  say 1");
        assert_eq!(&source[line_range(source, 3)], "end");
        assert_eq!(line_range(source, 10), source.len()..source.len());
    }
}

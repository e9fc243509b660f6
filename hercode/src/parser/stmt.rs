//! Statement and header recognition for a single source line

use super::expr::parse_expression;
use super::scan::{identifier_prefix, is_identifier};
use crate::ast::{Expr, Stmt};
use crate::error::{ParseError, Result};

/// Text after `keyword` when the line starts with `keyword` and whitespace
pub(crate) fn keyword_rest<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(keyword)?;
    rest.starts_with(char::is_whitespace).then(|| rest.trim())
}

/// Drop one optional trailing `:` from a block head
fn strip_colon(text: &str) -> &str {
    text.strip_suffix(':').unwrap_or(text).trim_end()
}

/// `name = value`, but not `name == value`
fn split_assignment(text: &str) -> Option<(&str, &str)> {
    let (name, rest) = identifier_prefix(text)?;
    let value = rest.trim_start().strip_prefix('=')?;
    (!value.starts_with('=')).then_some((name, value))
}

/// Parse one trimmed, comment-free line into a statement.
///
/// Block heads come back as `If`/`While` with empty bodies; the block
/// assembler fills them in.
pub fn parse_statement(text: &str, line: usize) -> Result<Stmt> {
    let text = text.trim();

    if let Some(cond) = keyword_rest(text, "if") {
        return Ok(Stmt::If {
            cond: parse_expression(strip_colon(cond), line)?,
            then_branch: Vec::new(),
            else_branch: None,
        });
    }

    if let Some(cond) = keyword_rest(text, "while") {
        return Ok(Stmt::While {
            cond: parse_expression(strip_colon(cond), line)?,
            body: Vec::new(),
        });
    }

    if let Some((name, value)) = split_assignment(text) {
        return Ok(Stmt::Assign {
            name: name.to_string(),
            value: parse_expression(value, line)?,
        });
    }

    if let Some(expr) = keyword_rest(text, "say") {
        return Ok(Stmt::Say(parse_expression(expr, line)?));
    }

    if let Some(decl) = keyword_rest(text, "var") {
        let Some((name, value)) = split_assignment(decl) else {
            return Err(ParseError::syntax(
                format!("invalid variable declaration `{text}`"),
                line,
            ));
        };
        return Ok(Stmt::Declare {
            name: name.to_string(),
            value: parse_expression(value, line)?,
        });
    }

    if let Some(expr) = keyword_rest(text, "return") {
        return Ok(Stmt::Return(parse_expression(expr, line)?));
    }

    if let Some((_, rest)) = identifier_prefix(text) {
        if rest.starts_with('(') && text.ends_with(')') {
            return match parse_expression(text, line)? {
                Expr::Call { func, args } => Ok(Stmt::Call { func, args }),
                _ => Err(ParseError::syntax(
                    format!("invalid function call `{text}`"),
                    line,
                )),
            };
        }
    }

    // A bare name is a call without arguments
    if is_identifier(text) {
        return Ok(Stmt::Call {
            func: text.to_string(),
            args: Vec::new(),
        });
    }

    Err(ParseError::syntax(
        format!("unrecognized statement `{text}`"),
        line,
    ))
}

/// Parse a `function name p1 p2:` header (the text after `function`)
pub fn parse_function_header(rest: &str, line: usize) -> Result<(String, Vec<String>)> {
    let Some((signature, trailing)) = rest.split_once(':') else {
        return Err(ParseError::header("missing `:`", line));
    };
    if !trailing.trim().is_empty() {
        return Err(ParseError::header(
            format!("unexpected `{}` after `:`", trailing.trim()),
            line,
        ));
    }

    let mut words = signature.split_whitespace();
    let name = match words.next() {
        Some(name) if is_identifier(name) => name.to_string(),
        Some(name) => {
            return Err(ParseError::header(
                format!("`{name}` is not a valid function name"),
                line,
            ));
        }
        None => return Err(ParseError::header("missing function name", line)),
    };

    let params = words
        .map(|param| {
            if is_identifier(param) {
                Ok(param.to_string())
            } else {
                Err(ParseError::header(
                    format!("`{param}` is not a valid parameter name"),
                    line,
                ))
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((name, params))
}

/// `start:` header of the entry function
pub fn is_start_header(text: &str) -> bool {
    text.strip_suffix(':')
        .is_some_and(|head| head.trim_end() == crate::ast::ENTRY_POINT)
}

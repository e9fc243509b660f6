//! Expression parsing
//!
//! A single line of text is tried against three strategies in order and the
//! first that succeeds wins:
//!
//! 1. a literal (number, string, `true`/`false`) or a variable reference,
//! 2. a call `name(args)` whose parentheses span the whole text,
//! 3. a binary split.
//!
//! The binary split walks [`BinOp::SPLIT_ORDER`] and cuts the text at the
//! first top-level occurrence of the first operator that has one. Both
//! halves are parsed recursively, and the whole remainder becomes the right
//! operand. `a - b + c` therefore parses as `(a - b) + c` because `+` is
//! tried first, while `a + b - c` parses as `a + (b - c)`. Chains of one
//! operator associate to the right: `a - b - c` is `a - (b - c)`.

use super::scan::{
    find_top_level, identifier_prefix, is_identifier, matching_paren, split_arguments,
    string_literal,
};
use crate::ast::{BinOp, Expr};
use crate::error::{ParseError, Result};
use crate::interp::Value;

/// Parse one expression found on source line `line`
pub fn parse_expression(text: &str, line: usize) -> Result<Expr> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::syntax("empty expression", line));
    }

    if let Some(expr) = parse_simple(text, line)? {
        return Ok(expr);
    }
    if let Some(expr) = parse_call(text, line)? {
        return Ok(expr);
    }
    if let Some(expr) = parse_binary(text, line)? {
        return Ok(expr);
    }

    Err(ParseError::syntax(
        format!("cannot parse expression `{text}`"),
        line,
    ))
}

/// Literal or variable reference
fn parse_simple(text: &str, line: usize) -> Result<Option<Expr>> {
    if let Some(n) = parse_number(text) {
        if !n.is_finite() {
            return Err(ParseError::syntax(
                format!("number literal `{text}` is out of range"),
                line,
            ));
        }
        return Ok(Some(Expr::number(n)));
    }
    if let Some(s) = string_literal(text) {
        return Ok(Some(Expr::string(s)));
    }
    Ok(match text {
        "true" => Some(Expr::Literal(Value::Bool(true))),
        "false" => Some(Expr::Literal(Value::Bool(false))),
        _ if is_identifier(text) => Some(Expr::var(text)),
        _ => None,
    })
}

/// Decimal float syntax: optional sign, then a digit or a point
fn parse_number(text: &str) -> Option<f64> {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    text.parse().ok()
}

/// `name(args)` where the opening parenthesis closes at the last character
fn parse_call(text: &str, line: usize) -> Result<Option<Expr>> {
    let Some((name, rest)) = identifier_prefix(text) else {
        return Ok(None);
    };
    if !rest.starts_with('(') || matching_paren(text, name.len()) != Some(text.len() - 1) {
        return Ok(None);
    }

    let inner = &text[name.len() + 1..text.len() - 1];
    let args = split_arguments(inner)
        .into_iter()
        .map(|arg| parse_expression(arg, line))
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(Expr::Call {
        func: name.to_string(),
        args,
    }))
}

/// Split at the first top-level occurrence of the highest-priority operator
fn parse_binary(text: &str, line: usize) -> Result<Option<Expr>> {
    for op in BinOp::SPLIT_ORDER {
        let symbol = op.symbol();
        if let Some(at) = find_top_level(text, symbol) {
            let left = parse_expression(&text[..at], line)?;
            let right = parse_expression(&text[at + symbol.len()..], line)?;
            return Ok(Some(Expr::binary(left, op, right, line)));
        }
    }
    Ok(None)
}

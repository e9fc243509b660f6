//! Built-in functions
//!
//! Builtins are intercepted by name before user-defined lookup. They take
//! already-evaluated arguments and report misuse as in-band error values.

use super::error::RuntimeError;
use super::Value;

/// Builtin function type
pub type BuiltinFn = fn(&[Value]) -> Value;

/// Find the builtin registered under `name`
pub fn lookup(name: &str) -> Option<BuiltinFn> {
    match name {
        "len" => Some(builtin_len),
        "substr" => Some(builtin_substr),
        "sqrt" => Some(builtin_sqrt),
        _ => None,
    }
}

/// Names of every builtin (for suggestions)
pub const NAMES: [&str; 3] = ["len", "substr", "sqrt"];

/// len(s: string) -> number
/// Number of characters in `s`.
fn builtin_len(args: &[Value]) -> Value {
    if args.len() != 1 {
        return RuntimeError::arity_mismatch("len", "1", args.len()).into();
    }
    match args[0].as_str() {
        Some(s) => Value::Number(s.chars().count() as f64),
        None => RuntimeError::argument_type("len", 1, "string", args[0].type_name()).into(),
    }
}

/// substr(s: string, start: number[, end: number]) -> string
/// Half-open character slice `[start, end)`; `end` defaults to the length.
/// `start` must index a character of `s` and `start <= end <= len`.
fn builtin_substr(args: &[Value]) -> Value {
    if !(2..=3).contains(&args.len()) {
        return RuntimeError::arity_mismatch("substr", "2-3", args.len()).into();
    }
    let Some(s) = args[0].as_str() else {
        return RuntimeError::argument_type("substr", 1, "string", args[0].type_name()).into();
    };
    let Some(start) = args[1].as_number() else {
        return RuntimeError::argument_type("substr", 2, "number", args[1].type_name()).into();
    };

    let chars: Vec<char> = s.chars().collect();
    let len = chars.len();
    // Positions truncate toward zero like the modulo operator does.
    // The negated range checks also reject NaN.
    let start_at = start.trunc();
    if !(start_at >= 0.0 && start_at < len as f64) {
        return RuntimeError::index_out_of_bounds("substr", "start", start, len).into();
    }
    let start_at = start_at as usize;

    let end_at = match args.get(2) {
        None => len,
        Some(Value::Number(end)) => {
            let end_at = end.trunc();
            if !(end_at >= start_at as f64 && end_at <= len as f64) {
                return RuntimeError::index_out_of_bounds("substr", "end", *end, len).into();
            }
            end_at as usize
        }
        Some(other) => {
            return RuntimeError::argument_type("substr", 3, "number", other.type_name()).into();
        }
    };

    Value::Str(chars[start_at..end_at].iter().collect())
}

/// sqrt(n: number) -> number
fn builtin_sqrt(args: &[Value]) -> Value {
    if args.len() != 1 {
        return RuntimeError::arity_mismatch("sqrt", "1", args.len()).into();
    }
    match args[0] {
        Value::Number(n) if n < 0.0 => {
            RuntimeError::invalid_argument("sqrt", "argument must not be negative").into()
        }
        Value::Number(n) => Value::Number(n.sqrt()),
        ref other => RuntimeError::argument_type("sqrt", 1, "number", other.type_name()).into(),
    }
}

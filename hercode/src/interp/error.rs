//! Runtime errors for the interpreter
//!
//! Two channels exist. A [`RuntimeError`] travels in-band inside
//! [`Value::Error`](super::Value::Error): it is an ordinary value that
//! every consumer forwards unchanged. An [`ExecError`] is fatal for the
//! statement being executed and travels through `Result`.

use crate::util::format_suggestion_hint;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// In-band runtime error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
    /// Source line, when the failing node knows it
    pub line: Option<usize>,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Undefined variable
    UndefinedVariable,
    /// Undefined function
    UndefinedFunction,
    /// Operand types not supported by an operator
    TypeError,
    /// Division or modulo by zero
    DivisionByZero,
    /// Wrong number of arguments to a builtin
    ArityMismatch,
    /// Substring bounds outside the string
    IndexOutOfBounds,
    /// Argument of the right type but an unusable value
    InvalidArgument,
    /// `if`/`while` condition that is not a bool
    InvalidCondition,
    /// Assignment whose target is not a variable
    InvalidAssignment,
}

impl RuntimeError {
    fn new(kind: ErrorKind, message: String) -> Self {
        RuntimeError {
            kind,
            message,
            line: None,
        }
    }

    /// Attach a source line
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn undefined_variable(name: &str, suggestion: Option<&str>) -> Self {
        Self::new(
            ErrorKind::UndefinedVariable,
            format!(
                "undefined variable: {name}{}",
                format_suggestion_hint(suggestion)
            ),
        )
    }

    pub fn undefined_function(name: &str, suggestion: Option<&str>) -> Self {
        Self::new(
            ErrorKind::UndefinedFunction,
            format!(
                "undefined function: {name}{}",
                format_suggestion_hint(suggestion)
            ),
        )
    }

    pub fn type_error(left: &str, op: &str, right: &str) -> Self {
        Self::new(
            ErrorKind::TypeError,
            format!("type mismatch: {left} {op} {right}"),
        )
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::DivisionByZero, "division by zero".to_string())
    }

    pub fn arity_mismatch(name: &str, expected: &str, got: usize) -> Self {
        Self::new(
            ErrorKind::ArityMismatch,
            format!("{name}() expects {expected} argument(s), got {got}"),
        )
    }

    pub fn argument_type(name: &str, position: usize, expected: &str, got: &str) -> Self {
        Self::new(
            ErrorKind::TypeError,
            format!("{name}() argument {position} must be a {expected}, got {got}"),
        )
    }

    pub fn index_out_of_bounds(name: &str, what: &str, index: f64, len: usize) -> Self {
        Self::new(
            ErrorKind::IndexOutOfBounds,
            format!("{name}() {what} {index} out of range for length {len}"),
        )
    }

    pub fn invalid_argument(name: &str, reason: &str) -> Self {
        Self::new(ErrorKind::InvalidArgument, format!("{name}(): {reason}"))
    }

    pub fn invalid_condition(construct: &str, got: &str) -> Self {
        Self::new(
            ErrorKind::InvalidCondition,
            format!("{construct} condition must be a bool, got {got}"),
        )
    }

    pub fn invalid_assignment(target: &str) -> Self {
        Self::new(
            ErrorKind::InvalidAssignment,
            format!("cannot assign to `{target}`: left side must be a variable"),
        )
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for RuntimeError {}

/// Fatal failure while executing a statement
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("entry function `start` is not defined")]
    MissingEntry,

    #[error("stack overflow: call depth exceeded {limit}")]
    StackOverflow { limit: usize },

    #[error("failed to write program output: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type for interpreter operations
pub type ExecResult<T> = Result<T, ExecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_variable() {
        let err = RuntimeError::undefined_variable("foo", None);
        assert_eq!(err.kind, ErrorKind::UndefinedVariable);
        assert!(err.message.contains("foo"));
    }

    #[test]
    fn test_undefined_function_with_hint() {
        let err = RuntimeError::undefined_function("ad", Some("add"));
        assert_eq!(err.kind, ErrorKind::UndefinedFunction);
        assert!(err.message.contains("ad"));
        assert!(err.message.contains("did you mean `add`?"));
    }

    #[test]
    fn test_type_error() {
        let err = RuntimeError::type_error("bool", "-", "number");
        assert_eq!(err.kind, ErrorKind::TypeError);
        assert_eq!(err.message, "type mismatch: bool - number");
    }

    #[test]
    fn test_division_by_zero() {
        let err = RuntimeError::division_by_zero();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
        assert!(err.message.contains("division by zero"));
    }

    #[test]
    fn test_arity_mismatch() {
        let err = RuntimeError::arity_mismatch("substr", "2-3", 1);
        assert_eq!(err.kind, ErrorKind::ArityMismatch);
        assert!(err.message.contains("2-3"));
        assert!(err.message.contains("got 1"));
    }

    #[test]
    fn test_display_with_and_without_line() {
        let err = RuntimeError::division_by_zero();
        assert_eq!(err.to_string(), "division by zero");
        assert_eq!(err.at_line(7).to_string(), "line 7: division by zero");
    }

    #[test]
    fn test_invalid_condition() {
        let err = RuntimeError::invalid_condition("if", "number");
        assert_eq!(err.kind, ErrorKind::InvalidCondition);
        assert!(err.message.contains("bool"));
    }

    #[test]
    fn test_exec_error_display() {
        assert_eq!(
            ExecError::MissingEntry.to_string(),
            "entry function `start` is not defined"
        );
        let err = ExecError::StackOverflow { limit: 64 };
        assert!(err.to_string().contains("64"));
    }
}

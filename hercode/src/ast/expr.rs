//! Expression AST nodes

use crate::interp::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Fixed value: number, string or boolean literal
    Literal(Value),

    /// Variable reference
    Var(String),

    /// Binary operation, remembering its line for runtime diagnostics
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
        line: usize,
    },

    /// Function call
    Call { func: String, args: Vec<Expr> },
}

impl Expr {
    pub fn number(n: f64) -> Self {
        Expr::Literal(Value::Number(n))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Expr::Literal(Value::Str(s.into()))
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn binary(left: Expr, op: BinOp, right: Expr, line: usize) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
            line,
        }
    }

    pub fn call(func: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            func: func.into(),
            args,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Strings are stored without their delimiters
            Expr::Literal(Value::Str(s)) => write!(f, "\"{s}\""),
            // Shortest form that parses back to the same f64, never in exponent form
            Expr::Literal(Value::Number(n)) => write!(f, "{n}"),
            Expr::Literal(value) => write!(f, "{value}"),
            Expr::Var(name) => write!(f, "{name}"),
            Expr::Binary { left, op, right, .. } => write!(f, "{left} {op} {right}"),
            Expr::Call { func, args } => {
                write!(f, "{func}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    /// Assignment used as an expression: `name = value`
    Assign,

    // Comparison
    Eq,
    Ne,
    Le,
    Ge,
    Lt,
    Gt,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinOp {
    /// Split order used by the expression parser.
    ///
    /// Two-character comparators come before their one-character prefixes
    /// so that `<=` is never split as `<`. An operator earlier in this list
    /// always ends up closer to the root of the tree.
    pub const SPLIT_ORDER: [BinOp; 11] = [
        BinOp::Eq,
        BinOp::Ne,
        BinOp::Le,
        BinOp::Ge,
        BinOp::Lt,
        BinOp::Gt,
        BinOp::Add,
        BinOp::Sub,
        BinOp::Mul,
        BinOp::Div,
        BinOp::Mod,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Assign => "=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
        }
    }

    pub fn is_ordering(self) -> bool {
        matches!(self, BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge)
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

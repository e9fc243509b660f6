//! Abstract Syntax Tree definitions

mod expr;
mod location;
mod stmt;

pub use expr::*;
pub use location::*;
pub use stmt::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the entry function opened by a `start:` header
pub const ENTRY_POINT: &str = "start";

/// A parsed program: every function in definition order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    pub functions: Vec<Function>,
}

impl Program {
    /// The entry function, if the source defined one
    pub fn entry(&self) -> Option<&Function> {
        self.function(ENTRY_POINT)
    }

    /// Look up a function by name; later definitions win
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().rev().find(|f| f.name == name)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, function) in self.functions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{function}")?;
        }
        Ok(())
    }
}

/// Function definition
///
/// Built incrementally by the block assembler and never mutated once the
/// closing `end` has been seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub body: Block,
    /// Line of the header
    pub line: usize,
}

impl Function {
    pub fn new(name: impl Into<String>, params: Vec<String>, line: usize) -> Self {
        Function {
            name: name.into(),
            params,
            body: Vec::new(),
            line,
        }
    }

    pub fn is_entry(&self) -> bool {
        self.name == ENTRY_POINT
    }

    /// `name(p1, p2)`
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.params.join(", "))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_entry() {
            writeln!(f, "{ENTRY_POINT}:")?;
        } else {
            write!(f, "function {}", self.name)?;
            for param in &self.params {
                write!(f, " {param}")?;
            }
            writeln!(f, ":")?;
        }
        render_block(f, &self.body, 1)?;
        writeln!(f, "end")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_function() -> Function {
        let mut function = Function::new("add", vec!["a".to_string(), "b".to_string()], 1);
        function.body.push(Located::new(
            Stmt::Return(Expr::binary(Expr::var("a"), BinOp::Add, Expr::var("b"), 2)),
            2,
        ));
        function
    }

    #[test]
    fn test_signature() {
        assert_eq!(add_function().signature(), "add(a, b)");
        assert_eq!(Function::new("start", vec![], 1).signature(), "start()");
    }

    #[test]
    fn test_function_display() {
        insta::assert_snapshot!(add_function().to_string(), @r"
        function add a b:
            return a + b
        end
        ");
    }

    #[test]
    fn test_entry_display_uses_start_header() {
        let mut start = Function::new(ENTRY_POINT, vec![], 4);
        start
            .body
            .push(Located::new(Stmt::Say(Expr::string("hi")), 5));
        assert_eq!(start.to_string(), "start:\n    say \"hi\"\nend\n");
    }

    #[test]
    fn test_program_lookup_prefers_last_definition() {
        let mut second = add_function();
        second.line = 10;
        let program = Program {
            functions: vec![add_function(), second, Function::new(ENTRY_POINT, vec![], 20)],
        };
        assert_eq!(program.function("add").map(|f| f.line), Some(10));
        assert!(program.entry().is_some());
        assert!(program.function("missing").is_none());
    }
}

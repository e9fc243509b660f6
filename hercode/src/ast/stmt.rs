//! Statement AST nodes

use super::{Expr, Located};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A statement body: statements in execution order, each tagged with its line
pub type Block = Vec<Located<Stmt>>;

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// `name = expr`
    Assign { name: String, value: Expr },

    /// `var name = expr` (binds exactly like an assignment)
    Declare { name: String, value: Expr },

    /// `if cond:` ... [`else` ...] `endif`
    If {
        cond: Expr,
        then_branch: Block,
        else_branch: Option<Block>,
    },

    /// `while cond:` ... `endwhile`
    While { cond: Expr, body: Block },

    /// `return expr`
    Return(Expr),

    /// `say expr`
    Say(Expr),

    /// `name(args)` or a bare `name` used as a statement
    Call { func: String, args: Vec<Expr> },
}

impl Stmt {
    /// Render at the given nesting depth (four spaces per level)
    pub fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "    ".repeat(depth);
        match self {
            Stmt::Assign { name, value } => write!(f, "{pad}{name} = {value}"),
            Stmt::Declare { name, value } => write!(f, "{pad}var {name} = {value}"),
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                writeln!(f, "{pad}if {cond}:")?;
                render_block(f, then_branch, depth + 1)?;
                if let Some(else_branch) = else_branch {
                    writeln!(f, "{pad}else")?;
                    render_block(f, else_branch, depth + 1)?;
                }
                write!(f, "{pad}endif")
            }
            Stmt::While { cond, body } => {
                writeln!(f, "{pad}while {cond}:")?;
                render_block(f, body, depth + 1)?;
                write!(f, "{pad}endwhile")
            }
            Stmt::Return(expr) => write!(f, "{pad}return {expr}"),
            Stmt::Say(expr) => write!(f, "{pad}say {expr}"),
            Stmt::Call { func, args } => {
                let call = Expr::Call {
                    func: func.clone(),
                    args: args.clone(),
                };
                write!(f, "{pad}{call}")
            }
        }
    }
}

/// Render each statement of a block on its own line
pub(crate) fn render_block(f: &mut fmt::Formatter<'_>, block: &Block, depth: usize) -> fmt::Result {
    for stmt in block {
        stmt.node.render(f, depth)?;
        writeln!(f)?;
    }
    Ok(())
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinOp;

    fn at(stmt: Stmt, line: usize) -> Located<Stmt> {
        Located::new(stmt, line)
    }

    #[test]
    fn test_render_leaf_statements() {
        let assign = Stmt::Assign {
            name: "x".to_string(),
            value: Expr::binary(Expr::var("x"), BinOp::Add, Expr::number(3.0), 1),
        };
        assert_eq!(assign.to_string(), "x = x + 3");

        let declare = Stmt::Declare {
            name: "greeting".to_string(),
            value: Expr::string("hi"),
        };
        assert_eq!(declare.to_string(), "var greeting = \"hi\"");

        assert_eq!(Stmt::Say(Expr::var("x")).to_string(), "say x");
        assert_eq!(Stmt::Return(Expr::var("n")).to_string(), "return n");
        let call = Stmt::Call {
            func: "tick".to_string(),
            args: vec![],
        };
        assert_eq!(call.to_string(), "tick()");
    }

    #[test]
    fn test_render_nested_blocks() {
        let stmt = Stmt::While {
            cond: Expr::binary(Expr::var("i"), BinOp::Lt, Expr::number(3.0), 2),
            body: vec![at(
                Stmt::If {
                    cond: Expr::var("flag"),
                    then_branch: vec![at(Stmt::Say(Expr::var("i")), 4)],
                    else_branch: Some(vec![at(Stmt::Return(Expr::var("i")), 6)]),
                },
                3,
            )],
        };
        insta::assert_snapshot!(stmt.to_string(), @r"
        while i < 3:
            if flag:
                say i
            else
                return i
            endif
        endwhile
        ");
    }
}

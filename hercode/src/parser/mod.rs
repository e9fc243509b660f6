//! Line-oriented parser
//!
//! Source is processed one physical line at a time. Comments are stripped,
//! blank lines skipped, and each remaining line is either a structural
//! marker (`function ...:`, `start:`, `else`, `endif`, `endwhile`, `end`) or
//! a statement. The assembler keeps the open function and a stack of open
//! `if`/`while` frames; each frame knows which branch currently receives
//! statements, so nested blocks route correctly after an inner block closes.

mod expr;
mod scan;
mod stmt;


pub use expr::parse_expression;
pub use scan::strip_comment;
pub use stmt::{parse_function_header, parse_statement};

use crate::ast::{Block, Expr, Function, Located, Program, Stmt, ENTRY_POINT};
use crate::error::{ParseError, Result};
use stmt::{is_start_header, keyword_rest};

/// Parse a whole source text into a program
pub fn parse(source: &str) -> Result<Program> {
    let mut assembler = Assembler::default();
    for (index, raw) in source.lines().enumerate() {
        let text = strip_comment(raw).trim();
        if text.is_empty() {
            continue;
        }
        assembler.feed(text, index + 1)?;
    }
    let program = assembler.finish()?;
    tracing::debug!(functions = program.functions.len(), "parsed program");
    Ok(program)
}

/// An `if` or `while` whose closing marker has not been seen yet
enum OpenBlock {
    If {
        cond: Expr,
        line: usize,
        then_branch: Block,
        /// `Some` once `else` has been seen; statements then go here
        else_branch: Option<Block>,
    },
    While {
        cond: Expr,
        line: usize,
        body: Block,
    },
}

impl OpenBlock {
    fn opener(&self) -> &'static str {
        match self {
            OpenBlock::If { .. } => "if",
            OpenBlock::While { .. } => "while",
        }
    }

    fn closer(&self) -> &'static str {
        match self {
            OpenBlock::If { .. } => "endif",
            OpenBlock::While { .. } => "endwhile",
        }
    }

    fn line(&self) -> usize {
        match self {
            OpenBlock::If { line, .. } | OpenBlock::While { line, .. } => *line,
        }
    }

    /// The branch currently receiving statements
    fn target(&mut self) -> &mut Block {
        match self {
            OpenBlock::If {
                then_branch,
                else_branch,
                ..
            } => else_branch.as_mut().unwrap_or(then_branch),
            OpenBlock::While { body, .. } => body,
        }
    }

    fn unclosed(&self) -> ParseError {
        ParseError::Unclosed {
            opener: self.opener(),
            closer: self.closer(),
            line: self.line(),
        }
    }

    fn into_stmt(self) -> Located<Stmt> {
        match self {
            OpenBlock::If {
                cond,
                line,
                then_branch,
                else_branch,
            } => Located::new(
                Stmt::If {
                    cond,
                    then_branch,
                    else_branch,
                },
                line,
            ),
            OpenBlock::While { cond, line, body } => Located::new(Stmt::While { cond, body }, line),
        }
    }
}

#[derive(Default)]
struct Assembler {
    functions: Vec<Function>,
    current: Option<Function>,
    blocks: Vec<OpenBlock>,
}

impl Assembler {
    fn feed(&mut self, text: &str, line: usize) -> Result<()> {
        if let Some(header) = keyword_rest(text, "function") {
            let (name, params) = parse_function_header(header, line)?;
            return self.open_function(Function::new(name, params, line));
        }
        if is_start_header(text) {
            return self.open_function(Function::new(ENTRY_POINT, Vec::new(), line));
        }

        match text {
            "else" | "else:" => self.open_else(line),
            "endif" => self.close_block("endif", "if", line),
            "endwhile" => self.close_block("endwhile", "while", line),
            "end" => self.close_function(line),
            _ => self.statement(text, line),
        }
    }

    /// A new header implicitly seals the function still open
    fn open_function(&mut self, function: Function) -> Result<()> {
        if let Some(open) = self.current.take() {
            if let Some(block) = self.blocks.last() {
                return Err(block.unclosed());
            }
            self.seal(open);
        }
        self.current = Some(function);
        Ok(())
    }

    fn seal(&mut self, function: Function) {
        tracing::debug!(
            name = %function.name,
            params = function.params.len(),
            statements = function.body.len(),
            "function registered"
        );
        self.functions.push(function);
    }

    fn close_function(&mut self, line: usize) -> Result<()> {
        let Some(function) = self.current.take() else {
            return Err(ParseError::Unmatched {
                marker: "end",
                opener: "function",
                line,
            });
        };
        if let Some(block) = self.blocks.last() {
            return Err(block.unclosed());
        }
        self.seal(function);
        Ok(())
    }

    fn open_else(&mut self, line: usize) -> Result<()> {
        match self.blocks.last_mut() {
            Some(OpenBlock::If { else_branch, .. }) if else_branch.is_none() => {
                *else_branch = Some(Vec::new());
                Ok(())
            }
            Some(OpenBlock::If { .. }) => {
                Err(ParseError::syntax("`if` already has an `else` branch", line))
            }
            _ => Err(ParseError::Unmatched {
                marker: "else",
                opener: "if",
                line,
            }),
        }
    }

    fn close_block(&mut self, marker: &'static str, opener: &'static str, line: usize) -> Result<()> {
        match self.blocks.pop() {
            Some(block) if block.opener() == opener => self.push(block.into_stmt(), line),
            _ => Err(ParseError::Unmatched {
                marker,
                opener,
                line,
            }),
        }
    }

    fn statement(&mut self, text: &str, line: usize) -> Result<()> {
        if self.current.is_none() {
            tracing::warn!(line, statement = text, "ignoring statement outside of a function");
            return Ok(());
        }

        match parse_statement(text, line)? {
            Stmt::If { cond, .. } => self.blocks.push(OpenBlock::If {
                cond,
                line,
                then_branch: Vec::new(),
                else_branch: None,
            }),
            Stmt::While { cond, .. } => self.blocks.push(OpenBlock::While {
                cond,
                line,
                body: Vec::new(),
            }),
            stmt => self.push(Located::new(stmt, line), line)?,
        }
        Ok(())
    }

    /// Append at the innermost open block, else at the function body
    fn push(&mut self, stmt: Located<Stmt>, line: usize) -> Result<()> {
        if let Some(block) = self.blocks.last_mut() {
            block.target().push(stmt);
            return Ok(());
        }
        match self.current.as_mut() {
            Some(function) => {
                function.body.push(stmt);
                Ok(())
            }
            None => Err(ParseError::syntax("statement outside of a function", line)),
        }
    }

    fn finish(mut self) -> Result<Program> {
        if let Some(block) = self.blocks.last() {
            return Err(block.unclosed());
        }
        if let Some(function) = self.current.take() {
            return Err(ParseError::UnterminatedFunction {
                name: function.name,
                line: function.line,
            });
        }
        Ok(Program {
            functions: self.functions,
        })
    }
}

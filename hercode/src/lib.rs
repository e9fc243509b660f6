//! HerCode Interpreter Library
//!
//! A small line-oriented scripting language: functions, an entry block,
//! `if`/`while` blocks closed by keywords, and a tree-walking interpreter.

pub mod ast;
pub mod error;
pub mod interp;
pub mod parser;
pub mod util;

pub use error::{ParseError, Result};
pub use interp::{Interpreter, Value};

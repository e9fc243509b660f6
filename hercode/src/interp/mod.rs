//! Tree-walking interpreter
//!
//! Executes a parsed program against a chain of execution contexts with
//! dynamic scoping: a called function sees the variables of its caller.

pub mod builtins;
mod context;
mod error;
mod eval;
mod value;

pub use context::{ContextId, Contexts};
pub use error::{ErrorKind, ExecError, ExecResult, RuntimeError};
pub use eval::{Config, Execution, Interpreter};
pub use value::Value;

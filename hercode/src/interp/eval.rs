//! Statement executor and expression evaluator

use super::builtins;
use super::context::{ContextId, Contexts};
use super::error::{ExecError, ExecResult, RuntimeError};
use super::value::Value;
use crate::ast::{BinOp, Block, Expr, Function, Located, Program, Stmt, ENTRY_POINT};
use crate::util::suggest;
use std::cmp::Ordering;
use std::io::{self, Stdout, Write};
use std::rc::Rc;

/// Stack growth parameters for deep recursion
const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

/// Interpreter settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Nested user-function calls allowed before execution aborts
    pub max_call_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_call_depth: 10_000,
        }
    }
}

/// Outcome of running the entry function: one result per top-level statement
#[derive(Debug)]
pub struct Execution {
    results: Vec<ExecResult<Value>>,
}

impl Execution {
    pub fn results(&self) -> &[ExecResult<Value>] {
        &self.results
    }

    /// Values of the statements that completed
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.results.iter().filter_map(|r| r.as_ref().ok())
    }

    /// In-band errors produced by completed statements
    pub fn runtime_errors(&self) -> impl Iterator<Item = &RuntimeError> {
        self.values().filter_map(Value::as_error)
    }

    /// Statements that aborted
    pub fn fatal_errors(&self) -> impl Iterator<Item = &ExecError> {
        self.results.iter().filter_map(|r| r.as_ref().err())
    }

    /// Every error message, in statement order
    pub fn errors(&self) -> Vec<String> {
        self.results
            .iter()
            .filter_map(|r| match r {
                Ok(Value::Error(e)) => Some(e.to_string()),
                Ok(_) => None,
                Err(e) => Some(e.to_string()),
            })
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.runtime_errors().next().is_none() && self.fatal_errors().next().is_none()
    }
}

/// The interpreter
///
/// Owns the context arena and the stream `say` writes to. Functions are
/// registered by [`Interpreter::parse`] or [`Interpreter::load`] and run by
/// [`Interpreter::execute`].
pub struct Interpreter<W: Write = Stdout> {
    contexts: Contexts,
    out: W,
    config: Config,
    /// Current user-function call depth
    depth: usize,
}

impl Interpreter<Stdout> {
    /// Create an interpreter that prints to standard output
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    /// Create an interpreter that prints to `out`
    pub fn with_output(out: W) -> Self {
        Interpreter {
            contexts: Contexts::new(),
            out,
            config: Config::default(),
            depth: 0,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The output stream
    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Parse `source` and register its functions, replacing any loaded program.
    /// On error nothing is replaced.
    pub fn parse(&mut self, source: &str) -> crate::Result<()> {
        let program = crate::parser::parse(source)?;
        self.load(program);
        Ok(())
    }

    /// Register every function of an already parsed program
    pub fn load(&mut self, program: Program) {
        self.contexts = Contexts::new();
        for function in program.functions {
            tracing::debug!(name = %function.name, params = ?function.params, "registering function");
            self.contexts.register_function(function);
        }
    }

    /// Registered functions, sorted by name
    pub fn functions(&self) -> Vec<Rc<Function>> {
        self.contexts.functions()
    }

    /// Signature and rendered body of every registered function
    pub fn dump_functions(&self) -> String {
        self.functions()
            .iter()
            .map(|function| format!("{}\n{function}", function.signature()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// A variable of the global context
    pub fn global(&self, name: &str) -> Option<Value> {
        self.contexts.resolve_variable(ContextId::GLOBAL, name)
    }

    /// Run the top-level statements of `start` in the global context.
    ///
    /// Every statement runs even when an earlier one failed; its result is
    /// recorded in order. Only a missing entry function fails the whole run.
    pub fn execute(&mut self) -> ExecResult<Execution> {
        let entry = self
            .contexts
            .resolve_function(ContextId::GLOBAL, ENTRY_POINT)
            .ok_or(ExecError::MissingEntry)?;
        tracing::debug!(statements = entry.body.len(), "executing entry function");

        let mut results = Vec::with_capacity(entry.body.len());
        for stmt in &entry.body {
            let result = self.exec(stmt, ContextId::GLOBAL);
            if let Err(e) = &result {
                tracing::warn!(line = stmt.line, error = %e, "statement aborted");
            }
            results.push(result);
        }
        Ok(Execution { results })
    }

    // ============================================
    // Statements
    // ============================================

    fn exec(&mut self, stmt: &Located<Stmt>, ctx: ContextId) -> ExecResult<Value> {
        let line = stmt.line;
        let value = match &stmt.node {
            Stmt::Assign { name, value } | Stmt::Declare { name, value } => {
                let value = self.eval(value, ctx)?;
                if value.is_error() {
                    value
                } else {
                    self.contexts.bind_variable(ctx, name.as_str(), value);
                    Value::Void
                }
            }
            Stmt::Say(expr) => {
                let value = locate(self.eval(expr, ctx)?, line);
                match &value {
                    Value::Error(e) => writeln!(self.out, "error: {e}")?,
                    other => writeln!(self.out, "{other}")?,
                }
                Value::Void
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => match self.condition(cond, "if", line, ctx)? {
                Ok(true) => self.exec_block(then_branch, ctx)?,
                Ok(false) => match else_branch {
                    Some(block) => self.exec_block(block, ctx)?,
                    None => Value::Void,
                },
                Err(error) => error,
            },
            Stmt::While { cond, body } => loop {
                match self.condition(cond, "while", line, ctx)? {
                    Ok(true) => {
                        let value = self.exec_block(body, ctx)?;
                        if !value.is_void() {
                            break value;
                        }
                    }
                    Ok(false) => break Value::Void,
                    Err(error) => break error,
                }
            },
            Stmt::Return(expr) => self.eval(expr, ctx)?,
            Stmt::Call { func, args } => self.call(func, args, ctx)?,
        };
        Ok(locate(value, line))
    }

    /// First non-void statement result, or void
    fn exec_block(&mut self, block: &Block, ctx: ContextId) -> ExecResult<Value> {
        for stmt in block {
            let value = self.exec(stmt, ctx)?;
            if !value.is_void() {
                return Ok(value);
            }
        }
        Ok(Value::Void)
    }

    /// Evaluate a condition to a bool, or to the error value that ends the construct
    fn condition(
        &mut self,
        cond: &Expr,
        construct: &str,
        line: usize,
        ctx: ContextId,
    ) -> ExecResult<Result<bool, Value>> {
        let value = self.eval(cond, ctx)?;
        if let Some(b) = value.as_bool() {
            return Ok(Ok(b));
        }
        Ok(Err(if value.is_error() {
            value
        } else {
            RuntimeError::invalid_condition(construct, value.type_name())
                .at_line(line)
                .into()
        }))
    }

    // ============================================
    // Expressions
    // ============================================

    /// Evaluate an expression with automatic stack growth for deep recursion
    fn eval(&mut self, expr: &Expr, ctx: ContextId) -> ExecResult<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_inner(expr, ctx))
    }

    fn eval_inner(&mut self, expr: &Expr, ctx: ContextId) -> ExecResult<Value> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Var(name) => Ok(match self.contexts.resolve_variable(ctx, name) {
                Some(value) => value,
                None => {
                    let suggestion = suggest(name, self.contexts.visible_variables(ctx));
                    RuntimeError::undefined_variable(name, suggestion).into()
                }
            }),
            Expr::Binary {
                left,
                op,
                right,
                line,
            } => self.eval_binary(left, *op, right, *line, ctx),
            Expr::Call { func, args } => self.call(func, args, ctx),
        }
    }

    fn eval_binary(
        &mut self,
        left: &Expr,
        op: BinOp,
        right: &Expr,
        line: usize,
        ctx: ContextId,
    ) -> ExecResult<Value> {
        if op == BinOp::Assign {
            let Expr::Var(name) = left else {
                return Ok(RuntimeError::invalid_assignment(&left.to_string())
                    .at_line(line)
                    .into());
            };
            let value = self.eval(right, ctx)?;
            if !value.is_error() {
                self.contexts.bind_variable(ctx, name.as_str(), value.clone());
            }
            return Ok(value);
        }

        let lhs = self.eval(left, ctx)?;
        if lhs.is_error() {
            return Ok(lhs);
        }
        let rhs = self.eval(right, ctx)?;
        if rhs.is_error() {
            return Ok(rhs);
        }

        Ok(apply_binary(op, &lhs, &rhs).unwrap_or_else(|e| e.at_line(line).into()))
    }

    // ============================================
    // Calls
    // ============================================

    fn call(&mut self, func: &str, args: &[Expr], ctx: ContextId) -> ExecResult<Value> {
        if let Some(builtin) = builtins::lookup(func) {
            return Ok(match self.eval_args(args, ctx)? {
                Ok(values) => builtin(&values),
                Err(error) => error,
            });
        }

        let Some(function) = self.contexts.resolve_function(ctx, func) else {
            let mut candidates = self.contexts.visible_functions(ctx);
            candidates.extend(builtins::NAMES);
            return Ok(RuntimeError::undefined_function(func, suggest(func, candidates)).into());
        };

        match self.eval_args(args, ctx)? {
            Ok(values) => self.invoke(&function, values, ctx),
            Err(error) => Ok(error),
        }
    }

    /// Evaluate arguments left to right, stopping at the first error value
    fn eval_args(&mut self, args: &[Expr], ctx: ContextId) -> ExecResult<Result<Vec<Value>, Value>> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            let value = self.eval(arg, ctx)?;
            if value.is_error() {
                return Ok(Err(value));
            }
            values.push(value);
        }
        Ok(Ok(values))
    }

    /// Run a user function in a child of the caller's context
    fn invoke(&mut self, function: &Function, args: Vec<Value>, caller: ContextId) -> ExecResult<Value> {
        if self.depth >= self.config.max_call_depth {
            return Err(ExecError::StackOverflow {
                limit: self.config.max_call_depth,
            });
        }
        self.depth += 1;
        tracing::trace!(function = %function.name, depth = self.depth, "call");

        let frame = self.contexts.push_child(caller);
        // Missing arguments are void; extra ones are dropped
        let mut args = args.into_iter();
        for param in &function.params {
            let value = args.next().unwrap_or(Value::Void);
            self.contexts.bind_variable(frame, param.as_str(), value);
        }

        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.exec_block(&function.body, frame)
        });

        self.contexts.pop(frame);
        self.depth -= 1;
        result
    }
}

/// Attach `line` to an error value that does not know its line yet
fn locate(value: Value, line: usize) -> Value {
    match value {
        Value::Error(e) if e.line.is_none() => Value::Error(e.at_line(line)),
        other => other,
    }
}

/// Apply a non-assignment operator to two evaluated operands
fn apply_binary(op: BinOp, lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    let mismatch = || RuntimeError::type_error(lhs.type_name(), op.symbol(), rhs.type_name());

    match op {
        BinOp::Assign => Err(RuntimeError::invalid_assignment(&lhs.to_string())),
        BinOp::Add => match (lhs, rhs) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::Str(_), _) | (_, Value::Str(_)) => Ok(Value::Str(format!("{lhs}{rhs}"))),
            _ => Err(mismatch()),
        },
        BinOp::Eq => Ok(Value::Bool(lhs.loosely_equals(rhs))),
        BinOp::Ne => Ok(Value::Bool(!lhs.loosely_equals(rhs))),
        _ if op.is_ordering() => {
            let ordering = match (lhs, rhs) {
                (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
                (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
                _ => return Err(mismatch()),
            };
            Ok(Value::Bool(compare(op, ordering)))
        }
        _ => match (lhs.as_number(), rhs.as_number()) {
            (Some(a), Some(b)) => arithmetic(op, a, b),
            _ => Err(mismatch()),
        },
    }
}

fn arithmetic(op: BinOp, a: f64, b: f64) -> Result<Value, RuntimeError> {
    match op {
        BinOp::Sub => Ok(Value::Number(a - b)),
        BinOp::Mul => Ok(Value::Number(a * b)),
        BinOp::Div if b == 0.0 => Err(RuntimeError::division_by_zero()),
        BinOp::Div => Ok(Value::Number(a / b)),
        BinOp::Mod => {
            // Integer remainder of the truncated operands
            let (a, b) = (a.trunc() as i64, b.trunc() as i64);
            if b == 0 {
                return Err(RuntimeError::division_by_zero());
            }
            Ok(Value::Number(a.wrapping_rem(b) as f64))
        }
        _ => Err(RuntimeError::type_error("number", op.symbol(), "number")),
    }
}

/// NaN compares false under every ordering
fn compare(op: BinOp, ordering: Option<Ordering>) -> bool {
    match op {
        BinOp::Lt => ordering == Some(Ordering::Less),
        BinOp::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        BinOp::Gt => ordering == Some(Ordering::Greater),
        BinOp::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::ErrorKind;

    fn interpreter(source: &str) -> Interpreter<Vec<u8>> {
        let mut interp = Interpreter::with_output(Vec::new());
        interp.parse(source).expect("Parse should succeed");
        interp
    }

    /// Run `source` and return the execution with everything `say` printed
    fn run(source: &str) -> (Execution, String) {
        let mut interp = interpreter(source);
        let execution = interp.execute().expect("start should exist");
        let output = String::from_utf8(interp.into_output()).expect("utf-8 output");
        (execution, output)
    }

    fn output(source: &str) -> String {
        run(source).1
    }

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    // ============================================
    // Operators
    // ============================================

    #[test]
    fn test_apply_arithmetic() {
        assert_eq!(apply_binary(BinOp::Add, &num(2.0), &num(3.0)), Ok(num(5.0)));
        assert_eq!(apply_binary(BinOp::Sub, &num(2.0), &num(3.0)), Ok(num(-1.0)));
        assert_eq!(apply_binary(BinOp::Mul, &num(2.0), &num(3.0)), Ok(num(6.0)));
        assert_eq!(apply_binary(BinOp::Div, &num(3.0), &num(2.0)), Ok(num(1.5)));
    }

    #[test]
    fn test_apply_modulo_truncates() {
        assert_eq!(apply_binary(BinOp::Mod, &num(7.9), &num(3.2)), Ok(num(1.0)));
        assert_eq!(apply_binary(BinOp::Mod, &num(-7.0), &num(3.0)), Ok(num(-1.0)));
        let err = apply_binary(BinOp::Mod, &num(5.0), &num(0.4)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
    }

    #[test]
    fn test_apply_division_by_zero() {
        let err = apply_binary(BinOp::Div, &num(10.0), &num(0.0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
    }

    #[test]
    fn test_apply_concatenation() {
        let hi = Value::from("hi ");
        assert_eq!(apply_binary(BinOp::Add, &hi, &num(2.0)), Ok(Value::from("hi 2.000000")));
        assert_eq!(
            apply_binary(BinOp::Add, &Value::Bool(true), &Value::from("!")),
            Ok(Value::from("true!"))
        );
    }

    #[test]
    fn test_apply_type_errors() {
        let err = apply_binary(BinOp::Add, &Value::Bool(true), &num(1.0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
        assert_eq!(err.message, "type mismatch: bool + number");
        assert!(apply_binary(BinOp::Sub, &Value::from("a"), &num(1.0)).is_err());
        assert!(apply_binary(BinOp::Lt, &Value::from("a"), &num(1.0)).is_err());
        assert!(apply_binary(BinOp::Gt, &Value::Bool(true), &Value::Bool(false)).is_err());
    }

    #[test]
    fn test_apply_equality() {
        assert_eq!(apply_binary(BinOp::Eq, &num(1.0), &num(1.0)), Ok(Value::Bool(true)));
        assert_eq!(apply_binary(BinOp::Eq, &num(1.0), &Value::from("1")), Ok(Value::Bool(false)));
        assert_eq!(apply_binary(BinOp::Ne, &num(1.0), &Value::from("1")), Ok(Value::Bool(true)));
        assert_eq!(
            apply_binary(BinOp::Eq, &Value::Void, &Value::Void),
            Ok(Value::Bool(false))
        );
    }

    #[test]
    fn test_apply_ordering() {
        assert_eq!(apply_binary(BinOp::Lt, &num(1.0), &num(2.0)), Ok(Value::Bool(true)));
        assert_eq!(apply_binary(BinOp::Ge, &num(2.0), &num(2.0)), Ok(Value::Bool(true)));
        assert_eq!(
            apply_binary(BinOp::Lt, &Value::from("abc"), &Value::from("abd")),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            apply_binary(BinOp::Le, &num(f64::NAN), &num(1.0)),
            Ok(Value::Bool(false))
        );
    }

    // ============================================
    // Assignment operator
    // ============================================

    #[test]
    fn test_assign_operator_binds_and_yields() {
        let mut interp = Interpreter::with_output(Vec::new());
        let expr = Expr::binary(Expr::var("x"), BinOp::Assign, Expr::number(3.0), 1);
        assert_eq!(interp.eval(&expr, ContextId::GLOBAL).unwrap(), num(3.0));
        assert_eq!(interp.global("x"), Some(num(3.0)));
    }

    #[test]
    fn test_assign_operator_requires_variable() {
        let mut interp = Interpreter::with_output(Vec::new());
        let expr = Expr::binary(Expr::number(1.0), BinOp::Assign, Expr::number(3.0), 4);
        let value = interp.eval(&expr, ContextId::GLOBAL).unwrap();
        let err = value.as_error().expect("error value");
        assert_eq!(err.kind, ErrorKind::InvalidAssignment);
        assert_eq!(err.line, Some(4));
    }

    #[test]
    fn test_assign_operator_propagates_error() {
        let mut interp = Interpreter::with_output(Vec::new());
        let expr = Expr::binary(Expr::var("x"), BinOp::Assign, Expr::var("missing"), 1);
        assert!(interp.eval(&expr, ContextId::GLOBAL).unwrap().is_error());
        assert_eq!(interp.global("x"), None);
    }

    // ============================================
    // Statements
    // ============================================

    #[test]
    fn test_say_renders_values() {
        assert_eq!(
            output("start:\n    say 5\n    say \"hi\"\n    say true\nend\n"),
            "5.000000\nhi\ntrue\n"
        );
    }

    #[test]
    fn test_declare_and_assign() {
        assert_eq!(
            output("start:\n    var x = 2\n    x = x + 3\n    say x\nend\n"),
            "5.000000\n"
        );
    }

    #[test]
    fn test_globals_after_execute() {
        let mut interp = interpreter("start:\n    var x = 4\n    var s = \"a\" + \"b\"\nend\n");
        interp.execute().unwrap();
        assert_eq!(interp.global("x"), Some(num(4.0)));
        assert_eq!(interp.global("s"), Some(Value::from("ab")));
    }

    #[test]
    fn test_say_error_value() {
        let (execution, out) = run("start:\n    say 10 / 0\nend\n");
        assert_eq!(out, "error: line 2: division by zero\n");
        // `say` consumes the error and yields void
        assert!(execution.is_success());
    }

    #[test]
    fn test_modulo_by_zero_statement() {
        let (execution, _) = run("start:\n    var r = 10 % 0\nend\n");
        let errors: Vec<_> = execution.runtime_errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::DivisionByZero);
        assert_eq!(errors[0].line, Some(2));
    }

    #[test]
    fn test_error_does_not_bind() {
        let mut interp = interpreter("start:\n    var x = 1\n    x = 1 / 0\nend\n");
        interp.execute().unwrap();
        assert_eq!(interp.global("x"), Some(num(1.0)));
    }

    #[test]
    fn test_undefined_variable_suggestion() {
        let (execution, _) = run("start:\n    var count = 1\n    var y = coutn + 1\nend\n");
        let errors = execution.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("undefined variable: coutn"));
        assert!(errors[0].contains("did you mean `count`?"));
        assert!(errors[0].starts_with("line 3: "));
    }

    #[test]
    fn test_if_else() {
        let source = "start:
    var x = 5
    if x > 3:
        say \"big\"
    else
        say \"small\"
    endif
    if x > 10:
        say \"huge\"
    endif
end
";
        assert_eq!(output(source), "big\n");
    }

    #[test]
    fn test_while_loop() {
        let source = "start:
    var i = 0
    while i < 3:
        say i
        i = i + 1
    endwhile
end
";
        assert_eq!(output(source), "0.000000\n1.000000\n2.000000\n");
    }

    #[test]
    fn test_non_bool_condition() {
        let (execution, out) = run("start:\n    if 1:\n        say \"x\"\n    endif\nend\n");
        assert_eq!(out, "");
        let errors: Vec<_> = execution.runtime_errors().collect();
        assert_eq!(errors[0].kind, ErrorKind::InvalidCondition);
        assert_eq!(errors[0].line, Some(2));

        let (execution, _) = run("start:\n    while \"yes\":\n    endwhile\nend\n");
        assert!(!execution.is_success());
    }

    #[test]
    fn test_statements_after_error_still_run() {
        let (execution, out) = run("start:\n    var a = nope\n    say \"after\"\nend\n");
        assert_eq!(out, "after\n");
        assert_eq!(execution.results().len(), 2);
        assert!(!execution.is_success());
    }

    // ============================================
    // Functions and scoping
    // ============================================

    #[test]
    fn test_function_return() {
        let source = "function add a b:
    return a + b
end
start:
    say add(2, 3)
end
";
        assert_eq!(output(source), "5.000000\n");
    }

    #[test]
    fn test_recursion() {
        let source = "function fact n:
    if n <= 1:
        return 1
    endif
    return n * fact(n - 1)
end
start:
    say fact(5)
end
";
        assert_eq!(output(source), "120.000000\n");
    }

    #[test]
    fn test_missing_arguments_are_void_and_extra_ignored() {
        let source = "function second a b:
    return b
end
function first a:
    return a
end
start:
    say second(1)
    say first(1, 2, 3)
end
";
        assert_eq!(output(source), "\n1.000000\n");
    }

    #[test]
    fn test_dynamic_scope_reads_caller() {
        let source = "function show:
    say x
end
function outer:
    var x = 2
    show()
end
start:
    var x = 1
    outer()
    show()
end
";
        assert_eq!(output(source), "2.000000\n1.000000\n");
    }

    #[test]
    fn test_assignment_in_callee_shadows() {
        let source = "function setx:
    x = 5
    say x
end
start:
    var x = 1
    setx()
    say x
end
";
        assert_eq!(output(source), "5.000000\n1.000000\n");
    }

    #[test]
    fn test_bare_call_result_passes_up() {
        let source = "function inner:
    return 1
end
function outer:
    inner()
    say \"unreached\"
end
start:
    say outer()
end
";
        assert_eq!(output(source), "1.000000\n");
    }

    #[test]
    fn test_error_in_function_body_is_returned() {
        let source = "function bad:
    var x = 1 / 0
    say \"unreached\"
end
start:
    say bad()
end
";
        assert_eq!(output(source), "error: line 2: division by zero\n");
    }

    #[test]
    fn test_undefined_function_skips_arguments() {
        let source = "function noisy:
    say \"evaluated\"
    return 1
end
start:
    foo(noisy())
end
";
        let (execution, out) = run(source);
        assert_eq!(out, "");
        let errors = execution.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("foo"));
    }

    #[test]
    fn test_undefined_function_suggests_builtin() {
        let (execution, _) = run("start:\n    say lenn(\"abc\")\n    var n = lenn(\"abc\")\nend\n");
        let errors = execution.errors();
        assert!(errors[0].contains("did you mean `len`?"));
    }

    #[test]
    fn test_argument_error_short_circuits() {
        let source = "function noisy:
    say \"evaluated\"
    return 1
end
start:
    var r = substr(missing, noisy())
end
";
        let (execution, out) = run(source);
        assert_eq!(out, "");
        assert_eq!(
            execution.runtime_errors().next().map(|e| e.kind),
            Some(ErrorKind::UndefinedVariable)
        );
    }

    #[test]
    fn test_builtins_from_source() {
        let source = "start:
    say substr(\"hello\", 1, 3)
    say len(\"hello\")
    say sqrt(16)
end
";
        assert_eq!(output(source), "el\n5.000000\n4.000000\n");
    }

    #[test]
    fn test_recursion_limit_is_fatal() {
        let source = "function forever:
    forever()
end
start:
    forever()
    say \"after\"
end
";
        let mut interp = interpreter(source).with_config(Config { max_call_depth: 50 });
        let execution = interp.execute().unwrap();
        assert!(matches!(
            execution.results()[0],
            Err(ExecError::StackOverflow { limit: 50 })
        ));
        assert_eq!(execution.fatal_errors().count(), 1);
        assert_eq!(String::from_utf8_lossy(interp.output()), "after\n");
        assert_eq!(interp.depth, 0);
        assert_eq!(interp.contexts.depth(), 1);
    }

    #[test]
    fn test_missing_entry() {
        let mut interp = interpreter("function f:\n    say 1\nend\n");
        assert!(matches!(interp.execute(), Err(ExecError::MissingEntry)));
    }

    #[test]
    fn test_execute_twice() {
        let mut interp = interpreter("start:\n    say \"again\"\nend\n");
        interp.execute().unwrap();
        interp.execute().unwrap();
        assert_eq!(String::from_utf8_lossy(interp.output()), "again\nagain\n");
    }

    #[test]
    fn test_parse_failure_keeps_previous_program() {
        let mut interp = interpreter("start:\n    say 1\nend\n");
        assert!(interp.parse("start:\n    if x:\nend\n").is_err());
        assert_eq!(interp.functions().len(), 1);
    }

    #[test]
    fn test_dump_functions_sorted() {
        let interp = interpreter("start:\n    greet()\nend\nfunction greet:\n    say \"hi\"\nend\n");
        let dump = interp.dump_functions();
        let greet = dump.find("greet()\nfunction greet:").expect("greet dumped");
        let start = dump.find("start()\nstart:").expect("start dumped");
        assert!(greet < start);
        assert!(dump.contains("    say \"hi\"\n"));
    }
}

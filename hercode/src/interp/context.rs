//! Execution contexts
//!
//! Contexts live in an arena and refer to their parent by index. Frame 0 is
//! the global context and lives as long as the interpreter; every function
//! call pushes a child frame and pops it when the call returns, so frames
//! are freed in strict LIFO order.
//!
//! Lookup walks the parent chain outward (nearest wins). Binding always
//! writes into the frame it is given and never touches an ancestor, so an
//! assignment inside a call shadows an outer name instead of mutating it.

use super::Value;
use crate::ast::Function;
use std::collections::HashMap;
use std::rc::Rc;

/// Index of a frame in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(usize);

impl ContextId {
    /// The global context
    pub const GLOBAL: ContextId = ContextId(0);
}

#[derive(Debug, Default)]
struct Frame {
    variables: HashMap<String, Value>,
    functions: HashMap<String, Rc<Function>>,
    parent: Option<ContextId>,
}

/// Arena of parent-linked scope frames
#[derive(Debug)]
pub struct Contexts {
    frames: Vec<Frame>,
}

impl Contexts {
    /// Create an arena holding only the global context
    pub fn new() -> Self {
        Contexts {
            frames: vec![Frame::default()],
        }
    }

    /// Push a new frame whose lookups fall through to `parent`
    pub fn push_child(&mut self, parent: ContextId) -> ContextId {
        self.frames.push(Frame {
            parent: Some(parent),
            ..Frame::default()
        });
        ContextId(self.frames.len() - 1)
    }

    /// Free `id` and every frame pushed after it. The global frame is never freed.
    pub fn pop(&mut self, id: ContextId) {
        debug_assert_eq!(id.0 + 1, self.frames.len(), "frames must be popped in LIFO order");
        if id != ContextId::GLOBAL {
            self.frames.truncate(id.0);
        }
    }

    /// Number of live frames, including the global one
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    fn chain(&self, id: ContextId) -> impl Iterator<Item = &Frame> {
        std::iter::successors(self.frames.get(id.0), |frame| {
            frame.parent.and_then(|p| self.frames.get(p.0))
        })
    }

    /// Look up a variable, searching from `id` outward
    pub fn resolve_variable(&self, id: ContextId, name: &str) -> Option<Value> {
        self.chain(id)
            .find_map(|frame| frame.variables.get(name))
            .cloned()
    }

    /// Bind a variable in `id` itself, shadowing any outer binding
    pub fn bind_variable(&mut self, id: ContextId, name: impl Into<String>, value: Value) {
        if let Some(frame) = self.frames.get_mut(id.0) {
            frame.variables.insert(name.into(), value);
        }
    }

    /// Look up a function, searching from `id` outward
    pub fn resolve_function(&self, id: ContextId, name: &str) -> Option<Rc<Function>> {
        self.chain(id)
            .find_map(|frame| frame.functions.get(name))
            .cloned()
    }

    /// Register a function in the global table; a later definition replaces an earlier one
    pub fn register_function(&mut self, function: Function) {
        self.frames[0]
            .functions
            .insert(function.name.clone(), Rc::new(function));
    }

    /// Every globally registered function, sorted by name
    pub fn functions(&self) -> Vec<Rc<Function>> {
        let mut functions: Vec<_> = self.frames[0].functions.values().cloned().collect();
        functions.sort_by(|a, b| a.name.cmp(&b.name));
        functions
    }

    /// Variable names visible from `id` (for suggestions)
    pub fn visible_variables(&self, id: ContextId) -> Vec<&str> {
        self.chain(id)
            .flat_map(|frame| frame.variables.keys().map(String::as_str))
            .collect()
    }

    /// Function names visible from `id` (for suggestions)
    pub fn visible_functions(&self, id: ContextId) -> Vec<&str> {
        self.chain(id)
            .flat_map(|frame| frame.functions.keys().map(String::as_str))
            .collect()
    }
}

impl Default for Contexts {
    fn default() -> Self {
        Self::new()
    }
}

//! Run state: the memory table and the environment stack.
//!
//! Memory locations come from a counter owned by the run's own table,
//! so separate runs are fully independent. A location is never reused
//! within one run.
//!
//! Frames map names to bindings. Entering a block pushes a *copy* of
//! the current frame (so enclosing names stay visible and writes still
//! go through the shared locations); entering a call pushes a copy of
//! the *global* frame plus the parameter bindings, so caller locals
//! are not visible inside the callee. Lookup consults only the top
//! frame.

use std::collections::HashMap;

use crate::fault::Fault;
use crobots_ast::ast::Stmt;
use crobots_ast::Name;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location(usize);

/// Monotonically growing location → value table.
#[derive(Debug, Default)]
pub struct MemoryTable {
    cells: Vec<i64>,
}

impl MemoryTable {
    pub fn alloc(&mut self, value: i64) -> Location {
        let loc = Location(self.cells.len());
        self.cells.push(value);
        loc
    }

    pub fn get(&self, loc: Location) -> i64 {
        self.cells[loc.0]
    }

    pub fn set(&mut self, loc: Location, value: i64) {
        self.cells[loc.0] = value;
    }

    /// Number of locations issued so far.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuncId(usize);

/// A user function entry. The arena single-owns all entries for the
/// run's lifetime; bindings refer to them by id.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: Name,
    pub params: Vec<Name>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Var(Location),
    Func(FuncId),
}

pub type Frame = HashMap<Name, Binding>;

/// Everything one execution mutates. Created fresh per run, discarded
/// when the run halts or faults.
#[derive(Debug)]
pub struct RunState {
    pub memory: MemoryTable,
    frames: Vec<Frame>,
    functions: Vec<Function>,
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

impl RunState {
    pub fn new() -> Self {
        Self {
            memory: MemoryTable::default(),
            frames: vec![Frame::new()],
            functions: Vec::new(),
        }
    }

    pub fn frame_depth(&self) -> usize {
        self.frames.len()
    }

    fn top(&self) -> &Frame {
        self.frames.last().expect("frame stack never empty")
    }

    fn top_mut(&mut self) -> &mut Frame {
        self.frames.last_mut().expect("frame stack never empty")
    }

    /// Enter a block: the new frame starts as a copy of the current
    /// one.
    pub fn push_block_frame(&mut self) {
        let copy = self.top().clone();
        self.frames.push(copy);
    }

    /// Enter a call: the new frame starts as a copy of the global
    /// frame only.
    pub fn push_call_frame(&mut self) {
        let copy = self.frames[0].clone();
        self.frames.push(copy);
    }

    pub fn pop_frame(&mut self) {
        debug_assert!(self.frames.len() > 1, "cannot pop the global frame");
        self.frames.pop();
    }

    /// Bind a fresh location in the top frame.
    pub fn define_var(&mut self, name: Name, value: i64) -> Location {
        let loc = self.memory.alloc(value);
        self.top_mut().insert(name, Binding::Var(loc));
        loc
    }

    pub fn define_func(&mut self, name: Name, params: Vec<Name>, body: Vec<Stmt>) -> FuncId {
        let id = FuncId(self.functions.len());
        self.functions.push(Function {
            name: name.clone(),
            params,
            body,
        });
        self.top_mut().insert(name, Binding::Func(id));
        id
    }

    pub fn lookup(&self, name: &str) -> Option<Binding> {
        self.top().get(name).copied()
    }

    pub fn read_var(&self, name: &Name) -> Result<i64, Fault> {
        match self.lookup(name) {
            Some(Binding::Var(loc)) => Ok(self.memory.get(loc)),
            Some(Binding::Func(_)) => Err(Fault::NotAVariable(name.clone())),
            None => Err(Fault::UndefinedVariable(name.clone())),
        }
    }

    pub fn write_var(&mut self, name: &Name, value: i64) -> Result<(), Fault> {
        match self.lookup(name) {
            Some(Binding::Var(loc)) => {
                self.memory.set(loc, value);
                Ok(())
            }
            Some(Binding::Func(_)) => Err(Fault::NotAVariable(name.clone())),
            None => Err(Fault::UndefinedVariable(name.clone())),
        }
    }

    /// Resolve a callee name to its function entry.
    pub fn function(&self, name: &Name) -> Result<&Function, Fault> {
        match self.lookup(name) {
            Some(Binding::Func(id)) => Ok(&self.functions[id.0]),
            _ => Err(Fault::NotAFunction(name.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locations_are_never_reused() {
        let mut state = RunState::new();
        let a = state.define_var(Name::from("a"), 1);
        state.push_block_frame();
        let b = state.define_var(Name::from("b"), 2);
        state.pop_frame();
        let c = state.define_var(Name::from("c"), 3);
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(state.memory.len(), 3);
    }

    #[test]
    fn block_frame_shares_locations_with_the_outer_frame() {
        let mut state = RunState::new();
        state.define_var(Name::from("x"), 1);
        state.push_block_frame();
        state.write_var(&Name::from("x"), 9).unwrap();
        state.pop_frame();
        assert_eq!(state.read_var(&Name::from("x")).unwrap(), 9);
    }

    #[test]
    fn block_locals_disappear_on_pop() {
        let mut state = RunState::new();
        state.push_block_frame();
        state.define_var(Name::from("tmp"), 5);
        state.pop_frame();
        assert_eq!(
            state.read_var(&Name::from("tmp")),
            Err(Fault::UndefinedVariable(Name::from("tmp")))
        );
    }

    #[test]
    fn call_frame_copies_only_the_global_frame() {
        let mut state = RunState::new();
        state.define_var(Name::from("g"), 10);
        state.push_block_frame();
        state.define_var(Name::from("local"), 20);
        state.push_call_frame();
        assert_eq!(state.read_var(&Name::from("g")).unwrap(), 10);
        assert!(state.read_var(&Name::from("local")).is_err());
    }

    #[test]
    fn function_binding_is_not_a_variable() {
        let mut state = RunState::new();
        state.define_func(Name::from("f"), vec![], vec![]);
        assert_eq!(
            state.read_var(&Name::from("f")),
            Err(Fault::NotAVariable(Name::from("f")))
        );
        assert!(state.function(&Name::from("f")).is_ok());
    }
}

use std::cell::{Cell, RefCell};

use crate::{CallFrame, StackTrace, TarnError};

/// Default bound on evaluator recursion. Expression nesting and user-level
/// recursion both consume host stack; the counter turns an impending stack
/// overflow into a typed error instead.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Per-interpreter mutable state: the call stack for error traces and the
/// recursion depth counter.
pub struct EvalContext {
    pub call_stack: RefCell<Vec<CallFrame>>,
    pub eval_depth: Cell<usize>,
    pub max_depth: Cell<usize>,
}

impl EvalContext {
    pub fn new() -> Self {
        EvalContext {
            call_stack: RefCell::new(Vec::new()),
            eval_depth: Cell::new(0),
            max_depth: Cell::new(DEFAULT_MAX_DEPTH),
        }
    }

    pub fn set_max_depth(&self, limit: usize) {
        self.max_depth.set(limit);
    }

    /// Enter one evaluator recursion level. Fails once the depth limit is
    /// reached; the counter is only bumped on success.
    pub fn enter(&self) -> Result<(), TarnError> {
        let depth = self.eval_depth.get() + 1;
        if depth > self.max_depth.get() {
            return Err(TarnError::DepthExceeded(self.max_depth.get()));
        }
        self.eval_depth.set(depth);
        Ok(())
    }

    pub fn exit(&self) {
        self.eval_depth.set(self.eval_depth.get().saturating_sub(1));
    }

    pub fn push_call_frame(&self, frame: CallFrame) {
        self.call_stack.borrow_mut().push(frame);
    }

    pub fn call_stack_depth(&self) -> usize {
        self.call_stack.borrow().len()
    }

    pub fn truncate_call_stack(&self, depth: usize) {
        self.call_stack.borrow_mut().truncate(depth);
    }

    pub fn capture_stack_trace(&self) -> StackTrace {
        let stack = self.call_stack.borrow();
        StackTrace(stack.iter().rev().cloned().collect())
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}

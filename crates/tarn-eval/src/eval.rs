use std::rc::Rc;

use tarn_core::{resolve, suggest_similar, CallFrame, Closure, Env, EvalContext, TarnError, Value};

use crate::forms::{self, form_of};

pub type EvalResult = Result<Value, TarnError>;

/// The interpreter holds the global environment and evaluation state.
pub struct Interpreter {
    pub global_env: Rc<Env>,
    pub ctx: EvalContext,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        let env = Env::new();
        tarn_stdlib::register_globals(&env);
        Interpreter {
            global_env: Rc::new(env),
            ctx: EvalContext::new(),
        }
    }

    /// Evaluate an expression in a fresh child of the global environment.
    pub fn eval(&self, expr: &Value) -> EvalResult {
        let env = Env::with_parent(self.global_env.clone());
        eval(expr, &env, &self.ctx)
    }

    /// Evaluate in a caller-supplied environment. Safe to call once per
    /// independent environment (the module-layer entry point).
    pub fn eval_in(&self, expr: &Value, env: &Env) -> EvalResult {
        eval(expr, env, &self.ctx)
    }

    pub fn set_max_depth(&self, limit: usize) {
        self.ctx.set_max_depth(limit);
    }
}

/// Create an isolated module env: a fresh child of the root (global) env of
/// the given chain. An external module layer evaluates each module body in
/// one of these.
pub fn create_module_env(env: &Env) -> Env {
    let mut current = env.clone();
    loop {
        let parent = current.parent.clone();
        match parent {
            Some(p) => current = (*p).clone(),
            None => break,
        }
    }
    Env::with_parent(Rc::new(current))
}

/// The core eval function: evaluate an expression in an environment.
///
/// Direct recursion; call depth mirrors expression nesting plus user-level
/// recursion, bounded by the context's depth guard. The first error site
/// captures a call-stack trace once, and frames pushed below this entry are
/// truncated on the way out.
pub fn eval(expr: &Value, env: &Env, ctx: &EvalContext) -> EvalResult {
    ctx.enter()?;
    let entry_depth = ctx.call_stack_depth();
    let result = match eval_expr(expr, env, ctx) {
        Err(e) if e.stack_trace().is_none() => Err(e.with_stack_trace(ctx.capture_stack_trace())),
        other => other,
    };
    ctx.truncate_call_stack(entry_depth);
    ctx.exit();
    result
}

fn eval_expr(expr: &Value, env: &Env, ctx: &EvalContext) -> EvalResult {
    match expr {
        // Self-evaluating atoms.
        Value::Null | Value::Bool(_) | Value::Number(_) => Ok(expr.clone()),

        // Pre-evaluated values may re-enter eval (e.g. operands a host has
        // already computed); they stand for themselves.
        Value::Closure(_) | Value::NativeFn(_) | Value::Env(_) => Ok(expr.clone()),

        // A quoted string literal evaluates to its text with the delimiters
        // stripped exactly once; runtime strings pass through unchanged.
        Value::Str(s) => Ok(strip_quotes(s)),

        Value::Symbol(name) => {
            // Reserved tags are never variable references.
            if form_of(*name).is_some() {
                return Err(TarnError::UnimplementedForm(expr.to_string()));
            }
            lookup_with_hint(*name, env)
        }

        Value::List(items) => {
            if items.is_empty() {
                return Err(TarnError::UnimplementedForm(expr.to_string()));
            }
            if let Value::Symbol(head) = &items[0] {
                if let Some(form) = form_of(*head) {
                    return forms::eval_form(form, &items[1..], env, ctx);
                }
            }
            eval_application(items, env, ctx)
        }
    }
}

fn strip_quotes(s: &Rc<String>) -> Value {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        Value::string(&s[1..s.len() - 1])
    } else {
        Value::Str(s.clone())
    }
}

fn lookup_with_hint(name: tarn_core::Spur, env: &Env) -> EvalResult {
    match env.lookup(name) {
        Ok(value) => Ok(value),
        Err(err) => {
            let wanted = resolve(name);
            let visible = env.visible_names();
            let candidates: Vec<&str> = visible.iter().map(String::as_str).collect();
            match suggest_similar(&wanted, &candidates) {
                Some(better) => Err(err.with_hint(format!("did you mean '{better}'?"))),
                None => Err(err),
            }
        }
    }
}

fn eval_application(items: &[Value], env: &Env, ctx: &EvalContext) -> EvalResult {
    let callee = eval(&items[0], env, ctx)?;
    let mut args = Vec::with_capacity(items.len() - 1);
    for arg in &items[1..] {
        args.push(eval(arg, env, ctx)?);
    }

    match &callee {
        Value::NativeFn(native) => {
            ctx.push_call_frame(CallFrame {
                name: native.name.clone(),
            });
            let result = (native.func)(&args);
            if result.is_ok() {
                ctx.truncate_call_stack(ctx.call_stack_depth().saturating_sub(1));
            }
            // On error the frame stays for trace capture; the eval wrapper
            // truncates it during unwinding.
            result
        }
        Value::Closure(closure) => {
            let frame_name = match &items[0] {
                Value::Symbol(s) => resolve(*s),
                _ => "<lambda>".to_string(),
            };
            ctx.push_call_frame(CallFrame { name: frame_name });
            apply_closure(closure, &args, ctx)
        }
        other => Err(TarnError::NotCallable {
            got: other.type_name().to_string(),
            value: other.to_string(),
        }),
    }
}

/// Apply a closure to already-evaluated arguments: a fresh activation
/// environment chained to the captured one, parameters bound positionally.
/// Missing arguments bind null; extra arguments are ignored.
pub(crate) fn apply_closure(closure: &Closure, args: &[Value], ctx: &EvalContext) -> EvalResult {
    let activation = Env::with_parent(Rc::new(closure.env.clone()));
    for (i, param) in closure.params.iter().enumerate() {
        let value = args.get(i).cloned().unwrap_or(Value::Null);
        activation.define(*param, value);
    }
    eval(&closure.body, &activation, ctx)
}

use std::cell::Cell;
use std::rc::Rc;

use tarn_core::{intern, CallFrame, Closure, Env, EvalContext, Spur, TarnError, Value};

use crate::eval::{apply_closure, eval, EvalResult};
use crate::transform;

/// The closed set of special forms. Everything else in operator position is
/// an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Begin,
    Var,
    Set,
    If,
    While,
    Def,
    Switch,
    For,
    Inc,
    Dec,
    Lambda,
    Class,
    New,
    Prop,
}

/// Canonical list of all form tags recognized by the evaluator. These names
/// are reserved: a bare symbol equal to one of them is never a variable
/// reference.
pub const FORM_TAGS: &[&str] = &[
    "begin", "var", "set", "if", "while", "def", "switch", "for", "++", "--", "lambda", "class",
    "new", "prop",
];

/// Pre-interned `Spur` handles for the form tags.
///
/// Form dispatch runs for every list expression, so tags are compared as
/// interned integers instead of resolved strings.
struct FormSpurs {
    begin: Spur,
    var_: Spur,
    set: Spur,
    if_: Spur,
    while_: Spur,
    def: Spur,
    switch: Spur,
    for_: Spur,
    inc: Spur,
    dec: Spur,
    lambda: Spur,
    class: Spur,
    new: Spur,
    prop: Spur,
}

impl FormSpurs {
    fn init() -> Self {
        Self {
            begin: intern("begin"),
            var_: intern("var"),
            set: intern("set"),
            if_: intern("if"),
            while_: intern("while"),
            def: intern("def"),
            switch: intern("switch"),
            for_: intern("for"),
            inc: intern("++"),
            dec: intern("--"),
            lambda: intern("lambda"),
            class: intern("class"),
            new: intern("new"),
            prop: intern("prop"),
        }
    }
}

thread_local! {
    static SF: Cell<Option<&'static FormSpurs>> = const { Cell::new(None) };
}

fn form_spurs() -> &'static FormSpurs {
    SF.with(|cell| match cell.get() {
        Some(sf) => sf,
        None => {
            let sf: &'static FormSpurs = Box::leak(Box::new(FormSpurs::init()));
            cell.set(Some(sf));
            sf
        }
    })
}

/// Classify a symbol as a form tag, or `None` for a plain reference.
pub fn form_of(name: Spur) -> Option<Form> {
    let sf = form_spurs();
    if name == sf.begin {
        Some(Form::Begin)
    } else if name == sf.var_ {
        Some(Form::Var)
    } else if name == sf.set {
        Some(Form::Set)
    } else if name == sf.if_ {
        Some(Form::If)
    } else if name == sf.while_ {
        Some(Form::While)
    } else if name == sf.def {
        Some(Form::Def)
    } else if name == sf.switch {
        Some(Form::Switch)
    } else if name == sf.for_ {
        Some(Form::For)
    } else if name == sf.inc {
        Some(Form::Inc)
    } else if name == sf.dec {
        Some(Form::Dec)
    } else if name == sf.lambda {
        Some(Form::Lambda)
    } else if name == sf.class {
        Some(Form::Class)
    } else if name == sf.new {
        Some(Form::New)
    } else if name == sf.prop {
        Some(Form::Prop)
    } else {
        None
    }
}

pub(crate) fn eval_form(form: Form, args: &[Value], env: &Env, ctx: &EvalContext) -> EvalResult {
    match form {
        Form::Begin => eval_begin(args, env, ctx),
        Form::Var => eval_var(args, env, ctx),
        Form::Set => eval_set(args, env, ctx),
        Form::If => eval_if(args, env, ctx),
        Form::While => eval_while(args, env, ctx),
        Form::Lambda => eval_lambda(args, env),
        Form::Class => eval_class(args, env, ctx),
        Form::New => eval_new(args, env, ctx),
        Form::Prop => eval_prop(args, env, ctx),

        // Derived forms: rewrite once, then evaluate the rewrite.
        Form::Def => eval(&transform::def_to_var_lambda(args)?, env, ctx),
        Form::Switch => eval(&transform::switch_to_if(args)?, env, ctx),
        Form::For => eval(&transform::for_to_while(args)?, env, ctx),
        Form::Inc => eval(&transform::inc_to_set(args)?, env, ctx),
        Form::Dec => eval(&transform::dec_to_set(args)?, env, ctx),
    }
}

/// Evaluate expressions in order in the given environment, without opening a
/// new scope. The empty sequence yields null.
pub(crate) fn eval_sequence(exprs: &[Value], env: &Env, ctx: &EvalContext) -> EvalResult {
    let mut result = Value::Null;
    for expr in exprs {
        result = eval(expr, env, ctx)?;
    }
    Ok(result)
}

fn eval_begin(args: &[Value], env: &Env, ctx: &EvalContext) -> EvalResult {
    let block_env = Env::with_parent(Rc::new(env.clone()));
    eval_sequence(args, &block_env, ctx)
}

fn eval_var(args: &[Value], env: &Env, ctx: &EvalContext) -> EvalResult {
    if args.len() != 2 {
        return Err(TarnError::malformed(
            "var",
            format!("a name and a value, got {} operands", args.len()),
        ));
    }
    let name = args[0]
        .as_symbol_spur()
        .ok_or_else(|| TarnError::malformed("var", "a symbol name"))?;
    let value = eval(&args[1], env, ctx)?;
    Ok(env.define(name, value))
}

fn eval_set(args: &[Value], env: &Env, ctx: &EvalContext) -> EvalResult {
    if args.len() != 2 {
        return Err(TarnError::malformed(
            "set",
            format!("a target and a value, got {} operands", args.len()),
        ));
    }
    if let Some(target) = args[0].as_list() {
        let is_prop = target.len() == 3
            && target[0]
                .as_symbol_spur()
                .and_then(form_of)
                .map_or(false, |f| f == Form::Prop);
        if !is_prop {
            return Err(TarnError::malformed("set", "a variable or prop target"));
        }
        let instance = eval(&target[1], env, ctx)?;
        let object = instance
            .as_env()
            .cloned()
            .ok_or_else(|| TarnError::type_error("object", instance.type_name()))?;
        let name = target[2]
            .as_symbol_spur()
            .ok_or_else(|| TarnError::malformed("prop", "a symbol member name"))?;
        let value = eval(&args[1], env, ctx)?;
        // Field writes land on the instance's own table, shadowing the class
        // chain rather than climbing it.
        return Ok(object.define(name, value));
    }
    let name = args[0]
        .as_symbol_spur()
        .ok_or_else(|| TarnError::malformed("set", "a variable or prop target"))?;
    let value = eval(&args[1], env, ctx)?;
    env.assign(name, value)
}

fn eval_if(args: &[Value], env: &Env, ctx: &EvalContext) -> EvalResult {
    if args.len() != 3 {
        return Err(TarnError::malformed(
            "if",
            format!("3 operands, got {}", args.len()),
        ));
    }
    let cond = eval(&args[0], env, ctx)?;
    if cond.is_truthy() {
        eval(&args[1], env, ctx)
    } else {
        eval(&args[2], env, ctx)
    }
}

fn eval_while(args: &[Value], env: &Env, ctx: &EvalContext) -> EvalResult {
    if args.len() != 2 {
        return Err(TarnError::malformed(
            "while",
            format!("a condition and a body, got {} operands", args.len()),
        ));
    }
    let mut result = Value::Null;
    while eval(&args[0], env, ctx)?.is_truthy() {
        result = eval(&args[1], env, ctx)?;
    }
    Ok(result)
}

fn eval_lambda(args: &[Value], env: &Env) -> EvalResult {
    if args.len() != 2 {
        return Err(TarnError::malformed(
            "lambda",
            format!("a parameter list and a body, got {} operands", args.len()),
        ));
    }
    let params = parse_params(&args[0])?;
    Ok(Value::Closure(Rc::new(Closure {
        params,
        body: args[1].clone(),
        // Captured by reference: later defines in this env are visible to
        // calls made afterward, which is what makes named recursion work.
        env: env.clone(),
    })))
}

fn parse_params(expr: &Value) -> Result<Vec<Spur>, TarnError> {
    let items = expr
        .as_list()
        .ok_or_else(|| TarnError::malformed("lambda", "a parameter list"))?;
    items
        .iter()
        .map(|p| {
            p.as_symbol_spur()
                .ok_or_else(|| TarnError::malformed("lambda", "symbol parameters"))
        })
        .collect()
}

fn eval_class(args: &[Value], env: &Env, ctx: &EvalContext) -> EvalResult {
    if args.len() != 3 {
        return Err(TarnError::malformed(
            "class",
            format!("a name, a parent, and a body, got {} operands", args.len()),
        ));
    }
    let name = args[0]
        .as_symbol_spur()
        .ok_or_else(|| TarnError::malformed("class", "a symbol name"))?;
    let parent_val = eval(&args[1], env, ctx)?;
    // A non-object parent (usually null) chains the class to the lexical env,
    // which keeps outer bindings visible from method bodies.
    let parent = match parent_val {
        Value::Env(e) => e,
        _ => env.clone(),
    };
    let class_env = Env::with_parent(Rc::new(parent));
    // Member declarations evaluate directly inside the class env, not in a
    // begin child scope, so every var/def lands in the class table.
    match args[2].as_list() {
        Some(items)
            if items
                .first()
                .and_then(Value::as_symbol_spur)
                .and_then(form_of)
                == Some(Form::Begin) =>
        {
            eval_sequence(&items[1..], &class_env, ctx)?;
        }
        _ => {
            eval(&args[2], &class_env, ctx)?;
        }
    }
    env.define(name, Value::Env(class_env.clone()));
    Ok(Value::Env(class_env))
}

fn eval_new(args: &[Value], env: &Env, ctx: &EvalContext) -> EvalResult {
    if args.is_empty() {
        return Err(TarnError::malformed("new", "a class expression"));
    }
    let class_val = eval(&args[0], env, ctx)?;
    let class_env = class_val
        .as_env()
        .cloned()
        .ok_or_else(|| TarnError::type_error("class", class_val.type_name()))?;
    let instance = Env::with_parent(Rc::new(class_env.clone()));
    // The instance is the explicit first constructor argument by convention;
    // the remaining arguments evaluate in the caller's environment.
    let mut ctor_args = vec![Value::Env(instance.clone())];
    for arg in &args[1..] {
        ctor_args.push(eval(arg, env, ctx)?);
    }
    let ctor = class_env.lookup(intern("constructor"))?;
    match &ctor {
        Value::Closure(closure) => {
            ctx.push_call_frame(CallFrame {
                name: "constructor".to_string(),
            });
            // The constructor's return value is discarded; the instance is
            // the value of the new-expression.
            apply_closure(closure, &ctor_args, ctx)?;
        }
        other => {
            return Err(TarnError::NotCallable {
                got: other.type_name().to_string(),
                value: other.to_string(),
            })
        }
    }
    Ok(Value::Env(instance))
}

fn eval_prop(args: &[Value], env: &Env, ctx: &EvalContext) -> EvalResult {
    if args.len() != 2 {
        return Err(TarnError::malformed(
            "prop",
            format!("an instance and a member name, got {} operands", args.len()),
        ));
    }
    let instance = eval(&args[0], env, ctx)?;
    let object = instance
        .as_env()
        .ok_or_else(|| TarnError::type_error("object", instance.type_name()))?;
    let name = args[1]
        .as_symbol_spur()
        .ok_or_else(|| TarnError::malformed("prop", "a symbol member name"))?;
    // Inherited members resolve through the ordinary chain walk.
    object.lookup(name)
}

//! Desugaring rewrites: each derived form reduces to primitive forms before
//! evaluation. These are pure functions over expression shape with no
//! environment access, and inputs are never mutated; rewrites build new
//! nodes.

use tarn_core::{intern, TarnError, Value};

/// `(def name params body)` → `(var name (lambda params body))`.
pub fn def_to_var_lambda(args: &[Value]) -> Result<Value, TarnError> {
    if args.len() != 3 {
        return Err(TarnError::malformed(
            "def",
            format!("a name, a parameter list, and a body, got {} operands", args.len()),
        ));
    }
    Ok(Value::list(vec![
        Value::symbol("var"),
        args[0].clone(),
        Value::list(vec![
            Value::symbol("lambda"),
            args[1].clone(),
            args[2].clone(),
        ]),
    ]))
}

/// `(switch (c1 e1) … (else eN))` → `(if c1 e1 (if c2 e2 … eN))`.
///
/// Folded from the back: an `else` clause becomes the default alternative
/// rather than a tested condition; without one, the final alternative is
/// null.
pub fn switch_to_if(clauses: &[Value]) -> Result<Value, TarnError> {
    let else_tag = intern("else");
    let mut result = Value::Null;
    for clause in clauses.iter().rev() {
        let pair = clause
            .as_list()
            .ok_or_else(|| TarnError::malformed("switch", "(condition block) clauses"))?;
        if pair.len() != 2 {
            return Err(TarnError::malformed("switch", "(condition block) clauses"));
        }
        if pair[0].as_symbol_spur() == Some(else_tag) {
            result = pair[1].clone();
        } else {
            result = Value::list(vec![
                Value::symbol("if"),
                pair[0].clone(),
                pair[1].clone(),
                result,
            ]);
        }
    }
    Ok(result)
}

/// `(for init cond update body)` →
/// `(begin init (while cond (begin body update)))`.
///
/// The outer begin gives the loop-control variable its own scope, so it does
/// not leak into the enclosing one.
pub fn for_to_while(args: &[Value]) -> Result<Value, TarnError> {
    if args.len() != 4 {
        return Err(TarnError::malformed(
            "for",
            format!("init, condition, update, and body, got {} operands", args.len()),
        ));
    }
    Ok(Value::list(vec![
        Value::symbol("begin"),
        args[0].clone(),
        Value::list(vec![
            Value::symbol("while"),
            args[1].clone(),
            Value::list(vec![
                Value::symbol("begin"),
                args[3].clone(),
                args[2].clone(),
            ]),
        ]),
    ]))
}

/// `(++ name)` → `(set name (+ name 1))`.
pub fn inc_to_set(args: &[Value]) -> Result<Value, TarnError> {
    step_to_set("++", "+", args)
}

/// `(-- name)` → `(set name (- name 1))`.
pub fn dec_to_set(args: &[Value]) -> Result<Value, TarnError> {
    step_to_set("--", "-", args)
}

fn step_to_set(form: &'static str, op: &str, args: &[Value]) -> Result<Value, TarnError> {
    if args.len() != 1 {
        return Err(TarnError::malformed(form, "a single variable name"));
    }
    Ok(Value::list(vec![
        Value::symbol("set"),
        args[0].clone(),
        Value::list(vec![
            Value::symbol(op),
            args[0].clone(),
            Value::Number(1.0),
        ]),
    ]))
}

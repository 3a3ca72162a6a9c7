use tarn_core::{check_arity, Env, TarnError, Value};

use crate::{as_number, register_fn};

pub fn register(env: &Env) {
    register_fn(env, "+", |args| {
        check_arity!(args, "+", 2);
        add(&args[0], &args[1])
    });

    register_fn(env, "-", |args| {
        check_arity!(args, "-", 1..=2);
        // Operand presence is an argument-count check, so a literal 0
        // subtrahend still subtracts instead of negating.
        if args.len() == 1 {
            Ok(Value::Number(-as_number(&args[0])?))
        } else {
            Ok(Value::Number(as_number(&args[0])? - as_number(&args[1])?))
        }
    });

    register_fn(env, "*", |args| {
        check_arity!(args, "*", 2);
        Ok(Value::Number(as_number(&args[0])? * as_number(&args[1])?))
    });

    register_fn(env, "/", |args| {
        check_arity!(args, "/", 2);
        Ok(Value::Number(as_number(&args[0])? / as_number(&args[1])?))
    });
}

/// `+` adds numbers and doubles as concatenation when either side is a
/// string.
fn add(a: &Value, b: &Value) -> Result<Value, TarnError> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => Ok(Value::Number(x + y)),
        (Value::Str(_), _) | (_, Value::Str(_)) => Ok(Value::string(&format!("{a}{b}"))),
        _ => {
            let offender = if a.as_number().is_some() { b } else { a };
            Err(TarnError::type_error(
                "number or string",
                offender.type_name(),
            ))
        }
    }
}

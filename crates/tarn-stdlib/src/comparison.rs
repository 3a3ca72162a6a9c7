use tarn_core::{Env, TarnError, Value};

use crate::{as_number, register_fn};

pub fn register(env: &Env) {
    register_cmp(env, "<", |x, y| x < y);
    register_cmp(env, ">", |x, y| x > y);
    register_cmp(env, "<=", |x, y| x <= y);
    register_cmp(env, ">=", |x, y| x >= y);

    register_fn(env, "=", |args| {
        if args.len() != 2 {
            return Err(TarnError::arity("=", "2", args.len()));
        }
        Ok(Value::Bool(args[0] == args[1]))
    });
}

fn register_cmp(env: &Env, name: &'static str, op: fn(f64, f64) -> bool) {
    register_fn(env, name, move |args| {
        if args.len() != 2 {
            return Err(TarnError::arity(name, "2", args.len()));
        }
        Ok(Value::Bool(op(as_number(&args[0])?, as_number(&args[1])?)))
    });
}

#![allow(clippy::mutable_key_type)]
mod arithmetic;
mod comparison;
mod io;

use tarn_core::{intern, Env, NativeFn, TarnError, Value};

pub const VERSION: &str = "0.1";

/// Seed a root environment with the sentinels and native primitives the
/// evaluator contract requires.
pub fn register_globals(env: &Env) {
    env.define(intern("true"), Value::Bool(true));
    env.define(intern("false"), Value::Bool(false));
    env.define(intern("null"), Value::Null);
    env.define(intern("VERSION"), Value::string(VERSION));

    arithmetic::register(env);
    comparison::register(env);
    io::register(env);
}

pub(crate) fn register_fn(
    env: &Env,
    name: &str,
    f: impl Fn(&[Value]) -> Result<Value, TarnError> + 'static,
) {
    env.define(intern(name), Value::native_fn(NativeFn::new(name, f)));
}

pub(crate) fn as_number(value: &Value) -> Result<f64, TarnError> {
    value
        .as_number()
        .ok_or_else(|| TarnError::type_error("number", value.type_name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn globals_contain_sentinels_and_version() {
        let env = Env::new();
        register_globals(&env);
        assert_eq!(env.lookup_str("true").unwrap(), Value::Bool(true));
        assert_eq!(env.lookup_str("false").unwrap(), Value::Bool(false));
        assert_eq!(env.lookup_str("null").unwrap(), Value::Null);
        assert_eq!(env.lookup_str("VERSION").unwrap(), Value::string("0.1"));
    }

    #[test]
    fn globals_contain_required_primitives() {
        let env = Env::new();
        register_globals(&env);
        for name in ["+", "-", "*", "/", "<", ">", "<=", ">=", "=", "print"] {
            let value = env.lookup_str(name).unwrap();
            assert!(
                matches!(value, Value::NativeFn(_)),
                "{name} should be a native primitive"
            );
        }
    }
}

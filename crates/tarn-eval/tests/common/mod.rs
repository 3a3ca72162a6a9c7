#![allow(dead_code)]

use tarn_core::{TarnError, Value};
use tarn_eval::Interpreter;

pub fn num(n: f64) -> Value {
    Value::Number(n)
}

/// A quoted string atom, as the external parser would produce it.
pub fn lit(s: &str) -> Value {
    Value::string(&format!("\"{s}\""))
}

pub fn sym(s: &str) -> Value {
    Value::symbol(s)
}

pub fn list(items: Vec<Value>) -> Value {
    Value::list(items)
}

/// `(head item1 … itemN)` with a symbol head.
pub fn form(head: &str, items: Vec<Value>) -> Value {
    let mut v = vec![sym(head)];
    v.extend(items);
    list(v)
}

pub fn begin(items: Vec<Value>) -> Value {
    form("begin", items)
}

pub fn var(name: &str, value: Value) -> Value {
    form("var", vec![sym(name), value])
}

pub fn set(name: &str, value: Value) -> Value {
    form("set", vec![sym(name), value])
}

pub fn prop(instance: Value, member: &str) -> Value {
    form("prop", vec![instance, sym(member)])
}

pub fn set_prop(instance: Value, member: &str, value: Value) -> Value {
    form("set", vec![prop(instance, member), value])
}

/// `(def name (params…) body)`.
pub fn def(name: &str, params: Vec<&str>, body: Value) -> Value {
    form(
        "def",
        vec![
            sym(name),
            list(params.into_iter().map(sym).collect()),
            body,
        ],
    )
}

/// `(class name parent (begin members…))`.
pub fn class(name: &str, parent: Value, members: Vec<Value>) -> Value {
    form("class", vec![sym(name), parent, begin(members)])
}

pub fn new(class_name: &str, args: Vec<Value>) -> Value {
    let mut v = vec![sym(class_name)];
    v.extend(args);
    form("new", v)
}

pub fn run(expr: &Value) -> Value {
    Interpreter::new()
        .eval(expr)
        .unwrap_or_else(|e| panic!("eval failed for `{expr}`: {e}"))
}

pub fn run_err(expr: &Value) -> TarnError {
    match Interpreter::new().eval(expr) {
        Ok(v) => panic!("expected an error for `{expr}`, got {v}"),
        Err(e) => e,
    }
}

use tarn_core::{Env, Value};

use crate::register_fn;

/// Space-separated rendering shared by `print` and its tests. Strings render
/// raw (no delimiters).
pub(crate) fn render(args: &[Value]) -> String {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&arg.to_string());
    }
    out
}

pub fn register(env: &Env) {
    register_fn(env, "print", |args| {
        println!("{}", render(args));
        Ok(Value::Null)
    });
}

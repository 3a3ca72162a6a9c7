#![allow(clippy::mutable_key_type)]
mod eval;
mod forms;
pub mod transform;

pub use eval::{create_module_env, eval, EvalResult, Interpreter};
pub use forms::{form_of, Form, FORM_TAGS};

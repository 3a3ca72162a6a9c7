#![allow(clippy::mutable_key_type)]
pub mod context;
pub mod error;
pub mod value;

pub use context::{EvalContext, DEFAULT_MAX_DEPTH};
pub use error::{suggest_similar, CallFrame, StackTrace, TarnError};
pub use value::{intern, resolve, with_resolved, Closure, Env, NativeFn, Spur, Value};

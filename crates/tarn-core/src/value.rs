use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use hashbrown::HashMap as SpurMap;
use lasso::Rodeo;
pub use lasso::Spur;

use crate::error::TarnError;

thread_local! {
    static INTERNER: RefCell<Rodeo> = RefCell::new(Rodeo::default());
}

/// Intern a string, returning a Spur key.
pub fn intern(s: &str) -> Spur {
    INTERNER.with(|r| r.borrow_mut().get_or_intern(s))
}

/// Resolve a Spur key back to a String.
pub fn resolve(spur: Spur) -> String {
    INTERNER.with(|r| r.borrow().resolve(&spur).to_string())
}

/// Resolve a Spur and call f with the &str, avoiding allocation.
pub fn with_resolved<F, R>(spur: Spur, f: F) -> R
where
    F: FnOnce(&str) -> R,
{
    INTERNER.with(|r| {
        let interner = r.borrow();
        f(interner.resolve(&spur))
    })
}

/// A native function callable from Tarn code.
pub type NativeFnInner = dyn Fn(&[Value]) -> Result<Value, TarnError>;

pub struct NativeFn {
    pub name: String,
    pub func: Box<NativeFnInner>,
}

impl NativeFn {
    pub fn new(
        name: impl Into<String>,
        f: impl Fn(&[Value]) -> Result<Value, TarnError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Box::new(f),
        }
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native-fn {}>", self.name)
    }
}

/// A user-defined function: parameters, a single body expression, and the
/// environment captured by reference at the point the lambda was evaluated.
#[derive(Debug, Clone)]
pub struct Closure {
    pub params: Vec<Spur>,
    pub body: Value,
    pub env: Env,
}

/// The core Value type: both the externally produced expression tree and the
/// runtime value domain.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<String>),
    Symbol(Spur),
    List(Rc<Vec<Value>>),
    Closure(Rc<Closure>),
    NativeFn(Rc<NativeFn>),
    Env(Env),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::List(_) => "list",
            Value::Closure(_) => "lambda",
            Value::NativeFn(_) => "native-fn",
            Value::Env(_) => "object",
        }
    }

    /// Truthiness: everything except null, false, zero, and the empty string.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_symbol_spur(&self) -> Option<Spur> {
        match self {
            Value::Symbol(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_env(&self) -> Option<&Env> {
        match self {
            Value::Env(e) => Some(e),
            _ => None,
        }
    }

    pub fn symbol(s: &str) -> Value {
        Value::Symbol(intern(s))
    }

    pub fn string(s: &str) -> Value {
        Value::Str(Rc::new(s.to_string()))
    }

    pub fn number(n: f64) -> Value {
        Value::Number(n)
    }

    pub fn list(v: Vec<Value>) -> Value {
        Value::List(Rc::new(v))
    }

    pub fn native_fn(f: NativeFn) -> Value {
        Value::NativeFn(Rc::new(f))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Env(a), Value::Env(b)) => Rc::ptr_eq(&a.bindings, &b.bindings),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(true) => write!(f, "true"),
            Value::Bool(false) => write!(f, "false"),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{n:.0}")
                } else {
                    write!(f, "{n}")
                }
            }
            Value::Str(s) => write!(f, "{s}"),
            Value::Symbol(s) => with_resolved(*s, |name| write!(f, "{name}")),
            Value::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Value::Closure(_) => write!(f, "<lambda>"),
            Value::NativeFn(n) => write!(f, "<native-fn {}>", n.name),
            Value::Env(_) => write!(f, "<object>"),
        }
    }
}

/// A Tarn environment: a chained binding table. Cloning shares the table, so
/// closures, classes, and instances holding the same environment all observe
/// each other's mutations. Classes and instances are plain environments that
/// differ only in where they sit in the chain.
#[derive(Debug, Clone)]
pub struct Env {
    pub bindings: Rc<RefCell<SpurMap<Spur, Value>>>,
    pub parent: Option<Rc<Env>>,
}

impl Env {
    pub fn new() -> Self {
        Env {
            bindings: Rc::new(RefCell::new(SpurMap::new())),
            parent: None,
        }
    }

    pub fn with_parent(parent: Rc<Env>) -> Self {
        Env {
            bindings: Rc::new(RefCell::new(SpurMap::new())),
            parent: Some(parent),
        }
    }

    /// Create a binding in this table, never climbing the chain.
    /// Redefinition of an existing name overwrites in place.
    pub fn define(&self, name: Spur, value: Value) -> Value {
        self.bindings.borrow_mut().insert(name, value.clone());
        value
    }

    /// Update the nearest existing binding of `name` in the chain.
    /// Assignment never creates a new binding.
    pub fn assign(&self, name: Spur, value: Value) -> Result<Value, TarnError> {
        let owner = self.resolve(name)?;
        Ok(owner.define(name, value))
    }

    /// Look up `name` through the chain.
    pub fn lookup(&self, name: Spur) -> Result<Value, TarnError> {
        if let Some(val) = self.bindings.borrow().get(&name) {
            Ok(val.clone())
        } else if let Some(parent) = &self.parent {
            parent.lookup(name)
        } else {
            Err(TarnError::UndefinedVariable(resolve(name)))
        }
    }

    /// Return the nearest environment (self-first) whose own table holds `name`.
    pub fn resolve(&self, name: Spur) -> Result<Env, TarnError> {
        if self.bindings.borrow().contains_key(&name) {
            Ok(self.clone())
        } else if let Some(parent) = &self.parent {
            parent.resolve(name)
        } else {
            Err(TarnError::UndefinedVariable(resolve(name)))
        }
    }

    pub fn lookup_str(&self, name: &str) -> Result<Value, TarnError> {
        self.lookup(intern(name))
    }

    pub fn define_str(&self, name: &str, value: Value) -> Value {
        self.define(intern(name), value)
    }

    /// Names bound directly in this table.
    pub fn own_names(&self) -> Vec<String> {
        self.bindings.borrow().keys().map(|s| resolve(*s)).collect()
    }

    /// All names visible from this environment, nearest bindings first.
    pub fn visible_names(&self) -> Vec<String> {
        let mut names = self.own_names();
        let mut current = self.parent.clone();
        while let Some(env) = current {
            for name in env.own_names() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
            current = env.parent.clone();
        }
        names
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

use std::fmt;

/// Check arity of a native function's arguments, returning `TarnError::Arity`
/// on mismatch.
///
/// # Forms
///
/// ```ignore
/// check_arity!(args, "fn-name", 2);        // exactly 2
/// check_arity!(args, "fn-name", 1..=3);    // 1 to 3 inclusive
/// check_arity!(args, "fn-name", 2..);      // 2 or more
/// ```
#[macro_export]
macro_rules! check_arity {
    ($args:expr, $name:expr, $exact:literal) => {
        if $args.len() != $exact {
            return Err($crate::TarnError::arity(
                $name,
                stringify!($exact),
                $args.len(),
            ));
        }
    };
    ($args:expr, $name:expr, $lo:literal ..= $hi:literal) => {
        if $args.len() < $lo || $args.len() > $hi {
            return Err($crate::TarnError::arity(
                $name,
                concat!(stringify!($lo), "-", stringify!($hi)),
                $args.len(),
            ));
        }
    };
    ($args:expr, $name:expr, $lo:literal ..) => {
        if $args.len() < $lo {
            return Err($crate::TarnError::arity(
                $name,
                concat!(stringify!($lo), "+"),
                $args.len(),
            ));
        }
    };
}

/// A single frame in a call stack trace.
#[derive(Debug, Clone)]
pub struct CallFrame {
    pub name: String,
}

/// A captured stack trace (list of call frames, innermost first).
#[derive(Debug, Clone)]
pub struct StackTrace(pub Vec<CallFrame>);

impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in &self.0 {
            writeln!(f, "  at {}", frame.name)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TarnError {
    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("Unimplemented form: {0}")]
    UnimplementedForm(String),

    #[error("Not callable: {value} ({got})")]
    NotCallable { got: String, value: String },

    #[error("Malformed {form} form: expected {expected}")]
    Malformed {
        form: &'static str,
        expected: String,
    },

    #[error("Type error: expected {expected}, got {got}")]
    Type { expected: String, got: String },

    #[error("Arity error: {name} expects {expected} args, got {got}")]
    Arity {
        name: String,
        expected: String,
        got: usize,
    },

    #[error("Evaluation depth limit exceeded ({0})")]
    DepthExceeded(usize),

    #[error("{inner}")]
    WithTrace {
        inner: Box<TarnError>,
        trace: StackTrace,
    },

    #[error("{inner}")]
    WithContext {
        inner: Box<TarnError>,
        hint: String,
    },
}

/// Compute the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_len = a.len();
    let b_len = b.len();
    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.chars().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b_len]
}

/// Find the most similar name from a list of candidates.
/// Returns `None` if no candidate is close enough.
pub fn suggest_similar(name: &str, candidates: &[&str]) -> Option<String> {
    // Max distance threshold: roughly 1/3 of the name length, min 1, max 3
    let threshold = (name.len() / 3).clamp(1, 3);

    candidates
        .iter()
        .filter_map(|c| {
            let d = edit_distance(name, c);
            if d > 0 && d <= threshold {
                Some((*c, d))
            } else {
                None
            }
        })
        .min_by_key(|(_, d)| *d)
        .map(|(name, _)| name.to_string())
}

impl TarnError {
    pub fn type_error(expected: impl Into<String>, got: impl Into<String>) -> Self {
        TarnError::Type {
            expected: expected.into(),
            got: got.into(),
        }
    }

    pub fn arity(name: impl Into<String>, expected: impl Into<String>, got: usize) -> Self {
        TarnError::Arity {
            name: name.into(),
            expected: expected.into(),
            got,
        }
    }

    pub fn malformed(form: &'static str, expected: impl Into<String>) -> Self {
        TarnError::Malformed {
            form,
            expected: expected.into(),
        }
    }

    /// Attach a hint (actionable suggestion) to this error.
    pub fn with_hint(self, hint: impl Into<String>) -> Self {
        match self {
            TarnError::WithContext { inner, .. } => TarnError::WithContext {
                inner,
                hint: hint.into(),
            },
            other => TarnError::WithContext {
                inner: Box::new(other),
                hint: hint.into(),
            },
        }
    }

    /// Get the hint from this error, if any.
    pub fn hint(&self) -> Option<&str> {
        match self {
            TarnError::WithContext { hint, .. } => Some(hint),
            TarnError::WithTrace { inner, .. } => inner.hint(),
            _ => None,
        }
    }

    /// Wrap this error with a stack trace (no-op if already wrapped).
    pub fn with_stack_trace(self, trace: StackTrace) -> Self {
        if trace.0.is_empty() {
            return self;
        }
        match self {
            TarnError::WithTrace { .. } => self,
            TarnError::WithContext { inner, hint } => TarnError::WithContext {
                inner: Box::new(inner.with_stack_trace(trace)),
                hint,
            },
            other => TarnError::WithTrace {
                inner: Box::new(other),
                trace,
            },
        }
    }

    pub fn stack_trace(&self) -> Option<&StackTrace> {
        match self {
            TarnError::WithTrace { trace, .. } => Some(trace),
            TarnError::WithContext { inner, .. } => inner.stack_trace(),
            _ => None,
        }
    }

    /// Unwrap through trace and context wrappers to the underlying error.
    pub fn inner(&self) -> &TarnError {
        match self {
            TarnError::WithTrace { inner, .. } => inner.inner(),
            TarnError::WithContext { inner, .. } => inner.inner(),
            other => other,
        }
    }
}

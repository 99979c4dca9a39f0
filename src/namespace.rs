use std::f64::consts::{E, PI};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::ast::Value;
use crate::error::EvalError;
use crate::eval::{infer_value, Scope};
use crate::tree::RawNode;
use crate::ConfigError;

static BUILTIN_CONSTANTS: Lazy<IndexMap<&'static str, Value>> = Lazy::new(|| {
    let mut map = IndexMap::new();
    for name in ["pi", "Pi", "PI"] {
        map.insert(name, Value::Real(PI));
    }
    for name in ["e", "E"] {
        map.insert(name, Value::Real(E));
    }
    map
});

/// Functions callable from a value expression. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Exp,
    Ln,
    Sqrt,
    Abs,
    Int,
    Float,
    Pow,
    Sum,
}

impl Function {
    pub fn from_name(name: &str) -> Option<Self> {
        let f = match name {
            "sin" => Function::Sin,
            "cos" => Function::Cos,
            "tan" => Function::Tan,
            "exp" => Function::Exp,
            "ln" | "log" => Function::Ln,
            "sqrt" | "root" => Function::Sqrt,
            "abs" => Function::Abs,
            "int" => Function::Int,
            "float" => Function::Float,
            "pow" => Function::Pow,
            "sum" => Function::Sum,
            _ => return None,
        };
        Some(f)
    }

    /// `None` means any number of arguments.
    pub fn arity(&self) -> Option<usize> {
        match self {
            Function::Pow => Some(2),
            Function::Sum => None,
            _ => Some(1),
        }
    }
}

/// What a name in an expression refers to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Binding<'a> {
    Constant(&'a Value),
    Function(Function),
}

/// Flat name table used by the evaluator: user constants layered over the
/// fixed built-ins. Built-ins are never modified, only shadowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Namespace {
    constants: IndexMap<String, Value>,
}

impl Namespace {
    /// A namespace holding only the built-ins.
    pub fn builtin() -> Self {
        Self::default()
    }

    pub fn resolve(&self, name: &str) -> Option<Binding<'_>> {
        if let Some(value) = self.constants.get(name) {
            return Some(Binding::Constant(value));
        }
        if let Some(value) = BUILTIN_CONSTANTS.get(name) {
            return Some(Binding::Constant(value));
        }
        Function::from_name(name).map(Binding::Function)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// User-defined constants, in definition order.
    pub fn constants(&self) -> &IndexMap<String, Value> {
        &self.constants
    }

    pub(crate) fn define(&mut self, name: String, value: Value) {
        self.constants.insert(name, value);
    }
}

/// Evaluate the direct pairs of the constants section, top to bottom, each
/// against the namespace built so far. Nested sections don't contribute.
pub fn build_namespace(constants: Option<&RawNode>) -> Result<Namespace, ConfigError> {
    let mut namespace = Namespace::builtin();

    let Some(section) = constants else {
        debug!("No constants section, using built-ins only");
        return Ok(namespace);
    };

    for (key, raw) in section.values() {
        let value = infer_value(&raw.text, &namespace, Scope::Constants).map_err(|e| match e {
            EvalError::Unresolved(name) => ConfigError::UnresolvedIdentifier {
                name,
                key: key.clone(),
                line: raw.line,
            },
            other => ConfigError::EvaluationError {
                path: section.key_path(key),
                reason: other.to_string(),
                line: raw.line,
            },
        })?;
        namespace.define(key.clone(), value);
    }

    debug!(count = namespace.constants.len(), "Registered constants");
    Ok(namespace)
}

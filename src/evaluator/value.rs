use std::fmt::Display;

use crate::symbols::symbols::TypeSymbol;

/// A runtime value. `any`-typed variables hold one of these like any other
/// variable; the static type only restricts which operators apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Boolean(bool),
    Integer(i32),
    String(String),
}

impl Value {
    pub fn ty(&self) -> TypeSymbol {
        match self {
            Value::Boolean(_) => TypeSymbol::Boolean,
            Value::Integer(_) => TypeSymbol::Int,
            Value::String(_) => TypeSymbol::String,
        }
    }

    /// # Panics
    ///
    /// Panics if the value is not a boolean, which the binder rules out.
    pub fn as_boolean(&self) -> bool {
        match self {
            Value::Boolean(value) => *value,
            other => panic!("expected boolean value, found {:?}", other),
        }
    }

    /// # Panics
    ///
    /// Panics if the value is not an integer, which the binder rules out.
    pub fn as_integer(&self) -> i32 {
        match self {
            Value::Integer(value) => *value,
            other => panic!("expected integer value, found {:?}", other),
        }
    }

    /// # Panics
    ///
    /// Panics if the value is not a string, which the binder rules out.
    pub fn as_str(&self) -> &str {
        match self {
            Value::String(value) => value,
            other => panic!("expected string value, found {:?}", other),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
        }
    }
}

//! Read-only variables a template set is rendered against.

use std::fmt;

use indexmap::IndexMap;

use crate::constants::LIST_SEPARATOR;

/// The two shapes a context variable can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(String),
    /// Elements keep the caller's insertion order
    List(Vec<String>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(_) => ValueKind::Scalar,
            Value::List(_) => ValueKind::List,
        }
    }
}

/// Renders a list joined with [`LIST_SEPARATOR`].
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(value) => f.write_str(value),
            Value::List(items) => f.write_str(&items.join(LIST_SEPARATOR)),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Scalar(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Scalar(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Scalar,
    List,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Scalar => f.write_str("scalar"),
            ValueKind::List => f.write_str("list"),
        }
    }
}

/// Immutable mapping from variable name to [`Value`].
///
/// A context is fully populated through [`ContextBuilder`] before any file is
/// processed and is only ever read afterwards, so one instance can be shared
/// by every file of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    variables: IndexMap<String, Value>,
}

impl Context {
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    /// Returns the value bound to `name`, or `None` when the caller never defined it.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Iterates variables in the order they were defined.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.variables.iter().map(|(name, value)| (name.as_str(), value))
    }
}

#[derive(Debug, Default)]
pub struct ContextBuilder {
    variables: IndexMap<String, Value>,
}

impl ContextBuilder {
    /// Binds `name` to a scalar. A later binding of the same name replaces it.
    pub fn scalar<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.variables.insert(name.into(), Value::Scalar(value.into()));
        self
    }

    pub fn list<K, I, S>(mut self, name: K, items: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = items.into_iter().map(Into::into).collect();
        self.variables.insert(name.into(), Value::List(items));
        self
    }

    pub fn build(self) -> Context {
        Context { variables: self.variables }
    }
}

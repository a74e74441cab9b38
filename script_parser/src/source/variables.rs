//! Per-source variable table
//!
//! Values are typed when they are assigned: integer if the text parses as
//! one, then floating point, otherwise the text itself.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A variable value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Infer the value type from assignment text
    pub fn infer(text: &str) -> Self {
        if let Ok(int) = text.parse::<i64>() {
            return Value::Int(int);
        }
        if let Ok(float) = text.parse::<f64>() {
            if float.is_finite() {
                return Value::Float(float);
            }
        }
        Value::Str(text.to_string())
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Str(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Mapping from variable name (without the leading `@`) to value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableTable {
    values: BTreeMap<String, Value>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Define or overwrite a variable
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Define or overwrite a variable from its textual value
    pub fn assign(&mut self, name: impl Into<String>, text: &str) {
        self.set(name, Value::infer(text));
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Merge `other` into this table.
    ///
    /// Keys present in both take the value from `other`; keys only present
    /// here are left untouched.
    pub fn copy_from(&mut self, other: &VariableTable) {
        for (name, value) in &other.values {
            self.values.insert(name.clone(), value.clone());
        }
    }
}

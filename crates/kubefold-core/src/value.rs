//! YAML value tree
//!
//! Represents both the settings tree and parsed manifest documents.
//! Values are scalars (string, int, float, bool, null), sequences,
//! or mappings. Mappings use `IndexMap` so that iteration and
//! serialization follow original parse order, which keeps rendered
//! output deterministic.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// A YAML value: a settings subtree or a manifest document node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
#[derive(Default)]
pub enum Value {
    /// Null value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// String value (may contain markers like #{deployment.replicas})
    String(String),
    /// Sequence of values
    Sequence(Vec<Value>),
    /// Mapping of string keys to values, in parse order
    Mapping(IndexMap<String, Value>),
}

impl Value {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is a string
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Check if this value is a sequence
    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    /// Check if this value is a mapping
    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    /// Get as boolean if this is a Bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an Integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a Float or Integer
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get as str if this is a String
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as slice if this is a Sequence
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Get as mutable vec if this is a Sequence
    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Get as mapping if this is a Mapping
    pub fn as_mapping(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Get as mutable mapping if this is a Mapping
    pub fn as_mapping_mut(&mut self) -> Option<&mut IndexMap<String, Value>> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Get a value by dotted path (e.g., "deployment.replicas")
    ///
    /// Splits on `.` and walks mappings segment by segment. Literal dots
    /// in keys are not escapable. Fails with a missing-variable error if
    /// any segment is absent or an intermediate value is not a mapping.
    pub fn get_path(&self, path: &str) -> Result<&Value> {
        let mut current = self;

        for segment in path.split('.') {
            current = match current {
                Value::Mapping(map) => map
                    .get(segment)
                    .ok_or_else(|| Error::missing_variable(path))?,
                _ => return Err(Error::missing_variable(path)),
            };
        }

        Ok(current)
    }

    /// Get a mutable value by dotted path
    pub fn get_path_mut(&mut self, path: &str) -> Result<&mut Value> {
        let mut current = self;

        for segment in path.split('.') {
            current = match current {
                Value::Mapping(map) => map
                    .get_mut(segment)
                    .ok_or_else(|| Error::missing_variable(path))?,
                _ => return Err(Error::missing_variable(path)),
            };
        }

        Ok(current)
    }

    /// Returns the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }
}

impl fmt::Display for Value {
    /// Scalar-to-string conversion used by marker substitution.
    /// Sequences and mappings print in their native bracketed form;
    /// interpolating them into text is an edge case callers should avoid.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Sequence(seq) => {
                write!(f, "[")?;
                for (i, v) in seq.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Value::Mapping(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

// Convenient From implementations
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Sequence(v.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(m: IndexMap<String, Value>) -> Self {
        Value::Mapping(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn sample_tree() -> Value {
        let mut deployment = IndexMap::new();
        deployment.insert("replicas".into(), Value::Integer(3));
        deployment.insert("name".into(), Value::String("packing".into()));
        let mut root = IndexMap::new();
        root.insert("deployment".into(), Value::Mapping(deployment));
        Value::Mapping(root)
    }

    #[test]
    fn test_get_path_returns_stored_value() {
        let tree = sample_tree();

        assert_eq!(tree.get_path("deployment.replicas").unwrap().as_i64(), Some(3));
        assert_eq!(
            tree.get_path("deployment.name").unwrap().as_str(),
            Some("packing")
        );
    }

    #[test]
    fn test_get_path_single_segment() {
        let tree = sample_tree();

        assert!(tree.get_path("deployment").unwrap().is_mapping());
    }

    #[test]
    fn test_get_path_missing_segment() {
        let tree = sample_tree();

        let err = tree.get_path("deployment.missing").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingVariable);
        assert_eq!(err.path, Some("deployment.missing".into()));
    }

    #[test]
    fn test_get_path_through_scalar_fails() {
        let tree = sample_tree();

        // "deployment.name" is a string, not a mapping
        let err = tree.get_path("deployment.name.deeper").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingVariable);
    }

    #[test]
    fn test_get_path_mut() {
        let mut tree = sample_tree();

        *tree.get_path_mut("deployment.replicas").unwrap() = Value::Integer(5);
        assert_eq!(tree.get_path("deployment.replicas").unwrap().as_i64(), Some(5));
    }

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::String("hello".into()).to_string(), "hello");
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "null");
    }

    #[test]
    fn test_display_non_scalars() {
        let seq = Value::Sequence(vec![Value::Integer(1), Value::Integer(2)]);
        assert_eq!(seq.to_string(), "[1, 2]");

        let mut map = IndexMap::new();
        map.insert("a".into(), Value::Integer(1));
        assert_eq!(Value::Mapping(map).to_string(), "{a: 1}");
    }

    #[test]
    fn test_yaml_round_trip_preserves_key_order() {
        let yaml = "zulu: 1\nalpha: 2\nmike: 3\n";
        let value: Value = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(serde_yaml::to_string(&value).unwrap(), yaml);
    }

    #[test]
    fn test_type_checks_and_accessors() {
        assert!(Value::Null.is_null());
        assert!(Value::String("x".into()).is_string());
        assert!(Value::Sequence(vec![]).is_sequence());
        assert!(Value::Mapping(IndexMap::new()).is_mapping());
        assert_eq!(Value::Integer(7).as_f64(), Some(7.0));
        assert_eq!(Value::Bool(false).as_bool(), Some(false));
    }
}

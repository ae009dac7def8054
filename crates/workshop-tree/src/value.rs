//! ---
//! ems_section: "02-parameter-tree"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Path-addressable parameter tree."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::fmt;

use serde_json::Value;

/// Coarse type of a parameter value, used for write-time type checks and metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// JSON `null`.
    Null,
    /// Boolean.
    Bool,
    /// Integer number.
    Int,
    /// Floating point number.
    Float,
    /// String.
    Str,
    /// Ordered list.
    List,
    /// Mapping of names to values.
    Map,
}

impl ValueKind {
    /// Classify a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(number) if number.is_f64() => ValueKind::Float,
            Value::Number(_) => ValueKind::Int,
            Value::String(_) => ValueKind::Str,
            Value::Array(_) => ValueKind::List,
            Value::Object(_) => ValueKind::Map,
        }
    }

    /// Name reported in metadata and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "str",
            ValueKind::List => "list",
            ValueKind::Map => "map",
        }
    }

    /// Whether a leaf currently holding `self` may be overwritten with `incoming`.
    ///
    /// Integers widen into floats; a null leaf has no established kind yet.
    pub fn accepts(&self, incoming: ValueKind) -> bool {
        *self == incoming
            || *self == ValueKind::Null
            || (*self == ValueKind::Float && incoming == ValueKind::Int)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! ---
//! ems_section: "02-parameter-tree"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Path-addressable parameter tree."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use serde::Serialize;
use serde_json::{Map, Value};

/// Descriptive metadata declared on a leaf.
///
/// Bounds are advisory unless the tree runs with [`crate::BoundsPolicy::Enforced`];
/// `allowed_values` is never enforced by the tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    /// Human-readable name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Longer description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Engineering units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    /// Lower bound for numeric leaves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Value>,
    /// Upper bound for numeric leaves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Value>,
    /// Values a client may choose from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<Value>>,
    /// Digits to show after the decimal point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_precision: Option<u32>,
}

impl Metadata {
    /// Empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach engineering units.
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Attach a lower bound.
    pub fn with_min(mut self, min: impl Into<Value>) -> Self {
        self.min = Some(min.into());
        self
    }

    /// Attach an upper bound.
    pub fn with_max(mut self, max: impl Into<Value>) -> Self {
        self.max = Some(max.into());
        self
    }

    /// Attach the list of values a client may choose from.
    pub fn with_allowed_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Attach a display precision.
    pub fn with_display_precision(mut self, digits: u32) -> Self {
        self.display_precision = Some(digits);
        self
    }

    /// True when nothing has been declared.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Flatten into a JSON object containing only the declared entries.
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

//! Site-supplied hook requirement values.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// The value a site configuration assigns to a hook kind.
///
/// The content is opaque to the dispatcher and handed verbatim to the hook
/// factory. It is usually a list of names, but any YAML value is accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Requirement(Value);

impl Requirement {
    /// Wraps a raw configuration value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// An empty requirement (the hook kind is disabled).
    pub fn empty() -> Self {
        Self(Value::Null)
    }

    /// Returns the raw value.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Consumes the requirement and returns the raw value.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Whether the requirement leaves the hook disabled.
    ///
    /// Null, `false`, zero, the empty string, the empty list and the empty
    /// mapping all count as empty.
    pub fn is_empty(&self) -> bool {
        is_empty_value(&self.0)
    }

    /// Returns the scalar items as strings.
    ///
    /// A sequence yields one string per scalar item (nested collections are
    /// skipped), a lone scalar yields a single item, and anything else
    /// yields nothing.
    pub fn as_strings(&self) -> Vec<String> {
        match &self.0 {
            Value::Sequence(items) => items.iter().filter_map(scalar_to_string).collect(),
            other => scalar_to_string(other).into_iter().collect(),
        }
    }
}

impl From<Value> for Requirement {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::Sequence(items) if items.iter().all(|v| scalar_to_string(v).is_some()) => {
                write!(f, "{}", self.as_strings().join(", "))
            }
            other => match scalar_to_string(other) {
                Some(s) => write!(f, "{s}"),
                None => {
                    let rendered = serde_yaml::to_string(other).map_err(|_| fmt::Error)?;
                    write!(f, "{}", rendered.trim_end())
                }
            },
        }
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Sequence(items) => items.is_empty(),
        Value::Mapping(map) => map.is_empty(),
        Value::Tagged(tagged) => is_empty_value(&tagged.value),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

//! Slot parameters decoded from region markup.
//!
//! A region carries a serialized JSON blob of parameters. The blob is written
//! by templates, so it is frequently missing, partial, or stringly typed. It is
//! decoded once into [`SlotParams`] with a documented fallback per field, and a
//! bad blob never fails slot construction.

use serde_json::{Map, Value};
use slotbox_types::BoxId;
use tracing::warn;

/// Marker class selecting single-item mode on a region.
pub const SINGLE_SLOT_CLASS: &str = "single-slot";

/// Whether a slot holds any number of items or at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotMode {
    #[default]
    Multi,
    Single,
}

impl SlotMode {
    /// `Single` iff `classes` contains [`SINGLE_SLOT_CLASS`].
    pub fn from_classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if classes
            .into_iter()
            .any(|c| c.as_ref().trim() == SINGLE_SLOT_CLASS)
        {
            Self::Single
        } else {
            Self::Multi
        }
    }

    pub fn is_single(self) -> bool {
        self == Self::Single
    }
}

/// Typed slot configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotParams {
    /// Persisted box id (`id`). `None` when absent or not an integer.
    pub id: Option<BoxId>,
    /// Allowed content types (`type`), in declaration order. Empty means
    /// unconstrained.
    pub allowed_types: Vec<String>,
    /// Whether the slot may stay empty (`optional`). Defaults to `false`.
    pub optional: bool,
    /// Initial content for auto-filled items (`defaultValue`).
    pub default_value: Option<String>,
    /// The whole decoded map, for parameters the engine does not interpret.
    pub raw: Map<String, Value>,
}

impl SlotParams {
    /// Decodes the parameter blob of a region.
    ///
    /// Missing, malformed, or non-object blobs give the default parameters.
    pub fn from_markup(blob: Option<&str>) -> Self {
        let Some(blob) = blob.map(str::trim).filter(|b| !b.is_empty()) else {
            return Self::default();
        };
        match serde_json::from_str::<Value>(blob) {
            Ok(Value::Object(map)) => Self::from_map(map),
            Ok(other) => {
                warn!(kind = json_kind(&other), "slot params are not an object, using defaults");
                Self::default()
            }
            Err(e) => {
                warn!(error = %e, "malformed slot params, using defaults");
                Self::default()
            }
        }
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        let id = map.get("id").and_then(BoxId::from_json);
        let allowed_types = map.get("type").map(parse_type_list).unwrap_or_default();
        let optional = map.get("optional").is_some_and(truthy);
        let default_value = map.get("defaultValue").and_then(|v| match v {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        });
        Self {
            id,
            allowed_types,
            optional,
            default_value,
            raw: map,
        }
    }

    /// Raw access to a parameter by key.
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    /// True when the slot places no type constraint or lists `content_type`.
    pub fn accepts(&self, content_type: &str) -> bool {
        self.allowed_types.is_empty()
            || self
                .allowed_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(content_type))
    }

    /// The single type a non-optional slot must be filled with, if the slot is
    /// constrained to exactly one type.
    pub fn mandatory_single_type(&self) -> Option<&str> {
        match self.allowed_types.as_slice() {
            [only] if !self.optional => Some(only.as_str()),
            _ => None,
        }
    }
}

fn parse_type_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => s
            .split(',')
            .map(|t| t.chars().filter(|c| !c.is_whitespace()).collect::<String>())
            .filter(|t| !t.is_empty())
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Truthiness as template authors expect it: `"0"` and `"false"` are false.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            let s = s.trim();
            !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"))
        }
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness_table() {
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!(false)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!("0")));
        assert!(!truthy(&json!("FALSE")));
        assert!(truthy(&json!(1)));
        assert!(truthy(&json!("yes")));
        assert!(truthy(&json!([])));
    }

    #[test]
    fn type_list_strips_inner_whitespace() {
        assert_eq!(parse_type_list(&json!(" text , im age,,")), vec!["text", "image"]);
    }
}

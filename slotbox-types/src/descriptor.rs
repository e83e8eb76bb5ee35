//! The content descriptor: the wire shape of one content block.
//!
//! Descriptors arrive from three places: the initial content fetch, drag
//! payloads of type [`CONTENT_TRANSFER_MIME`], and the editor's type chooser.
//! None of those sources is trusted to be well-formed, so decoding is lenient
//! per field and only rejects a payload that is not a JSON object at all.

use crate::ids::integer_from_json;
use crate::{BoxId, Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Content type used when a descriptor names none.
pub const DEFAULT_CONTENT_TYPE: &str = "text";

/// Template used when a descriptor names none.
pub const DEFAULT_TEMPLATE: &str = "default/content.html.twig";

/// Drag payload type carrying a serialized [`ContentDescriptor`].
pub const CONTENT_TRANSFER_MIME: &str = "application/json";

/// One content block as exchanged with the editor and the server.
///
/// JSON form: `{"type": "text", "content": ..., "template": "...", "boxId": 3, "sortId": 1}`.
/// Fields the engine does not know about are kept in `extra` and written back
/// unchanged, so a load/save cycle never drops server-side attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentDescriptor {
    pub content_type: Option<String>,
    pub content: Value,
    pub template: Option<String>,
    pub box_id: Option<BoxId>,
    pub sort_id: Option<u32>,
    pub extra: Map<String, Value>,
}

impl ContentDescriptor {
    /// Creates a descriptor of the given type with the given payload.
    pub fn new(content_type: impl Into<String>, content: impl Into<Value>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            content: content.into(),
            ..Default::default()
        }
    }

    /// Creates a descriptor that only names a type (used for drops resolved
    /// through the content-type registry).
    pub fn of_type(content_type: impl Into<String>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    #[must_use]
    pub fn with_box_id(mut self, box_id: BoxId) -> Self {
        self.box_id = Some(box_id);
        self
    }

    #[must_use]
    pub fn with_sort_id(mut self, sort_id: u32) -> Self {
        self.sort_id = Some(sort_id);
        self
    }

    /// The content type, falling back to [`DEFAULT_CONTENT_TYPE`].
    pub fn type_or_default(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// Decodes a descriptor from loosely typed JSON.
    ///
    /// Returns `None` only when `value` is not an object. Invalid fields are
    /// dropped individually: a non-string or blank `type`/`template`, a
    /// non-integer `boxId`, a `sortId` that is not a positive integer.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut extra = object.clone();

        let content_type = extra.remove("type").and_then(non_blank_string);
        let template = extra.remove("template").and_then(non_blank_string);
        let content = extra.remove("content").unwrap_or(Value::Null);
        let box_id = extra.remove("boxId").as_ref().and_then(BoxId::from_json);
        let sort_id = extra
            .remove("sortId")
            .as_ref()
            .and_then(integer_from_json)
            .filter(|n| *n >= 1)
            .and_then(|n| u32::try_from(n).ok());

        Some(Self {
            content_type,
            content,
            template,
            box_id,
            sort_id,
            extra,
        })
    }

    /// Parses a descriptor from a JSON string (e.g. a drag payload).
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(&value)
            .ok_or_else(|| Error::InvalidDescriptor("expected a JSON object".into()))
    }

    /// Encodes the descriptor back into its JSON object form.
    pub fn to_value(&self) -> Value {
        let mut object = self.extra.clone();
        if let Some(content_type) = &self.content_type {
            object.insert("type".into(), Value::String(content_type.clone()));
        }
        object.insert("content".into(), self.content.clone());
        if let Some(template) = &self.template {
            object.insert("template".into(), Value::String(template.clone()));
        }
        if let Some(box_id) = self.box_id {
            object.insert("boxId".into(), Value::from(box_id.get()));
        }
        if let Some(sort_id) = self.sort_id {
            object.insert("sortId".into(), Value::from(sort_id));
        }
        Value::Object(object)
    }
}

fn non_blank_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

impl Serialize for ContentDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ContentDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom("content descriptor must be a JSON object"))
    }
}

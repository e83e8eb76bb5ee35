use serde::{Deserialize, Serialize};

/// Describes a content type known to the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub key: String,
    /// Human-readable name shown in the add affordance.
    pub label: String,
    /// MIME patterns this type accepts from drops. Supports exact types,
    /// `major/*`, `*` and `*/*`.
    #[serde(default)]
    pub accepted_mime_types: Vec<String>,
}

impl TypeDescriptor {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            accepted_mime_types: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_mime_types<I, S>(mut self, mime_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted_mime_types = mime_types.into_iter().map(Into::into).collect();
        self
    }

    /// Returns true if any accepted pattern matches `mime`.
    ///
    /// Matching ignores ASCII case and MIME parameters (`text/plain; charset=utf-8`).
    pub fn accepts_mime(&self, mime: &str) -> bool {
        let mime = mime_essence(mime);
        if mime.is_empty() {
            return false;
        }
        self.accepted_mime_types
            .iter()
            .any(|pattern| mime_matches(&mime_essence(pattern), &mime))
    }
}

/// Lowercased media type with parameters stripped (`Text/Plain; charset=x` is `text/plain`).
pub fn mime_essence(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn mime_matches(pattern: &str, mime: &str) -> bool {
    if pattern == "*" || pattern == "*/*" {
        return true;
    }
    if let Some(prefix) = pattern.strip_suffix("/*") {
        mime.starts_with(prefix) && mime.as_bytes().get(prefix.len()) == Some(&b'/')
    } else {
        pattern == mime
    }
}

/// Lookup of content types, injected into the engine at construction.
///
/// Implementations return owned descriptors so the trait stays object-safe
/// and the engine never holds borrows into the registry.
pub trait ContentTypeRegistry: Send + Sync {
    /// Finds a type by key. Implementations should fall back to a
    /// case-insensitive match (`"text"` finds `"Text"`).
    fn describe(&self, key: &str) -> Option<TypeDescriptor>;

    /// Finds the first type, in registration order, accepting `mime`.
    fn lookup(&self, mime: &str) -> Option<TypeDescriptor>;

    /// All registered types in registration order.
    fn types(&self) -> Vec<TypeDescriptor>;
}

/// In-memory registry preserving registration order.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: Vec<TypeDescriptor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the stock `text`, `image` and `file` types.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(
            TypeDescriptor::new("text", "Text").with_mime_types(["text/plain", "text/html"]),
        );
        registry.register(TypeDescriptor::new("image", "Image").with_mime_types(["image/*"]));
        registry.register(
            TypeDescriptor::new("file", "File").with_mime_types(["application/octet-stream"]),
        );
        registry
    }

    /// Adds a type. Re-registering a key replaces the entry in place,
    /// keeping its lookup priority.
    pub fn register(&mut self, descriptor: TypeDescriptor) {
        match self.types.iter_mut().find(|t| t.key == descriptor.key) {
            Some(existing) => *existing = descriptor,
            None => self.types.push(descriptor),
        }
    }

    #[must_use]
    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl ContentTypeRegistry for TypeRegistry {
    fn describe(&self, key: &str) -> Option<TypeDescriptor> {
        self.types
            .iter()
            .find(|t| t.key == key)
            .or_else(|| self.types.iter().find(|t| t.key.eq_ignore_ascii_case(key)))
            .cloned()
    }

    fn lookup(&self, mime: &str) -> Option<TypeDescriptor> {
        self.types.iter().find(|t| t.accepts_mime(mime)).cloned()
    }

    fn types(&self) -> Vec<TypeDescriptor> {
        self.types.clone()
    }
}

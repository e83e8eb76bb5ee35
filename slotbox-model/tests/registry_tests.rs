use slotbox_model::{ContentTypeRegistry, TypeDescriptor, TypeRegistry, mime_essence};

// ── MIME matching ────────────────────────────────────────────────

#[test]
fn exact_mime_match() {
    let t = TypeDescriptor::new("text", "Text").with_mime_types(["text/plain"]);
    assert!(t.accepts_mime("text/plain"));
    assert!(!t.accepts_mime("text/html"));
}

#[test]
fn wildcard_major_match() {
    let t = TypeDescriptor::new("image", "Image").with_mime_types(["image/*"]);
    assert!(t.accepts_mime("image/png"));
    assert!(t.accepts_mime("image/svg+xml"));
    assert!(!t.accepts_mime("imagex/png"));
    assert!(!t.accepts_mime("text/plain"));
}

#[test]
fn mime_match_ignores_case_and_parameters() {
    let t = TypeDescriptor::new("text", "Text").with_mime_types(["text/plain"]);
    assert!(t.accepts_mime("Text/Plain; charset=utf-8"));
}

#[test]
fn essence_strips_parameters_and_case() {
    assert_eq!(mime_essence("Application/JSON; charset=utf-8"), "application/json");
    assert_eq!(mime_essence(" text/plain "), "text/plain");
    assert_eq!(mime_essence(""), "");
}

#[test]
fn empty_mime_never_matches() {
    let t = TypeDescriptor::new("any", "Any").with_mime_types(["*/*"]);
    assert!(!t.accepts_mime(""));
    assert!(t.accepts_mime("application/zip"));
}

#[test]
fn type_without_mime_types_accepts_nothing() {
    let t = TypeDescriptor::new("layout", "Layout");
    assert!(!t.accepts_mime("text/plain"));
}

// ── Registry ─────────────────────────────────────────────────────

#[test]
fn defaults_are_registered() {
    let registry = TypeRegistry::with_defaults();
    assert_eq!(registry.len(), 3);
    assert_eq!(registry.lookup("image/jpeg").unwrap().key, "image");
    assert_eq!(registry.lookup("text/plain").unwrap().key, "text");
    assert_eq!(
        registry.lookup("application/octet-stream").unwrap().key,
        "file"
    );
    assert!(registry.lookup("video/mp4").is_none());
}

#[test]
fn describe_falls_back_to_case_insensitive() {
    let registry = TypeRegistry::new().with(TypeDescriptor::new("Text", "Rich text"));
    assert_eq!(registry.describe("Text").unwrap().label, "Rich text");
    assert_eq!(registry.describe("text").unwrap().label, "Rich text");
    assert!(registry.describe("image").is_none());
}

#[test]
fn describe_prefers_exact_key() {
    let registry = TypeRegistry::new()
        .with(TypeDescriptor::new("TEXT", "Upper"))
        .with(TypeDescriptor::new("text", "Lower"));
    assert_eq!(registry.describe("text").unwrap().label, "Lower");
}

#[test]
fn lookup_returns_first_registered_match() {
    let registry = TypeRegistry::new()
        .with(TypeDescriptor::new("gallery", "Gallery").with_mime_types(["image/*"]))
        .with(TypeDescriptor::new("image", "Image").with_mime_types(["image/png"]));
    assert_eq!(registry.lookup("image/png").unwrap().key, "gallery");
}

#[test]
fn reregistering_replaces_in_place() {
    let mut registry = TypeRegistry::with_defaults();
    registry.register(TypeDescriptor::new("text", "Plain").with_mime_types(["text/markdown"]));

    assert_eq!(registry.len(), 3);
    assert_eq!(registry.types()[0].label, "Plain");
    assert!(registry.lookup("text/plain").is_none());
    assert_eq!(registry.lookup("text/markdown").unwrap().key, "text");
}

#[test]
fn empty_registry() {
    let registry = TypeRegistry::new();
    assert!(registry.is_empty());
    assert!(registry.types().is_empty());
}

#[test]
fn type_descriptor_deserializes_without_mime_types() {
    let t: TypeDescriptor = serde_json::from_str(r#"{"key":"text","label":"Text"}"#).unwrap();
    assert!(t.accepted_mime_types.is_empty());
}

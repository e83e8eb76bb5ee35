use crate::TransferItem;
use serde_json::{Map, Value};
use slotbox_types::{BoxId, ContentDescriptor, ItemId};

/// How a content item came into its slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOrigin {
    /// Created from the initial content fetch or `set_value`.
    Loaded,
    /// Added by the editor (type chooser, paste, programmatic add).
    Added,
    /// Created from a drop; carries the payload entry so the content type
    /// can read the dropped file or text.
    Dropped(TransferItem),
    /// Materialized automatically for a mandatory single-type slot.
    AutoFilled,
}

/// One placed content block.
///
/// The engine owns every `ContentItem` and is the only writer of its box and
/// sort metadata. Everything about the payload itself is opaque here.
#[derive(Debug, Clone)]
pub struct ContentItem {
    id: ItemId,
    content_type: String,
    content: Value,
    template: String,
    box_id: Option<BoxId>,
    sort_id: Option<u32>,
    dirty: bool,
    removable: bool,
    focused: bool,
    preview: bool,
    origin: ItemOrigin,
    extra: Map<String, Value>,
}

impl ContentItem {
    /// Builds an item from a descriptor.
    ///
    /// A missing type falls back to `"text"`, a missing template to
    /// `default_template`. The item starts clean and removable.
    pub fn from_descriptor(
        descriptor: ContentDescriptor,
        default_template: &str,
        origin: ItemOrigin,
    ) -> Self {
        let content_type = descriptor.type_or_default().to_string();
        Self {
            id: ItemId::new(),
            content_type,
            content: descriptor.content,
            template: descriptor
                .template
                .unwrap_or_else(|| default_template.to_string()),
            box_id: descriptor.box_id,
            sort_id: descriptor.sort_id,
            dirty: false,
            removable: true,
            focused: false,
            preview: false,
            origin,
            extra: descriptor.extra,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content(&self) -> &Value {
        &self.content
    }

    /// Replaces the payload and marks the item dirty.
    pub fn set_content(&mut self, content: Value) {
        if self.content != content {
            self.content = content;
            self.dirty = true;
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn box_id(&self) -> Option<BoxId> {
        self.box_id
    }

    pub fn set_box_id(&mut self, box_id: Option<BoxId>) {
        self.box_id = box_id;
    }

    pub fn sort_id(&self) -> Option<u32> {
        self.sort_id
    }

    pub fn set_sort_id(&mut self, sort_id: Option<u32>) {
        self.sort_id = sort_id;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    pub fn is_removable(&self) -> bool {
        self.removable
    }

    pub fn set_removable(&mut self, removable: bool) {
        self.removable = removable;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn is_preview(&self) -> bool {
        self.preview
    }

    pub fn set_preview(&mut self, visible: bool) {
        self.preview = visible;
    }

    pub fn origin(&self) -> &ItemOrigin {
        &self.origin
    }

    /// The payload entry this item was dropped from, if any.
    pub fn drop_source(&self) -> Option<&TransferItem> {
        match &self.origin {
            ItemOrigin::Dropped(item) => Some(item),
            _ => None,
        }
    }

    /// Aligns box and sort metadata with the item's current placement.
    ///
    /// `box_id == None` means the slot has no persisted id; the stored box id
    /// is left alone in that case. Returns `true` and marks the item dirty when
    /// anything changed; an unchanged item keeps its previous dirty flag.
    pub fn reconcile(&mut self, box_id: Option<BoxId>, sort_id: u32) -> bool {
        let mut changed = false;
        if let Some(box_id) = box_id
            && self.box_id != Some(box_id)
        {
            self.box_id = Some(box_id);
            changed = true;
        }
        if self.sort_id != Some(sort_id) {
            self.sort_id = Some(sort_id);
            changed = true;
        }
        if changed {
            self.dirty = true;
        }
        changed
    }

    /// Snapshot of the item in wire form, used by the save flow.
    pub fn value(&self) -> ContentDescriptor {
        ContentDescriptor {
            content_type: Some(self.content_type.clone()),
            content: self.content.clone(),
            template: Some(self.template.clone()),
            box_id: self.box_id,
            sort_id: self.sort_id,
            extra: self.extra.clone(),
        }
    }
}

//! Drag/drop events as delivered by the host, and drop payload resolution.
//!
//! Native drag events bubble through every region under the pointer, so each
//! event carries the host's resolution of its DOM target: the nearest slot
//! ancestor and the nearest content ancestor. A slot only reacts to events
//! whose target resolves to itself.

use crate::geometry::{Point, SlotLayout};
use slotbox_model::{ContentTypeRegistry, TransferItem, mime_essence};
use slotbox_types::{CONTENT_TRANSFER_MIME, ContentDescriptor, ItemId, SlotId};
use tracing::debug;

/// Resolution of an event's DOM target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventTarget {
    /// Slot region the target element belongs to (`None` outside any slot).
    pub slot: Option<SlotId>,
    /// Content element under the target, if any.
    pub item: Option<ItemId>,
}

impl EventTarget {
    /// Target on empty space of `slot`.
    pub fn slot(slot: SlotId) -> Self {
        Self {
            slot: Some(slot),
            item: None,
        }
    }

    /// Target on content item `item` of `slot`.
    pub fn item(slot: SlotId, item: ItemId) -> Self {
        Self {
            slot: Some(slot),
            item: Some(item),
        }
    }
}

/// What the host should do with the native event after the engine saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event does not concern this slot; let it propagate untouched.
    Ignored,
    /// The slot consumed the event; suppress default handling and stop propagation.
    Handled,
}

impl EventOutcome {
    pub fn is_handled(self) -> bool {
        self == Self::Handled
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragOverEvent {
    pub target: Option<EventTarget>,
    pub pointer: Point,
    pub layout: SlotLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragLeaveEvent {
    pub target: Option<EventTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropEvent {
    pub target: Option<EventTarget>,
    pub payload: DropPayload,
}

/// Everything the browser's data transfer object exposed at drop time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropPayload {
    pub files: Vec<TransferItem>,
    pub items: Vec<TransferItem>,
    /// Raw `(type, value)` pairs, for transfers that expose neither files nor items.
    pub types: Vec<(String, String)>,
}

impl DropPayload {
    /// Payload carrying one serialized content descriptor.
    pub fn descriptor(descriptor: &ContentDescriptor) -> Self {
        Self {
            items: vec![TransferItem::text(
                CONTENT_TRANSFER_MIME,
                descriptor.to_value().to_string(),
            )],
            ..Default::default()
        }
    }

    pub fn files(files: Vec<TransferItem>) -> Self {
        Self {
            files,
            ..Default::default()
        }
    }

    /// Entries to resolve: files when present, else items, else the raw pairs.
    pub fn transfer_items(&self) -> Vec<TransferItem> {
        if !self.files.is_empty() {
            self.files.clone()
        } else if !self.items.is_empty() {
            self.items.clone()
        } else {
            self.types
                .iter()
                .map(|(mime, value)| TransferItem::text(mime.clone(), value.clone()))
                .collect()
        }
    }

    /// Resolves every entry to a content descriptor, dropping entries that
    /// resolve to nothing.
    ///
    /// Entries of type [`CONTENT_TRANSFER_MIME`] are parsed as descriptors;
    /// anything else is matched against the registry's accepted MIME types.
    pub fn resolve(
        &self,
        registry: &dyn ContentTypeRegistry,
    ) -> Vec<(ContentDescriptor, TransferItem)> {
        self.transfer_items()
            .into_iter()
            .filter_map(|item| resolve_item(&item, registry).map(|d| (d, item)))
            .collect()
    }
}

fn resolve_item(
    item: &TransferItem,
    registry: &dyn ContentTypeRegistry,
) -> Option<ContentDescriptor> {
    if mime_essence(&item.mime_type) == CONTENT_TRANSFER_MIME {
        let raw = item.as_text()?;
        return match ContentDescriptor::from_json_str(raw) {
            Ok(descriptor) => Some(descriptor),
            Err(e) => {
                debug!(error = %e, "ignoring undecodable content transfer");
                None
            }
        };
    }
    match registry.lookup(&item.mime_type) {
        Some(t) => Some(ContentDescriptor::of_type(t.key)),
        None => {
            debug!(mime = %item.mime_type, "no content type accepts dropped item");
            None
        }
    }
}

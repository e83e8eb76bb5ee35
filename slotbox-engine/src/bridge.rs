//! Contract between a slot and the surrounding editor.

use async_trait::async_trait;
use slotbox_model::{ContentTypeRegistry, TypeRegistry};
use slotbox_types::{ContentDescriptor, ItemId, SlotId};
use std::sync::Arc;

/// Where the editor should anchor its type chooser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChooserAnchor {
    /// The slot's add affordance.
    Placer,
}

/// Request to let the user pick the type of a new item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeChoiceRequest {
    pub slot: SlotId,
    pub anchor: ChooserAnchor,
    /// Types the user may choose from; empty means unrestricted.
    pub allowed_types: Vec<String>,
}

/// Services the editor provides to its slots.
#[async_trait]
pub trait EditorBridge: Send + Sync {
    /// Makes `item` the editor's current selection and gives it focus.
    fn select_and_focus(&self, slot: SlotId, item: ItemId);

    /// Presents the type chooser and resolves to the user's choice, or
    /// `None` when the user dismissed it.
    async fn choose_content_type(&self, request: TypeChoiceRequest) -> Option<ContentDescriptor>;
}

/// Bridge for headless use: selection is dropped, the chooser is always dismissed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBridge;

#[async_trait]
impl EditorBridge for NoopBridge {
    fn select_and_focus(&self, _slot: SlotId, _item: ItemId) {}

    async fn choose_content_type(&self, _request: TypeChoiceRequest) -> Option<ContentDescriptor> {
        None
    }
}

/// Collaborators injected into every slot.
#[derive(Clone)]
pub struct SlotEnv {
    pub bridge: Arc<dyn EditorBridge>,
    pub registry: Arc<dyn ContentTypeRegistry>,
}

impl SlotEnv {
    pub fn new(bridge: Arc<dyn EditorBridge>, registry: Arc<dyn ContentTypeRegistry>) -> Self {
        Self { bridge, registry }
    }
}

impl Default for SlotEnv {
    fn default() -> Self {
        Self {
            bridge: Arc::new(NoopBridge),
            registry: Arc::new(TypeRegistry::with_defaults()),
        }
    }
}

/// Change notifications raised by a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotEvent {
    /// The slot's contents or their metadata changed.
    Changed(SlotId),
    ItemAdded { slot: SlotId, item: ItemId },
    ItemRemoved { slot: SlotId, item: ItemId },
}

//! Content item model for slotbox.
//!
//! Defines the types the placement engine reasons about:
//! - [`ContentItem`]: one placed block (type, opaque payload, box/sort metadata, dirty flag)
//! - [`TransferItem`]: one entry of a drag payload, kept as the drop context of a dropped item
//! - [`ContentTypeRegistry`]: injected lookup of content types by key or accepted MIME type
//! - [`SlotParams`] / [`SlotMode`]: typed slot configuration decoded once from region markup
//!
//! The model never decides what a content type renders to; it only carries
//! enough metadata for the engine to place items and for the editor to save them.

mod item;
mod params;
mod registry;
mod transfer;

pub use item::{ContentItem, ItemOrigin};
pub use params::{SINGLE_SLOT_CLASS, SlotMode, SlotParams};
pub use registry::{ContentTypeRegistry, TypeDescriptor, TypeRegistry, mime_essence};
pub use transfer::{TransferData, TransferItem};

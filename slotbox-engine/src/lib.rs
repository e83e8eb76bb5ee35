//! Slot placement engine for slotbox.
//!
//! A slot is a region of a page layout that holds an ordered list of content
//! blocks. This crate decides where dragged content lands, keeps the order and
//! box membership of every block, and reports which blocks need saving.
//!
//! # Architecture
//!
//! - **Slot**: owns the item container and all mutations ([`Slot`])
//! - **Placeholder**: the drop marker and its drag/grace state machine
//! - **Events**: host-resolved drag/drop events and payload resolution
//! - **Render**: the visual projection a host reflects into the DOM
//! - **Source**: where a standalone slot loads its initial contents from
//!
//! The engine performs no I/O on its own and never queries layout. The host
//! supplies measured geometry with each event and drives the grace timer with
//! [`Slot::tick`].
//!
//! # Example
//!
//! ```
//! use slotbox_engine::{AddOptions, EngineConfig, Slot, SlotEnv, SlotRegion};
//!
//! let region = SlotRegion::new().with_params(r#"{"id": 7}"#);
//! let mut slot = Slot::new(&region, EngineConfig::default(), SlotEnv::default());
//!
//! slot.add_content(None, AddOptions::default()).unwrap();
//! assert_eq!(slot.len(), 1);
//! assert!(!slot.has_changes());
//! ```

mod bridge;
mod config;
mod error;
mod event;
pub mod geometry;
pub mod placeholder;
mod region;
pub mod render;
mod slot;
pub mod source;

pub use bridge::{ChooserAnchor, EditorBridge, NoopBridge, SlotEnv, SlotEvent, TypeChoiceRequest};
pub use config::EngineConfig;
pub use error::{SlotError, SlotResult};
pub use event::{DragLeaveEvent, DragOverEvent, DropEvent, DropPayload, EventOutcome, EventTarget};
pub use geometry::{Point, Rect, SlotLayout};
pub use placeholder::{Anchor, DragPhase, EDGE_SLACK, PlaceholderTracker};
pub use region::SlotRegion;
pub use render::{PlacerNode, VisualNode, VisualTree};
pub use slot::{AddOptions, LoadOutcome, LoadTicket, Occupancy, Slot};
pub use source::{
    ContentQuery, ContentSource, HttpContentSource, HttpSourceConfig, MemoryContentSource,
    SortOrder,
};

//! Core type definitions for slotbox.
//!
//! This crate defines the plain types shared by the model and the placement
//! engine:
//! - Handles for live content items and slot instances (UUID v7)
//! - Persisted identifiers for boxes (slots) and page nodes
//! - The content descriptor wire shape exchanged with the editor and the server
//!
//! Rendering concerns (templates, content bodies, DOM) do not belong here.

mod descriptor;
mod ids;

pub use descriptor::{
    CONTENT_TRANSFER_MIME, ContentDescriptor, DEFAULT_CONTENT_TYPE, DEFAULT_TEMPLATE,
};
pub use ids::{BoxId, ItemId, NodeId, SlotId};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid content descriptor: {0}")]
    InvalidDescriptor(String),
}

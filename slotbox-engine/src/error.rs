//! Error types for the placement engine.

use slotbox_types::ItemId;
use thiserror::Error;

/// Result type for engine operations.
pub type SlotResult<T> = Result<T, SlotError>;

/// Errors surfaced by slot operations.
///
/// Conditions the editor treats as "nothing happened" (foreign drops,
/// unresolvable payloads, malformed parameters) are logged instead.
#[derive(Debug, Error)]
pub enum SlotError {
    /// A single slot already holds its item.
    #[error("slot already holds its single item")]
    SlotOccupied,

    /// The slot's type constraint excludes this content type.
    #[error("content type '{0}' is not allowed in this slot")]
    TypeNotAllowed(String),

    /// No item with this handle lives in the slot.
    #[error("content item not found: {0}")]
    ItemNotFound(ItemId),

    /// The item is pinned to the slot.
    #[error("content item is not removable: {0}")]
    NotRemovable(ItemId),

    /// A remote fetch needs context the slot does not have.
    #[error("missing fetch context: {0}")]
    MissingContext(&'static str),

    /// The remote content source answered with an error.
    #[error("remote error: {0}")]
    Remote(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP transport error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

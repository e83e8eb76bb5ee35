//! The drop placeholder and the drag state machine that drives it.
//!
//! # State machine
//!
//! ```text
//!            anchor_*()                    schedule_removal()
//!   Idle ───────────────▶ DragOver ─────────────────────────▶ ArmedForDrop
//!    ▲                    ▲   │  ◀───── anchor_*() / cancel_removal() ──┘ │
//!    │                    │   │                                           │
//!    └──── destroy() ─────┴───┘◀──────────── expire(now ≥ deadline) ──────┘
//! ```
//!
//! `ArmedForDrop` is entered when the pointer leaves the slot. The marker stays
//! in place (and a drop still lands on it) until the grace deadline passes.
//! Browsers emit leave/enter pairs whenever the pointer crosses a child element
//! boundary; the next drag-over cancels the pending removal before it fires.
//!
//! # Invariants
//!
//! 1. There is at most one marker per tracker; re-anchoring moves it.
//! 2. The marker is live iff the phase is not `Idle`.
//! 3. `cancel_removal` and `destroy` are idempotent.

use crate::geometry::{Point, SlotLayout};
use slotbox_types::ItemId;
use std::time::{Duration, Instant};

/// Pointer distance below an item's top edge before empty space after it
/// counts as "after this item".
pub const EDGE_SLACK: f64 = 5.0;

/// Where the placeholder sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Before(ItemId),
    After(ItemId),
    Top,
    Bottom,
}

impl Anchor {
    /// Index in `order` at which an item dropped here is inserted.
    ///
    /// An anchor whose item is no longer in `order` resolves to the end.
    pub fn insertion_index(&self, order: &[ItemId]) -> usize {
        let position = |id: &ItemId| order.iter().position(|x| x == id);
        match self {
            Self::Top => 0,
            Self::Bottom => order.len(),
            Self::Before(id) => position(id).unwrap_or(order.len()),
            Self::After(id) => position(id).map_or(order.len(), |i| i + 1),
        }
    }

    /// The item the anchor refers to, if any.
    pub fn item(&self) -> Option<ItemId> {
        match self {
            Self::Before(id) | Self::After(id) => Some(*id),
            Self::Top | Self::Bottom => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    DragOver { anchor: Anchor },
    ArmedForDrop { anchor: Anchor, expires_at: Instant },
}

impl DragPhase {
    pub fn anchor(&self) -> Option<Anchor> {
        match self {
            Self::Idle => None,
            Self::DragOver { anchor } | Self::ArmedForDrop { anchor, .. } => Some(*anchor),
        }
    }
}

/// The single transient insertion marker of a slot.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderTracker {
    phase: DragPhase,
}

impl PlaceholderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn anchor(&self) -> Option<Anchor> {
        self.phase.anchor()
    }

    pub fn is_live(&self) -> bool {
        self.phase != DragPhase::Idle
    }

    pub fn is_removal_pending(&self) -> bool {
        matches!(self.phase, DragPhase::ArmedForDrop { .. })
    }

    /// Moves the marker to `anchor`, cancelling any pending removal.
    pub fn anchor_to(&mut self, anchor: Anchor) {
        self.phase = DragPhase::DragOver { anchor };
    }

    pub fn anchor_before(&mut self, item: ItemId) {
        self.anchor_to(Anchor::Before(item));
    }

    pub fn anchor_after(&mut self, item: ItemId) {
        self.anchor_to(Anchor::After(item));
    }

    pub fn anchor_at_top(&mut self) {
        self.anchor_to(Anchor::Top);
    }

    pub fn anchor_at_bottom(&mut self) {
        self.anchor_to(Anchor::Bottom);
    }

    /// Arms the deferred removal. Calling it again pushes the deadline out.
    /// No-op without a live marker.
    pub fn schedule_removal(&mut self, now: Instant, grace: Duration) {
        if let Some(anchor) = self.anchor() {
            self.phase = DragPhase::ArmedForDrop {
                anchor,
                expires_at: now + grace,
            };
        }
    }

    /// Cancels a pending removal. Returns whether one was pending.
    pub fn cancel_removal(&mut self) -> bool {
        if let DragPhase::ArmedForDrop { anchor, .. } = self.phase {
            self.phase = DragPhase::DragOver { anchor };
            true
        } else {
            false
        }
    }

    /// Fires the deferred removal once its deadline has passed.
    /// Returns whether the marker was destroyed.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.phase {
            DragPhase::ArmedForDrop { expires_at, .. } if now >= expires_at => {
                self.phase = DragPhase::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn destroy(&mut self) {
        self.phase = DragPhase::Idle;
    }
}

/// Computes the insertion point for a pointer position.
///
/// - Over an item: `Before` it in the upper half of its box, `After` otherwise.
/// - Over empty slot space: `After` the last item whose top edge (plus
///   [`EDGE_SLACK`]) is above the pointer.
/// - Nothing qualifies: `Top` above the slot's vertical midpoint, `Bottom` below.
///
/// `hovered` is ignored when the layout has no bounds for it.
pub fn resolve_anchor(pointer: Point, hovered: Option<ItemId>, layout: &SlotLayout) -> Anchor {
    let y = pointer.y / layout.effective_zoom();

    if let Some(id) = hovered
        && let Some(rect) = layout.bounds_of(id)
    {
        return if y - rect.top() < rect.height / 2.0 {
            Anchor::Before(id)
        } else {
            Anchor::After(id)
        };
    }

    let nearest = layout
        .items
        .iter()
        .rev()
        .find(|(_, rect)| y > rect.top() + EDGE_SLACK)
        .map(|(id, _)| *id);

    match nearest {
        Some(id) => Anchor::After(id),
        None if y < layout.bounds.mid_y() => Anchor::Top,
        None => Anchor::Bottom,
    }
}

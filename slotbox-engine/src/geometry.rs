//! Page-space geometry reported by the host for hit resolution.
//!
//! Coordinates are CSS pixels relative to the document, origin at top-left,
//! y growing downwards.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Vertical midpoint.
    #[inline]
    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// Layout of one slot at the time of a pointer event.
///
/// The host measures the slot region and each of its content elements and
/// passes the snapshot with the event; the engine never queries layout itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotLayout {
    pub bounds: Rect,
    /// Content element bounds in visual order.
    pub items: Vec<(slotbox_types::ItemId, Rect)>,
    /// Page zoom factor applied to pointer coordinates (`1.0` = 100%).
    pub zoom: f64,
}

impl SlotLayout {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            items: Vec::new(),
            zoom: 1.0,
        }
    }

    #[must_use]
    pub fn with_item(mut self, id: slotbox_types::ItemId, rect: Rect) -> Self {
        self.items.push((id, rect));
        self
    }

    #[must_use]
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    /// Zoom with non-positive or non-finite values treated as 100%.
    pub fn effective_zoom(&self) -> f64 {
        if self.zoom.is_finite() && self.zoom > 0.0 {
            self.zoom
        } else {
            1.0
        }
    }

    pub fn bounds_of(&self, id: slotbox_types::ItemId) -> Option<Rect> {
        self.items
            .iter()
            .find(|(item, _)| *item == id)
            .map(|(_, rect)| *rect)
    }
}
